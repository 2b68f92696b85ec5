//! Run command implementation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use kickback_bv::{
    BvError, ExecutionClient, HistogramOptions, bernstein_vazirani, decode, render_svg,
};

use super::common::{build_registry, parse_secret, print_results};
use crate::config::Config;

/// Execute the run command.
pub async fn execute(
    secret: &str,
    backend: Option<&str>,
    shots: Option<u32>,
    timeout: Option<u64>,
    svg: Option<&Path>,
    json: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let secret = parse_secret(secret)?;
    let backend = backend.unwrap_or(config.default_backend.as_str());
    let shots = shots.unwrap_or(config.shots);

    println!(
        "{} Recovering secret {} on {} ({} shots)",
        style("→").cyan().bold(),
        style(&secret).green(),
        style(backend).yellow(),
        shots
    );

    let registry = build_registry();
    if !registry.has_backend(backend) {
        return Err(BvError::BackendUnavailable(format!(
            "unknown backend '{backend}' (available: {})",
            registry.available_backends().join(", ")
        ))
        .into());
    }

    let circuit = bernstein_vazirani(&secret)?;
    println!(
        "  Circuit: {} qubits, {} operations",
        circuit.num_qubits(),
        circuit.num_ops()
    );

    let backend_impl = registry
        .create(backend, config.backend_config(backend))
        .await
        .map_err(BvError::from)?;
    info!("Using backend {}", backend_impl.name());

    let client =
        ExecutionClient::new(backend_impl).with_wait_policy(config.wait_policy(timeout));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Waiting for {backend}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.run(&circuit, shots).await;
    spinner.finish_and_clear();
    let result = result?;

    let outcome = decode(&result.counts, secret.len())?;

    print_results(
        &result,
        &HistogramOptions::default().with_highlight(secret.to_string()),
    )?;

    println!(
        "\n  Recovered secret: {} (ancilla {}, {}/{} shots, {:.2}%)",
        style(&outcome.secret).green().bold(),
        u8::from(outcome.ancilla),
        outcome.count,
        outcome.total,
        outcome.success_ratio * 100.0
    );
    if !outcome.matches(&secret) {
        println!(
            "  {} most frequent outcome does not match {}",
            style("!").yellow().bold(),
            secret
        );
    }

    if let Some(path) = svg {
        let title = format!("Bernstein-Vazirani s={secret} on {backend} ({shots} shots)");
        fs::write(path, render_svg(&result.counts, &title))
            .with_context(|| format!("Failed to write SVG: {}", path.display()))?;
        println!("  Histogram written to {}", style(path.display()).cyan());
    }

    if let Some(path) = json {
        let report = serde_json::to_string_pretty(&result)?;
        fs::write(path, report)
            .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
        println!("  Result written to {}", style(path.display()).cyan());
    }

    Ok(())
}
