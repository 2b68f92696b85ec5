//! Backends command implementation.

use anyhow::Result;
use console::style;

use kickback_bv::BvError;
use kickback_hal::Capabilities;

use super::common::{SIMULATOR, build_registry};
use crate::config::Config;

fn print_capabilities(caps: &Capabilities) {
    println!("    Qubits: {}", caps.num_qubits);
    println!("    Connectivity: {}", caps.topology.summary());
    println!("    Max shots: {}", caps.max_shots);
    println!("    Native gates: {}", caps.gate_set.native.join(", "));
    if let Some(noise) = &caps.noise_profile {
        let fidelities = [
            ("1q", noise.single_qubit_fidelity),
            ("2q", noise.two_qubit_fidelity),
            ("readout", noise.readout_fidelity),
        ];
        let text: Vec<String> = fidelities
            .iter()
            .filter_map(|(label, f)| f.map(|f| format!("{label} {:.2}%", f * 100.0)))
            .collect();
        println!("    Fidelity: {}", text.join(", "));
    }
}

/// Execute the backends command.
pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Available backends:\n", style("Kickback").cyan().bold());

    let registry = build_registry();

    let sim = registry
        .create(SIMULATOR, config.backend_config(SIMULATOR))
        .await
        .map_err(BvError::from)?;
    let available = sim.availability().await?.is_available;
    println!(
        "  {} {} (local; aliases: {})",
        if available {
            style("●").green()
        } else {
            style("○").red()
        },
        style(SIMULATOR).bold(),
        registry.aliases_of(SIMULATOR).join(", ")
    );
    print_capabilities(sim.capabilities());
    println!();

    #[cfg(feature = "braket")]
    {
        use kickback_adapter_braket::device::{KNOWN_DEVICES, capabilities_for_device};

        let configured = config.braket.s3_bucket.is_some();
        for known in KNOWN_DEVICES {
            let Some(caps) = capabilities_for_device(known.arn) else {
                continue;
            };
            let marker = if configured {
                style("●").green()
            } else {
                style("○").dim()
            };
            let aliases = registry.aliases_of(known.name);
            if aliases.is_empty() {
                println!("  {} {} ({})", marker, style(known.name).bold(), caps.name);
            } else {
                println!(
                    "  {} {} ({}; aliases: {})",
                    marker,
                    style(known.name).bold(),
                    caps.name,
                    aliases.join(", ")
                );
            }
            print_capabilities(&caps);
            println!();
        }

        if !configured {
            println!(
                "  {} Braket devices need an S3 bucket: set braket.s3_bucket or KICKBACK_BRAKET_S3_BUCKET",
                style("i").cyan()
            );
        }
        println!("  Any Braket device ARN (arn:aws:braket:...) is also accepted.");
    }

    #[cfg(not(feature = "braket"))]
    {
        println!(
            "  {} {} (not compiled)",
            style("○").dim(),
            style("braket").dim()
        );
        println!("    Rebuild with --features braket to enable");
    }

    Ok(())
}
