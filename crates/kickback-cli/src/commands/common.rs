//! Shared helpers for CLI commands.

use std::io;

use anyhow::Result;
use console::style;

use kickback_adapter_sim::SimulatorBackend;
use kickback_bv::{HistogramOptions, SecretString, render_histogram};
use kickback_hal::{BackendRegistry, ExecutionResult};

/// Identifier of the local simulator.
pub const SIMULATOR: &str = "simulator";

/// Registry of every backend compiled into this binary.
pub fn build_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>(SIMULATOR);
    registry.register_alias("sim", SIMULATOR);
    registry.register_alias("local", SIMULATOR);

    #[cfg(feature = "braket")]
    kickback_adapter_braket::register_devices(&mut registry);

    registry
}

/// Parse a secret given on the command line.
pub fn parse_secret(secret: &str) -> Result<SecretString> {
    Ok(secret.parse::<SecretString>()?)
}

/// Print counts as a histogram followed by the execution time.
pub fn print_results(result: &ExecutionResult, options: &HistogramOptions) -> Result<()> {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    render_histogram(&result.counts, &mut io::stdout().lock(), options)?;

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kickback_hal::Backend;

    use super::*;

    #[test]
    fn test_registry_has_simulator_and_aliases() {
        let registry = build_registry();
        assert!(registry.has_backend("simulator"));
        assert_eq!(registry.resolve("sim").as_deref(), Some("simulator"));
        assert_eq!(registry.resolve("LOCAL").as_deref(), Some("simulator"));
        assert_eq!(registry.aliases_of("simulator"), vec!["local", "sim"]);
        assert!(!registry.has_backend("nonexistent"));
    }

    #[cfg(feature = "braket")]
    #[test]
    fn test_registry_has_braket_devices() {
        let registry = build_registry();
        assert!(registry.has_backend("sv1"));
        assert_eq!(registry.resolve("rigetti").as_deref(), Some("ankaa-3"));
        assert!(registry.has_backend("arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1"));
    }

    #[test]
    fn test_parse_secret() {
        assert_eq!(parse_secret("0110").unwrap().to_string(), "0110");
        assert!(parse_secret("01x").is_err());
        assert!(parse_secret("").is_err());
    }

    #[tokio::test]
    async fn test_registry_creates_simulator() {
        let registry = build_registry();
        let backend = registry
            .create("sim", kickback_hal::BackendConfig::new("sim"))
            .await
            .unwrap();
        assert_eq!(backend.name(), "simulator");
    }
}
