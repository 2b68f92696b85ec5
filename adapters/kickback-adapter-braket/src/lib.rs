//! Kickback Adapter for AWS Braket
//!
//! Runs circuits on the quantum hardware and managed simulators available
//! through the AWS Braket service. Circuits are submitted as OpenQASM 3 in
//! Braket's dialect; results are read back from the task's S3 location.
//!
//! # Supported Devices
//!
//! | Name | Aliases | Qubits | Provider | Native Gates |
//! |------|---------|--------|----------|--------------|
//! | `ankaa-3` | `rigetti`, `ankaa` | 84 | Rigetti | RX, RZ, CZ |
//! | `aria-1` | `ionq`, `aria` | 25 | IonQ | GPI, GPI2, MS |
//! | `aria-2` | | 25 | IonQ | GPI, GPI2, MS |
//! | `forte-1` | `forte` | 36 | IonQ | GPI, GPI2, MS |
//! | `iqm-garnet` | `garnet` | 20 | IQM | PRX, CZ |
//! | `sv1` | `braket-sv1` | 34 | Amazon | Universal |
//! | `tn1` | `braket-tn1` | 50 | Amazon | Universal |
//! | `dm1` | `braket-dm1` | 17 | Amazon | Universal |
//!
//! Any other `arn:aws:braket:...` device ARN is accepted; its capabilities
//! are discovered through `GetDevice`.
//!
//! # Authentication
//!
//! AWS credentials are loaded from the standard AWS credential chain:
//! environment variables, shared config, SSO, or IAM role.
//!
//! Result location, unless given explicitly through [`BraketConfig`]:
//! - `KICKBACK_BRAKET_S3_BUCKET` (required)
//! - `KICKBACK_BRAKET_S3_PREFIX` (default: `"kickback-results"`)
//! - `AWS_REGION` (default: `"us-east-1"`; QPUs always use their own region)
//!
//! # Example
//!
//! ```ignore
//! use kickback_adapter_braket::{BraketBackend, BraketConfig, device};
//! use kickback_hal::Backend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BraketConfig::new("amazon-braket-my-results");
//!     let backend = BraketBackend::connect("sv1", device::SV1, config).await?;
//!
//!     let caps = backend.capabilities();
//!     println!("Max qubits: {}", caps.num_qubits);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod backend;
pub mod device;
mod error;

use kickback_hal::{Backend, BackendConfig, BackendRegistry};

pub use api::BraketConfig;
pub use backend::BraketBackend;
pub use error::{BraketError, BraketResult};

/// Register every catalogued device, its aliases and the raw-ARN prefix.
pub fn register_devices(registry: &mut BackendRegistry) {
    for known in device::KNOWN_DEVICES {
        registry.register_factory(known.name, connect_boxed);
        for alias in known.aliases {
            registry.register_alias(*alias, known.name);
        }
    }
    registry.register_prefix(device::ARN_PREFIX, connect_boxed);
}

async fn connect_boxed(config: BackendConfig) -> kickback_hal::HalResult<Box<dyn Backend>> {
    let backend = BraketBackend::from_backend_config(config).await?;
    Ok(Box::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_devices() {
        let mut registry = BackendRegistry::new();
        register_devices(&mut registry);

        assert!(registry.has_backend("sv1"));
        assert!(registry.has_backend("Rigetti"));
        assert_eq!(registry.resolve("ionq"), Some("aria-1".to_string()));
        assert_eq!(registry.resolve("forte"), Some("forte-1".to_string()));
        assert!(registry.has_backend("arn:aws:braket:us-east-1::device/qpu/ionq/Forte-2"));
        assert!(!registry.has_backend("simulator"));
        assert_eq!(registry.available_backends().len(), device::KNOWN_DEVICES.len());
    }
}
