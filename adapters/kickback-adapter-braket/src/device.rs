//! Braket device catalogue.
//!
//! Maps friendly device names and known ARNs to Kickback `Capabilities`
//! presets. Devices outside the catalogue are described from the Braket
//! `GetDevice` response instead.

use kickback_hal::{Capabilities, NoiseProfile};

// ──────────────────────────────────────────────────────────────────────
// Known device ARNs
// ──────────────────────────────────────────────────────────────────────

/// Rigetti Ankaa-3 (84 qubits, superconducting).
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// IonQ Aria (25 qubits, trapped-ion).
pub const IONQ_ARIA: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Aria 2 (25 qubits, trapped-ion).
pub const IONQ_ARIA_2: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-2";

/// IonQ Forte (36 qubits, trapped-ion).
pub const IONQ_FORTE: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet (20 qubits, superconducting).
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

/// Every Braket ARN starts with this.
pub const ARN_PREFIX: &str = "arn:aws:braket:";

/// A catalogue entry: canonical name, accepted aliases and device ARN.
#[derive(Debug, Clone, Copy)]
pub struct KnownDevice {
    /// Canonical device identifier.
    pub name: &'static str,
    /// Other identifiers resolving to the same device.
    pub aliases: &'static [&'static str],
    /// Braket device ARN.
    pub arn: &'static str,
}

/// Devices that can be selected by name.
pub const KNOWN_DEVICES: &[KnownDevice] = &[
    KnownDevice {
        name: "sv1",
        aliases: &["braket-sv1"],
        arn: SV1,
    },
    KnownDevice {
        name: "tn1",
        aliases: &["braket-tn1"],
        arn: TN1,
    },
    KnownDevice {
        name: "dm1",
        aliases: &["braket-dm1"],
        arn: DM1,
    },
    KnownDevice {
        name: "ankaa-3",
        aliases: &["rigetti", "ankaa"],
        arn: RIGETTI_ANKAA_3,
    },
    KnownDevice {
        name: "aria-1",
        aliases: &["ionq", "aria"],
        arn: IONQ_ARIA,
    },
    KnownDevice {
        name: "aria-2",
        aliases: &[],
        arn: IONQ_ARIA_2,
    },
    KnownDevice {
        name: "forte-1",
        aliases: &["forte"],
        arn: IONQ_FORTE,
    },
    KnownDevice {
        name: "iqm-garnet",
        aliases: &["garnet"],
        arn: IQM_GARNET,
    },
];

// ──────────────────────────────────────────────────────────────────────
// Preset capabilities
// ──────────────────────────────────────────────────────────────────────

/// Get capabilities for a known Braket device ARN.
///
/// Returns `None` for unknown devices; callers fall back to discovery
/// through the Braket API.
pub fn capabilities_for_device(device_arn: &str) -> Option<Capabilities> {
    let caps = match device_arn {
        RIGETTI_ANKAA_3 => Capabilities::braket_rigetti("Rigetti Ankaa-3", 84)
            .with_noise_profile(nominal_noise(0.998, 0.99, 0.97)),
        IONQ_ARIA => Capabilities::braket_ionq("IonQ Aria-1", 25)
            .with_noise_profile(nominal_noise(0.9998, 0.99, 0.993)),
        IONQ_ARIA_2 => Capabilities::braket_ionq("IonQ Aria-2", 25)
            .with_noise_profile(nominal_noise(0.9998, 0.99, 0.993)),
        IONQ_FORTE => Capabilities::braket_ionq("IonQ Forte-1", 36)
            .with_noise_profile(nominal_noise(0.9998, 0.995, 0.995)),
        IQM_GARNET => Capabilities::braket_iqm("IQM Garnet", 20)
            .with_noise_profile(nominal_noise(0.999, 0.99, 0.97)),
        SV1 => Capabilities::braket_simulator("Amazon SV1", 34),
        TN1 => Capabilities::braket_simulator("Amazon TN1", 50),
        DM1 => Capabilities::braket_simulator("Amazon DM1", 17),
        _ => return None,
    };
    Some(caps)
}

/// Vendor-published average fidelities.
fn nominal_noise(single: f64, two: f64, readout: f64) -> NoiseProfile {
    NoiseProfile {
        single_qubit_fidelity: Some(single),
        two_qubit_fidelity: Some(two),
        readout_fidelity: Some(readout),
        ..NoiseProfile::default()
    }
}

/// Map a friendly device name (or alias) to its ARN.
pub fn arn_for_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    KNOWN_DEVICES
        .iter()
        .find(|d| d.name == name || d.aliases.contains(&name.as_str()))
        .map(|d| d.arn)
}

/// Resolve a device identifier to an ARN: either a known name or a raw ARN.
pub fn resolve_device(identifier: &str) -> Option<String> {
    if identifier.starts_with(ARN_PREFIX) {
        return Some(identifier.to_string());
    }
    arn_for_name(identifier).map(str::to_string)
}

/// Extract provider name from a device ARN.
pub fn provider_from_arn(device_arn: &str) -> &str {
    // arn:aws:braket:<region>::device/<type>/<provider>/<device>
    device_arn.split('/').nth(2).unwrap_or("unknown")
}

/// The region pinned in a device ARN, if any. Managed simulators have none.
pub fn region_from_arn(device_arn: &str) -> Option<&str> {
    device_arn
        .strip_prefix(ARN_PREFIX)?
        .split(':')
        .next()
        .filter(|region| !region.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_device_capabilities() {
        let caps = capabilities_for_device(RIGETTI_ANKAA_3).unwrap();
        assert_eq!(caps.num_qubits, 84);
        assert!(!caps.is_simulator);
        assert!(caps.gate_set.is_native("rx"));
        assert!(caps.gate_set.is_native("cz"));
        assert!(caps.gate_set.contains("cx"));
        assert!(caps.noise_profile.is_some());
    }

    #[test]
    fn test_ionq_capabilities() {
        let caps = capabilities_for_device(IONQ_ARIA).unwrap();
        assert_eq!(caps.num_qubits, 25);
        assert_eq!(caps.max_shots, 10_000);
        assert!(caps.gate_set.contains("ry"));
        assert!(caps.gate_set.is_native("ms"));
    }

    #[test]
    fn test_simulator_capabilities() {
        let caps = capabilities_for_device(SV1).unwrap();
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 34);
        assert!(caps.noise_profile.is_none());
        assert_eq!(capabilities_for_device(DM1).unwrap().num_qubits, 17);
    }

    #[test]
    fn test_unknown_device() {
        assert!(capabilities_for_device("arn:aws:braket:::device/qpu/unknown/foo").is_none());
    }

    #[test]
    fn test_catalogue_entries_have_presets() {
        for device in KNOWN_DEVICES {
            assert!(
                capabilities_for_device(device.arn).is_some(),
                "{} has no preset",
                device.name
            );
        }
    }

    #[test]
    fn test_arn_for_name() {
        assert_eq!(arn_for_name("rigetti"), Some(RIGETTI_ANKAA_3));
        assert_eq!(arn_for_name("Ankaa-3"), Some(RIGETTI_ANKAA_3));
        assert_eq!(arn_for_name("sv1"), Some(SV1));
        assert_eq!(arn_for_name("ionq"), Some(IONQ_ARIA));
        assert_eq!(arn_for_name("forte"), Some(IONQ_FORTE));
        assert!(arn_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_resolve_device() {
        assert_eq!(resolve_device("tn1").as_deref(), Some(TN1));
        let raw = "arn:aws:braket:us-east-1::device/qpu/ionq/Future-9";
        assert_eq!(resolve_device(raw).as_deref(), Some(raw));
        assert!(resolve_device("local").is_none());
    }

    #[test]
    fn test_provider_from_arn() {
        assert_eq!(provider_from_arn(RIGETTI_ANKAA_3), "rigetti");
        assert_eq!(provider_from_arn(IONQ_ARIA), "ionq");
        assert_eq!(provider_from_arn(SV1), "amazon");
    }

    #[test]
    fn test_region_from_arn() {
        assert_eq!(region_from_arn(RIGETTI_ANKAA_3), Some("us-west-1"));
        assert_eq!(region_from_arn(IQM_GARNET), Some("eu-north-1"));
        assert_eq!(region_from_arn(SV1), None);
        assert_eq!(region_from_arn("not-an-arn"), None);
    }
}
