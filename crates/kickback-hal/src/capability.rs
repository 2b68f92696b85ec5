//! Backend capability introspection.
//!
//! Describes what a quantum backend can do: qubit count, supported gates,
//! connectivity, shot limits and device-wide noise averages. The execution
//! client checks these before submitting anything; `kickback backends`
//! prints them.

use serde::{Deserialize, Serialize};

/// Hardware capabilities of a quantum backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (Kickback IR naming).
    pub gate_set: GateSet,
    /// Qubit connectivity.
    pub topology: Topology,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Device-wide noise averages, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_profile: Option<NoiseProfile>,
}

impl Capabilities {
    /// Create capabilities for the local simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            topology: Topology::full(num_qubits),
            max_shots: 100_000,
            is_simulator: true,
            noise_profile: None,
        }
    }

    /// Create capabilities for Braket Rigetti devices (superconducting).
    pub fn braket_rigetti(name: impl Into<String>, num_qubits: u32) -> Self {
        let side = f64::from(num_qubits).sqrt().ceil() as u32;
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::rigetti(),
            topology: Topology::grid(side, side),
            max_shots: 100_000,
            is_simulator: false,
            noise_profile: None,
        }
    }

    /// Create capabilities for Braket IonQ devices (trapped-ion).
    pub fn braket_ionq(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::ionq(),
            topology: Topology::full(num_qubits),
            max_shots: 10_000,
            is_simulator: false,
            noise_profile: None,
        }
    }

    /// Create capabilities for IQM devices reached through Braket.
    pub fn braket_iqm(name: impl Into<String>, num_qubits: u32) -> Self {
        let side = f64::from(num_qubits).sqrt().ceil() as u32;
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::iqm(),
            topology: Topology::grid(side, side),
            max_shots: 20_000,
            is_simulator: false,
            noise_profile: None,
        }
    }

    /// Create capabilities for Braket managed simulators (SV1, TN1, DM1).
    pub fn braket_simulator(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::universal(),
            topology: Topology::full(num_qubits),
            max_shots: 100_000,
            is_simulator: true,
            noise_profile: None,
        }
    }

    /// Attach a noise profile to these capabilities.
    pub fn with_noise_profile(mut self, profile: NoiseProfile) -> Self {
        self.noise_profile = Some(profile);
        self
    }

    /// Gate names used by `circuit` that this backend does not accept.
    ///
    /// Measurements and barriers are always accepted.
    pub fn unsupported_gates(&self, circuit: &kickback_ir::Circuit) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = circuit
            .instructions()
            .iter()
            .filter_map(|inst| inst.as_gate())
            .map(|gate| gate.name())
            .filter(|name| !self.gate_set.contains(name))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

/// Gate set supported by a backend.
///
/// Gate names follow the Kickback IR naming (`h`, `cx`, `ry`, ...). The
/// `native` list identifies gates that execute without decomposition; the
/// cloud service compiles the rest. If `native` is empty, all supported
/// gates are considered native (typical for simulators).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Native gates (execute without decomposition on this backend).
    pub native: Vec<String>,
}

impl GateSet {
    /// Every gate in the Kickback IR.
    pub fn universal() -> Self {
        Self {
            single_qubit: strings(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz",
            ]),
            two_qubit: strings(&["cx", "cz", "swap"]),
            native: vec![],
        }
    }

    /// Rigetti gate set. Braket compiles standard gates down to the native
    /// `rx`/`rz`/`cz` set.
    pub fn rigetti() -> Self {
        Self {
            native: strings(&["rx", "rz", "cz"]),
            ..Self::universal()
        }
    }

    /// IonQ gate set (trapped-ion). Native gates: GPi, GPi2 and MS, exposed
    /// to OpenQASM programs only as verbatim pulses.
    pub fn ionq() -> Self {
        Self {
            native: strings(&["gpi", "gpi2", "ms"]),
            ..Self::universal()
        }
    }

    /// IQM gate set. Native gates: phased-RX and CZ.
    pub fn iqm() -> Self {
        Self {
            native: strings(&["prx", "cz"]),
            ..Self::universal()
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate) || self.two_qubit.iter().any(|g| g == gate)
    }

    /// Check if a gate is native (executes without decomposition).
    pub fn is_native(&self, gate: &str) -> bool {
        if self.native.is_empty() {
            self.contains(gate)
        } else {
            self.native.iter().any(|g| g == gate)
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Qubit connectivity as an undirected coupling list.
///
/// Cloud devices compile two-qubit gates onto their couplers, so this is
/// informational: it is shown to the user, not enforced at submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub kind: TopologyKind,
    /// Coupled qubit pairs, each listed once.
    pub edges: Vec<(u32, u32)>,
}

impl Topology {
    /// All-to-all connectivity, as on simulators and trapped-ion devices.
    pub fn full(n: u32) -> Self {
        let edges = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        Self {
            kind: TopologyKind::FullyConnected,
            edges,
        }
    }

    /// Nearest-neighbour square lattice, row-major qubit numbering.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let idx = r * cols + c;
                if c + 1 < cols {
                    edges.push((idx, idx + 1));
                }
                if r + 1 < rows {
                    edges.push((idx, idx + cols));
                }
            }
        }
        Self {
            kind: TopologyKind::Grid { rows, cols },
            edges,
        }
    }

    /// One-line summary, e.g. `grid 3x3, 12 couplers`.
    pub fn summary(&self) -> String {
        format!("{}, {} couplers", self.kind, self.edges.len())
    }
}

/// Kind of qubit topology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopologyKind {
    /// Fully connected (all-to-all).
    FullyConnected,
    /// 2D grid.
    Grid { rows: u32, cols: u32 },
}

impl std::fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyKind::FullyConnected => write!(f, "all-to-all"),
            TopologyKind::Grid { rows, cols } => write!(f, "grid {rows}x{cols}"),
        }
    }
}

/// Device-wide noise averages reported by a backend.
///
/// Fidelities are in `[0.0, 1.0]`; T1 and T2 are in microseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// T1 relaxation time (device average, microseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<f64>,
    /// T2 dephasing time (device average, microseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t2: Option<f64>,
    /// Average single-qubit gate fidelity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_qubit_fidelity: Option<f64>,
    /// Average two-qubit gate fidelity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_qubit_fidelity: Option<f64>,
    /// Average readout fidelity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout_fidelity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickback_ir::{Circuit, QubitId};

    #[test]
    fn test_capabilities_simulator() {
        let caps = Capabilities::simulator(10);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 10);
        assert!(caps.gate_set.contains("h"));
        assert!(caps.gate_set.is_native("ry"));
    }

    #[test]
    fn test_hardware_supported_vs_native() {
        let caps = Capabilities::braket_rigetti("Ankaa-3", 84);
        assert!(!caps.is_simulator);
        assert!(caps.gate_set.contains("cx"));
        assert!(caps.gate_set.contains("ry"));
        assert!(!caps.gate_set.is_native("cx"));
        assert!(caps.gate_set.is_native("cz"));

        let iqm = Capabilities::braket_iqm("Garnet", 20);
        assert!(iqm.gate_set.is_native("prx"));
        assert!(!iqm.gate_set.contains("prx"));
    }

    #[test]
    fn test_unsupported_gates() {
        let mut caps = Capabilities::simulator(4);
        caps.gate_set.single_qubit.retain(|g| g != "ry");

        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit
            .ry(0.5, QubitId(0))
            .unwrap()
            .ry(0.25, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        assert_eq!(caps.unsupported_gates(&circuit), vec!["ry"]);
        assert!(Capabilities::simulator(4).unsupported_gates(&circuit).is_empty());
    }

    #[test]
    fn test_topology_grid() {
        let topo = Topology::grid(2, 3);
        // 0 - 1 - 2
        // |   |   |
        // 3 - 4 - 5
        assert_eq!(topo.edges.len(), 7);
        assert!(topo.edges.contains(&(0, 1)));
        assert!(topo.edges.contains(&(1, 4)));
        assert!(!topo.edges.contains(&(0, 4)));
        assert_eq!(topo.summary(), "grid 2x3, 7 couplers");
    }

    #[test]
    fn test_topology_full() {
        let topo = Topology::full(4);
        assert_eq!(topo.edges.len(), 6);
        assert!(topo.edges.contains(&(0, 3)));
        assert_eq!(topo.summary(), "all-to-all, 6 couplers");
    }

    #[test]
    fn test_presets_carry_connectivity() {
        assert_eq!(
            Capabilities::braket_iqm("Garnet", 20).topology.kind,
            TopologyKind::Grid { rows: 5, cols: 5 }
        );
        assert_eq!(
            Capabilities::braket_ionq("Aria 1", 25).topology.kind,
            TopologyKind::FullyConnected
        );
    }
}
