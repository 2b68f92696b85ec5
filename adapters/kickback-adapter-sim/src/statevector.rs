//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use kickback_ir::{Circuit, Instruction, InstructionKind, StandardGate};

/// A statevector representing a quantum state.
///
/// Basis index bit `k` holds the value of qubit `k`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Prepare the state produced by every gate of `circuit`.
    ///
    /// Measurements and barriers are skipped; the circuit IR only allows
    /// terminal measurement semantics here.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut sv = Self::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst);
        }
        sv
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
                self.apply_gate(gate, &qubits);
            }
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match *gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_phase(qubits[0], PI),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], theta),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], theta),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Draw `shots` basis-state samples from the final state.
    ///
    /// Builds the cumulative distribution once and binary-searches it per
    /// shot, so the cost per shot is logarithmic in the state size.
    pub fn sample_counts<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> FxHashMap<usize, u64> {
        let mut cumulative = Vec::with_capacity(self.amplitudes.len());
        let mut total = 0.0;
        for amp in &self.amplitudes {
            total += amp.norm_sqr();
            cumulative.push(total);
        }

        let mut outcomes = FxHashMap::default();
        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let idx = cumulative
                .partition_point(|&c| c <= r)
                .min(self.amplitudes.len() - 1);
            *outcomes.entry(idx).or_insert(0) += 1;
        }
        outcomes
    }
}

/// Maps basis-state indices to classical bitstrings.
///
/// Character `c` of the bitstring is the value of the qubit measured into
/// classical bit `c`. A circuit without measurements is read out as if every
/// qubit `i` were measured into bit `i`.
pub struct Readout {
    /// For each classical bit, the qubit whose value lands there.
    sources: Vec<Option<usize>>,
}

impl Readout {
    /// Derive the readout layout from a circuit's measurement instructions.
    pub fn for_circuit(circuit: &Circuit) -> Self {
        let mut sources = vec![None; circuit.num_clbits()];
        let mut measured = false;
        for inst in circuit.instructions().iter().filter(|i| i.is_measure()) {
            measured = true;
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                sources[c.index()] = Some(q.index());
            }
        }
        if !measured {
            sources = (0..circuit.num_qubits()).map(Some).collect();
        }
        Self { sources }
    }

    /// Render a basis-state index as a bitstring.
    pub fn bitstring(&self, outcome: usize) -> String {
        self.sources
            .iter()
            .map(|source| match source {
                Some(q) if (outcome >> q) & 1 == 1 => '1',
                _ => '0',
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickback_ir::{ClbitId, QubitId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        for amp in &sv.amplitudes[1..] {
            assert!(approx_eq(*amp, Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_ry_minus_half_pi_prepares_minus_state() {
        let mut sv = Statevector::new(1);
        sv.apply_ry(0, -PI / 2.0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(-sqrt2_inv, 0.0)));

        // X then H takes |−⟩ to |1⟩ (up to global phase).
        sv.apply_x(0);
        sv.apply_h(0);
        let probs = sv.probabilities();
        assert!(probs[0] < 1e-12);
        assert!((probs[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_kickback() {
        // |+⟩|−⟩ --CX--> |−⟩|−⟩
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_ry(1, -PI / 2.0);
        sv.apply_cx(0, 1);
        sv.apply_h(0);
        let probs = sv.probabilities();
        // qubit 0 is now |1⟩ with certainty
        assert!((probs[0b01] + probs[0b11] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_swap_and_cz() {
        let mut sv = Statevector::new(2);
        sv.apply_x(0);
        sv.apply_swap(0, 1);
        assert!(approx_eq(sv.amplitudes[0b10], Complex64::new(1.0, 0.0)));

        sv.apply_x(0);
        sv.apply_cz(0, 1);
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(-1.0, 0.0)));
    }

    #[test]
    fn test_sample_counts_deterministic_state() {
        let mut sv = Statevector::new(2);
        sv.apply_x(1);

        let mut rng = StdRng::seed_from_u64(7);
        let counts = sv.sample_counts(500, &mut rng);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&0b10], 500);
    }

    #[test]
    fn test_sample_counts_uniform_state() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let mut rng = StdRng::seed_from_u64(42);
        let counts = sv.sample_counts(10_000, &mut rng);
        let zeros = counts.get(&0).copied().unwrap_or(0);
        assert!((4_500..=5_500).contains(&zeros), "zeros = {zeros}");
    }

    #[test]
    fn test_readout_follows_measure_mapping() {
        let mut circuit = Circuit::with_size("swap_readout", 2, 2);
        circuit
            .measure(QubitId(0), ClbitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();

        let readout = Readout::for_circuit(&circuit);
        // qubit 0 = 1, qubit 1 = 0
        assert_eq!(readout.bitstring(0b01), "01");
    }

    #[test]
    fn test_readout_without_measurements() {
        let circuit = Circuit::with_size("bare", 3, 0);
        let readout = Readout::for_circuit(&circuit);
        // Leftmost character is qubit 0.
        assert_eq!(readout.bitstring(0b001), "100");
        assert_eq!(readout.bitstring(0b110), "011");
    }
}
