//! Phase-kickback oracle for `f(x) = x·s mod 2`.

use std::f64::consts::FRAC_PI_2;

use kickback_ir::{Circuit, QubitId};
use tracing::debug;

use crate::error::BvResult;
use crate::secret::SecretString;

/// Build the oracle fragment for `secret` on `len + 1` qubits.
///
/// The ancilla (qubit `len`) is rotated into |−⟩ with `Ry(−π/2)`, each `1`
/// bit contributes a CX from its input qubit onto the ancilla, and `X`
/// followed by `H` returns the ancilla to the computational basis in |1⟩.
pub fn oracle(secret: &SecretString) -> BvResult<Circuit> {
    let n = secret.len() as u32;
    let ancilla = QubitId(n);
    let mut circuit = Circuit::with_size(format!("bv_oracle_{secret}"), n + 1, 0);

    circuit.ry(-FRAC_PI_2, ancilla)?;
    for i in secret.ones() {
        circuit.cx(QubitId(i as u32), ancilla)?;
    }
    circuit.x(ancilla)?.h(ancilla)?;

    debug!(
        "Built oracle for {} bits with {} CX gates",
        secret.len(),
        secret.ones().len()
    );
    Ok(circuit)
}

/// Parse `secret` and build its oracle.
pub fn oracle_from_str(secret: &str) -> BvResult<Circuit> {
    oracle(&SecretString::parse(secret)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BvError;
    use kickback_ir::StandardGate;

    fn controls(circuit: &Circuit) -> Vec<u32> {
        circuit
            .instructions()
            .iter()
            .filter(|inst| inst.as_gate() == Some(&StandardGate::CX))
            .map(|inst| inst.qubits[0].0)
            .collect()
    }

    #[test]
    fn test_oracle_101() {
        let circuit = oracle_from_str("101").unwrap();
        assert_eq!(circuit.num_qubits(), 4);

        let gates: Vec<(StandardGate, Vec<u32>)> = circuit
            .instructions()
            .iter()
            .map(|inst| {
                (
                    *inst.as_gate().unwrap(),
                    inst.qubits.iter().map(|q| q.0).collect(),
                )
            })
            .collect();

        assert_eq!(
            gates,
            vec![
                (StandardGate::Ry(-FRAC_PI_2), vec![3]),
                (StandardGate::CX, vec![0, 3]),
                (StandardGate::CX, vec![2, 3]),
                (StandardGate::X, vec![3]),
                (StandardGate::H, vec![3]),
            ]
        );
    }

    #[test]
    fn test_oracle_without_ones_has_no_cx() {
        let circuit = oracle_from_str("0000").unwrap();
        assert!(controls(&circuit).is_empty());
        assert_eq!(circuit.num_ops(), 3);
    }

    #[test]
    fn test_controls_follow_secret() {
        let circuit = oracle_from_str("0110100").unwrap();
        assert_eq!(controls(&circuit), vec![1, 2, 4]);
    }

    #[test]
    fn test_oracle_is_deterministic() {
        assert_eq!(
            oracle_from_str("110101").unwrap(),
            oracle_from_str("110101").unwrap()
        );
    }

    #[test]
    fn test_invalid_secrets() {
        for bad in ["", "12", "1 1"] {
            assert!(matches!(
                oracle_from_str(bad),
                Err(BvError::InvalidArgument(_))
            ));
        }
    }
}
