//! Full Bernstein-Vazirani circuit assembly.

use kickback_ir::{Circuit, QubitId};

use crate::error::BvResult;
use crate::oracle::oracle;
use crate::secret::SecretString;

/// Assemble the circuit without measurements.
///
/// Hadamards on every input, the oracle, Hadamards on every input again.
/// Used for diagrams and statevector inspection.
pub fn bernstein_vazirani_unmeasured(secret: &SecretString) -> BvResult<Circuit> {
    let inputs = secret.len() as u32;
    let mut circuit =
        Circuit::with_size(format!("bernstein_vazirani_{secret}"), secret.num_qubits(), 0);

    for i in 0..inputs {
        circuit.h(QubitId(i))?;
    }
    circuit.append(&oracle(secret)?)?;
    for i in 0..inputs {
        circuit.h(QubitId(i))?;
    }
    Ok(circuit)
}

/// Assemble the full circuit, measuring qubit `i` into classical bit `i`.
///
/// Noiseless execution yields the secret on the first `len` bits and `1`
/// on the last (ancilla) bit, on every shot.
pub fn bernstein_vazirani(secret: &SecretString) -> BvResult<Circuit> {
    let mut circuit = bernstein_vazirani_unmeasured(secret)?;
    circuit.measure_all()?;
    Ok(circuit)
}
