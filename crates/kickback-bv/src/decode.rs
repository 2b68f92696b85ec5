//! Recovering the secret from measurement counts.

use kickback_hal::Counts;
use serde::Serialize;

use crate::error::{BvError, BvResult};
use crate::secret::SecretString;

/// The decoded answer of a Bernstein-Vazirani run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BvOutcome {
    /// First `n` characters of the most frequent bitstring.
    pub secret: String,
    /// Value of the ancilla bit in that bitstring.
    pub ancilla: bool,
    /// Occurrences of the most frequent bitstring.
    pub count: u64,
    /// Total shots across all outcomes.
    pub total: u64,
    /// `count / total`.
    pub success_ratio: f64,
}

impl BvOutcome {
    /// Whether the recovered bits equal `secret`.
    pub fn matches(&self, secret: &SecretString) -> bool {
        self.secret == secret.to_string()
    }
}

/// Decode counts over `n + 1` bits, reading the first `n` as the secret.
///
/// Ties between equally frequent bitstrings go to the smallest bitstring.
pub fn decode(counts: &Counts, n: usize) -> BvResult<BvOutcome> {
    let total = counts.total_shots();
    if counts.is_empty() || total == 0 {
        return Err(BvError::ExecutionFailure(
            "backend returned no measurement outcomes".into(),
        ));
    }

    for (bitstring, _) in counts.iter() {
        if bitstring.len() < n + 1 {
            return Err(BvError::ExecutionFailure(format!(
                "outcome '{bitstring}' has {} bits, expected at least {}",
                bitstring.len(),
                n + 1
            )));
        }
        if !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(BvError::ExecutionFailure(format!(
                "outcome '{bitstring}' is not a bit string"
            )));
        }
    }

    let (best, &count) = counts
        .most_frequent()
        .ok_or_else(|| BvError::ExecutionFailure("no most frequent outcome".into()))?;

    Ok(BvOutcome {
        secret: best[..n].to_string(),
        ancilla: best.as_bytes()[n] == b'1',
        count,
        total,
        success_ratio: count as f64 / total as f64,
    })
}
