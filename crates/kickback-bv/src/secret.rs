//! The hidden bit string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BvError, BvResult};

/// A non-empty string of bits, parsed from `'0'`/`'1'` characters.
///
/// Bit `i` of the secret is read out on qubit `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretString {
    bits: Vec<bool>,
}

impl SecretString {
    /// Parse a secret, rejecting empty input and non-binary characters.
    pub fn parse(s: &str) -> BvResult<Self> {
        if s.is_empty() {
            return Err(BvError::InvalidArgument(
                "secret must contain at least one bit".into(),
            ));
        }
        let bits = s
            .chars()
            .enumerate()
            .map(|(i, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(BvError::InvalidArgument(format!(
                    "secret may only contain '0' and '1', found {other:?} at position {i}"
                ))),
            })
            .collect::<BvResult<Vec<_>>>()?;
        if u32::try_from(bits.len()).is_err() {
            return Err(BvError::InvalidArgument(format!(
                "secret of {} bits is too long",
                bits.len()
            )));
        }
        Ok(Self { bits })
    }

    /// Number of bits; also the number of input qubits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always `false`: a parsed secret has at least one bit.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits in order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Indices of the `1` bits, ascending. These are the oracle's CX controls.
    pub fn ones(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &bit)| bit.then_some(i))
            .collect()
    }

    /// Width of the Bernstein-Vazirani circuit: inputs plus the ancilla.
    pub fn num_qubits(&self) -> u32 {
        self.bits.len() as u32 + 1
    }
}

impl FromStr for SecretString {
    type Err = BvError;

    fn from_str(s: &str) -> BvResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SecretString {
    type Error = BvError;

    fn try_from(s: String) -> BvResult<Self> {
        Self::parse(&s)
    }
}

impl From<SecretString> for String {
    fn from(secret: SecretString) -> Self {
        secret.to_string()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let secret = SecretString::parse("10110").unwrap();
        assert_eq!(secret.len(), 5);
        assert_eq!(secret.num_qubits(), 6);
        assert_eq!(secret.to_string(), "10110");
        assert_eq!(secret.ones(), vec![0, 2, 3]);
    }

    #[test]
    fn test_all_zero_secret_has_no_ones() {
        let secret: SecretString = "000".parse().unwrap();
        assert!(secret.ones().is_empty());
        assert!(!secret.is_empty());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            SecretString::parse(""),
            Err(BvError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_non_binary() {
        for bad in ["102", "1 0", "abc", "0b1", "１"] {
            let err = SecretString::parse(bad).unwrap_err();
            assert!(matches!(err, BvError::InvalidArgument(_)), "{bad}");
        }
        let err = SecretString::parse("10x").unwrap_err();
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_serde_as_string() {
        let secret = SecretString::parse("011").unwrap();
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"011\"");

        let back: SecretString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
        assert!(serde_json::from_str::<SecretString>("\"012\"").is_err());
    }
}
