//! Bernstein-Vazirani on Kickback backends.
//!
//! The hidden bit string `s` is recovered with a single oracle query by
//! letting the oracle kick its phase back onto the input register:
//!
//! ```text
//! q[0..n) ─ H ─┤        ├─ H ─ measure ─→ s
//!              │ oracle │
//! q[n]    ─────┤  U_s   ├───── measure ─→ 1
//! ```
//!
//! | Stage | Item |
//! |-------|------|
//! | Parse | [`SecretString`] |
//! | Oracle | [`oracle`] |
//! | Assemble | [`bernstein_vazirani`] |
//! | Execute | [`ExecutionClient`] |
//! | Decode | [`decode()`] |
//! | Present | [`render_histogram`], [`render_svg`] |
//!
//! # Example
//!
//! ```ignore
//! use kickback_bv::{ExecutionClient, SecretString};
//! use kickback_adapter_sim::SimulatorBackend;
//!
//! let secret: SecretString = "101".parse()?;
//! let client = ExecutionClient::new(Box::new(SimulatorBackend::new()));
//! let outcome = client.run_secret(&secret, 100).await?;
//! assert_eq!(outcome.secret, "101");
//! ```

pub mod algorithm;
pub mod client;
pub mod decode;
pub mod error;
pub mod histogram;
pub mod oracle;
pub mod secret;

pub use algorithm::{bernstein_vazirani, bernstein_vazirani_unmeasured};
pub use client::{DEFAULT_SHOTS, ExecutionClient};
pub use decode::{BvOutcome, decode};
pub use error::{BvError, BvResult};
pub use histogram::{HistogramOptions, render_histogram, render_svg};
pub use oracle::{oracle, oracle_from_str};
pub use secret::SecretString;
