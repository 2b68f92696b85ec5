//! Kickback Local Statevector Simulator
//!
//! A noiseless local backend for development and for checking algorithm
//! output offline. Each circuit is simulated once as a dense statevector;
//! every shot is then sampled from the final distribution, so the shot count
//! barely affects run time.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 16 | ~1 MB | Fast |
//! | 21 | ~32 MB | Moderate |
//! | 24 | ~256 MB | Slow (default limit) |
//!
//! # Example
//!
//! ```ignore
//! use kickback_adapter_sim::SimulatorBackend;
//! use kickback_hal::Backend;
//! use kickback_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(7);
//!
//!     let caps = backend.capabilities();
//!     println!("Max qubits: {}", caps.num_qubits);
//!
//!     let circuit = Circuit::bell()?;
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     // Expect ~50% "00" and ~50% "11"
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::{Readout, Statevector};
