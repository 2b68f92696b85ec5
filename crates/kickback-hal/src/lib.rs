//! Kickback Hardware Abstraction Layer
//!
//! A unified interface for the quantum backends Kickback runs circuits on,
//! from the local statevector simulator to AWS Braket devices.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe gate sets, connectivity and limits
//! - [`WaitPolicy`] to bound how long a caller blocks on a job
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//! - A [`BackendRegistry`] resolving device identifiers to backends
//!
//! # Supported Backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local Simulator | `kickback-adapter-sim` | None |
//! | Braket SV1 / TN1 / DM1 | `kickback-adapter-braket` | AWS credential chain |
//! | Rigetti, IonQ, IQM via Braket | `kickback-adapter-braket` | AWS credential chain |
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use kickback_hal::Backend;
//! use kickback_adapter_sim::SimulatorBackend;
//! use kickback_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = SimulatorBackend::new();
//!
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     if let Some((bitstring, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {} ({} times)", bitstring, count);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult, WaitPolicy,
};
pub use capability::{Capabilities, GateSet, NoiseProfile, Topology, TopologyKind};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::{BackendFuture, BackendRegistry};
pub use result::{Counts, ExecutionResult};
