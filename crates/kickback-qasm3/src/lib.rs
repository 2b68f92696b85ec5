//! `OpenQASM` 3 Emitter for Kickback
//!
//! Serializes [`kickback_ir::Circuit`] values to `OpenQASM` 3.0 source, either
//! as standard QASM3 or in the dialect Amazon Braket accepts.
//!
//! | Construct | `qasm3` | `braket` |
//! |-----------|---------|----------|
//! | Header | `OPENQASM 3.0;` + `include "stdgates.inc";` | `OPENQASM 3.0;` |
//! | CNOT | `cx q[0], q[1];` | `cnot q[0], q[1];` |
//! | S-dagger | `sdg q[0];` | `si q[0];` |
//! | Classical register | `bit[n] c;` | `bit[n] b;` |
//! | Measurement | `c[0] = measure q[0];` | `b[0] = measure q[0];` |
//! | Barrier | `barrier q[0], q[1];` | rejected |
//!
//! # Example
//!
//! ```rust
//! use kickback_ir::Circuit;
//! use kickback_qasm3::{emit, emit_braket};
//!
//! let circuit = Circuit::bell().unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("cx q[0], q[1];"));
//!
//! let braket = emit_braket(&circuit).unwrap();
//! assert!(braket.contains("cnot q[0], q[1];"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{Dialect, emit, emit_braket, emit_with};
pub use error::{EmitError, EmitResult};
