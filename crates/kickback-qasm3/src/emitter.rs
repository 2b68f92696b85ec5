//! QASM3 emitter for serializing circuits.

use kickback_ir::{Circuit, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{EmitError, EmitResult};

/// Output flavour of the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Standard OpenQASM 3.0 (`stdgates.inc` names).
    #[default]
    Qasm3,
    /// The OpenQASM 3 subset accepted by Amazon Braket.
    Braket,
}

impl Dialect {
    /// Short name used in messages and CLI flags.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Qasm3 => "qasm3",
            Dialect::Braket => "braket",
        }
    }
}

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Qasm3).emit_circuit(circuit)
}

/// Emit a circuit in the dialect Amazon Braket accepts.
///
/// Braket spells CNOT as `cnot` and the dagger gates as `si`/`ti`, names the
/// classical register `b`, does not take an `include` line, and rejects
/// barriers.
pub fn emit_braket(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Braket).emit_circuit(circuit)
}

/// Emit a circuit in the given dialect.
pub fn emit_with(circuit: &Circuit, dialect: Dialect) -> EmitResult<String> {
    Emitter::new(dialect).emit_circuit(circuit)
}

struct Emitter {
    dialect: Dialect,
    output: String,
}

impl Emitter {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            output: String::new(),
        }
    }

    fn emit_circuit(mut self, circuit: &Circuit) -> EmitResult<String> {
        self.writeln("OPENQASM 3.0;");
        if self.dialect == Dialect::Qasm3 {
            self.writeln("include \"stdgates.inc\";");
        }
        self.writeln("");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }

        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] {};", self.creg()));
        }

        if num_qubits > 0 || num_clbits > 0 {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(self.output)
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = self.gate_name(gate);
                let qubits = emit_qubits(&instruction.qubits);
                match gate.angle() {
                    Some(theta) => self.writeln(&format!("{name}({}) {qubits};", emit_param(theta))),
                    None => self.writeln(&format!("{name} {qubits};")),
                }
            }

            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(EmitError::MalformedMeasure(format!(
                        "{} qubits, {} clbits",
                        instruction.qubits.len(),
                        instruction.clbits.len()
                    )));
                }
                // One statement per bit; Braket rejects register-wide measure.
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("{}[{}] = measure {};", self.creg(), c.0, qubit(*q)));
                }
            }

            InstructionKind::Barrier => {
                if self.dialect == Dialect::Braket {
                    return Err(EmitError::Unsupported {
                        instruction: "barrier".into(),
                        dialect: self.dialect.name(),
                    });
                }
                let qubits = emit_qubits(&instruction.qubits);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }

        Ok(())
    }

    fn creg(&self) -> &'static str {
        match self.dialect {
            Dialect::Qasm3 => "c",
            Dialect::Braket => "b",
        }
    }

    fn gate_name(&self, gate: &StandardGate) -> &'static str {
        match (self.dialect, gate) {
            (Dialect::Braket, StandardGate::CX) => "cnot",
            (Dialect::Braket, StandardGate::I) => "i",
            (Dialect::Braket, StandardGate::Sdg) => "si",
            (Dialect::Braket, StandardGate::Tdg) => "ti",
            _ => gate.name(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_param(v: f64) -> String {
    // Check if close to common fractions of pi
    let pi = std::f64::consts::PI;
    if (v - pi).abs() < 1e-10 {
        "pi".into()
    } else if (v + pi).abs() < 1e-10 {
        "-pi".into()
    } else if (v - pi / 2.0).abs() < 1e-10 {
        "pi/2".into()
    } else if (v - pi / 4.0).abs() < 1e-10 {
        "pi/4".into()
    } else if (v + pi / 2.0).abs() < 1e-10 {
        "-pi/2".into()
    } else if (v + pi / 4.0).abs() < 1e-10 {
        "-pi/4".into()
    } else {
        format!("{v:.6}")
    }
}

fn qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickback_ir::ClbitId;
    use std::f64::consts::FRAC_PI_2;

    fn kickback_fragment() -> Circuit {
        let mut circuit = Circuit::with_size("fragment", 2, 1);
        circuit
            .ry(-FRAC_PI_2, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .sdg(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        circuit
    }

    #[test]
    fn test_emit_bell() {
        let qasm = emit(&Circuit::bell().unwrap()).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_emit_params() {
        let qasm = emit(&kickback_fragment()).unwrap();
        assert!(qasm.contains("ry(-pi/2) q[1];"));
        assert!(qasm.contains("sdg q[0];"));
    }

    #[test]
    fn test_braket_dialect_names() {
        let qasm = emit_braket(&kickback_fragment()).unwrap();
        assert!(!qasm.contains("include"));
        assert!(qasm.contains("bit[1] b;"));
        assert!(qasm.contains("b[0] = measure q[0];"));
        assert!(qasm.contains("cnot q[0], q[1];"));
        assert!(qasm.contains("si q[0];"));
        assert!(!qasm.contains("cx "));
    }

    #[test]
    fn test_braket_rejects_barrier() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.barrier([QubitId(0), QubitId(1)]).unwrap();
        assert!(emit(&circuit).unwrap().contains("barrier q[0], q[1];"));
        assert!(matches!(
            emit_braket(&circuit),
            Err(EmitError::Unsupported { dialect: "braket", .. })
        ));
    }

    #[test]
    fn test_broadcast_measure_expands() {
        let mut circuit = Circuit::with_size("m", 3, 0);
        circuit.measure_all().unwrap();
        let qasm = emit_with(&circuit, Dialect::Braket).unwrap();
        for i in 0..3 {
            assert!(qasm.contains(&format!("b[{i}] = measure q[{i}];")));
        }
    }

    #[test]
    fn test_arbitrary_angle() {
        assert_eq!(emit_param(0.3), "0.300000");
        assert_eq!(emit_param(-std::f64::consts::PI), "-pi");
    }
}
