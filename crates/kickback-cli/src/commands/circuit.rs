//! Circuit command implementation.

use anyhow::Result;
use console::style;

use kickback_bv::bernstein_vazirani;
use kickback_ir::{Instruction, diagram};
use kickback_qasm3::{Dialect, emit_with};

use super::common::parse_secret;

/// Parse a `--dialect` value.
pub fn parse_dialect(name: &str) -> Result<Dialect> {
    match name.to_lowercase().as_str() {
        "qasm3" | "openqasm" => Ok(Dialect::Qasm3),
        "braket" => Ok(Dialect::Braket),
        other => anyhow::bail!("Unknown dialect: '{other}'. Available: qasm3, braket"),
    }
}

/// One line of the gate listing, e.g. `ry(-1.5708) q3` or `cx q0, q3`.
pub fn describe(instruction: &Instruction) -> String {
    let mut text = instruction.name().to_string();
    if let Some(angle) = instruction.as_gate().and_then(|g| g.angle()) {
        text.push_str(&format!("({angle:.4})"));
    }
    let qubits: Vec<String> = instruction.qubits.iter().map(ToString::to_string).collect();
    text.push(' ');
    text.push_str(&qubits.join(", "));
    if !instruction.clbits.is_empty() {
        let clbits: Vec<String> = instruction.clbits.iter().map(ToString::to_string).collect();
        text.push_str(" -> ");
        text.push_str(&clbits.join(", "));
    }
    text
}

/// Execute the circuit command.
pub fn execute(secret: &str, dialect: &str) -> Result<()> {
    let dialect = parse_dialect(dialect)?;
    let secret = parse_secret(secret)?;
    let circuit = bernstein_vazirani(&secret)?;

    println!(
        "{} Bernstein-Vazirani circuit for {} ({} qubits, ancilla q{})",
        style("→").cyan().bold(),
        style(&secret).green(),
        circuit.num_qubits(),
        secret.len()
    );

    println!("\n{}", style("Gates:").bold());
    for (i, instruction) in circuit.instructions().iter().enumerate() {
        println!("  {:>3}  {}", style(i).dim(), describe(instruction));
    }

    println!("\n{}", style("Diagram:").bold());
    for line in diagram::render(&circuit).lines() {
        println!("  {line}");
    }

    println!("\n{} ({}):", style("OpenQASM").bold(), dialect.name());
    print!("{}", emit_with(&circuit, dialect)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use kickback_ir::{ClbitId, QubitId, StandardGate};

    use super::*;

    #[test]
    fn test_parse_dialect() {
        assert_eq!(parse_dialect("qasm3").unwrap(), Dialect::Qasm3);
        assert_eq!(parse_dialect("Braket").unwrap(), Dialect::Braket);
        assert!(parse_dialect("quil").is_err());
    }

    #[test]
    fn test_describe() {
        let ry = Instruction::single_qubit_gate(StandardGate::Ry(-FRAC_PI_2), QubitId(3));
        assert_eq!(describe(&ry), "ry(-1.5708) q3");

        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(3));
        assert_eq!(describe(&cx), "cx q0, q3");

        let m = Instruction::measure(QubitId(2), ClbitId(2));
        assert_eq!(describe(&m), "measure q2 -> c2");
    }
}
