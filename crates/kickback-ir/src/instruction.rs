//! Instructions: an operation plus the wires it acts on.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(StandardGate),
    /// Qubit `qubits[i]` is read into `clbits[i]`.
    Measure,
    /// Scheduling fence with no effect on the state.
    Barrier,
}

/// One step of a circuit.
///
/// For two-qubit gates `qubits` is `[control, target]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    /// Empty except for measurements.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn on(kind: InstructionKind, qubits: Vec<QubitId>, clbits: Vec<ClbitId>) -> Self {
        Self {
            kind,
            qubits,
            clbits,
        }
    }

    /// A gate on an arbitrary operand list.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(
            InstructionKind::Gate(gate),
            qubits.into_iter().collect(),
            Vec::new(),
        )
    }

    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::on(InstructionKind::Gate(gate), vec![qubit], Vec::new())
    }

    pub fn two_qubit_gate(gate: StandardGate, control: QubitId, target: QubitId) -> Self {
        Self::on(InstructionKind::Gate(gate), vec![control, target], Vec::new())
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self::on(InstructionKind::Measure, vec![qubit], vec![clbit])
    }

    /// Measure several qubits at once, pairing operands positionally.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        let clbits: Vec<ClbitId> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::OperandMismatch(format!(
                "{} qubits measured into {} classical bits",
                qubits.len(),
                clbits.len()
            )));
        }
        Ok(Self::on(InstructionKind::Measure, qubits, clbits))
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(
            InstructionKind::Barrier,
            qubits.into_iter().collect(),
            Vec::new(),
        )
    }

    pub fn is_measure(&self) -> bool {
        self.kind == InstructionKind::Measure
    }

    pub fn is_barrier(&self) -> bool {
        self.kind == InstructionKind::Barrier
    }

    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            InstructionKind::Measure | InstructionKind::Barrier => None,
        }
    }

    /// Lower-case mnemonic: the gate name, `measure` or `barrier`.
    pub fn name(&self) -> &str {
        self.as_gate().map_or_else(
            || if self.is_measure() { "measure" } else { "barrier" },
            StandardGate::name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cx_operand_order() {
        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(2), QubitId(5));
        assert_eq!(cx.qubits, vec![QubitId(2), QubitId(5)]);
        assert!(cx.clbits.is_empty());
        assert_eq!(cx.name(), "cx");
        assert_eq!(cx.as_gate(), Some(&StandardGate::CX));
    }

    #[test]
    fn test_measure_names() {
        let m = Instruction::measure(QubitId(1), ClbitId(1));
        assert!(m.is_measure());
        assert!(m.as_gate().is_none());
        assert_eq!(m.name(), "measure");

        let b = Instruction::barrier([QubitId(0), QubitId(1)]);
        assert!(b.is_barrier());
        assert_eq!(b.name(), "barrier");
    }

    #[test]
    fn test_measure_all_pairs_operands() {
        let m = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0), ClbitId(1)])
            .unwrap();
        assert_eq!(m.clbits, vec![ClbitId(0), ClbitId(1)]);

        let mismatch = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0)]);
        assert!(matches!(mismatch, Err(IrError::OperandMismatch(_))));
    }
}
