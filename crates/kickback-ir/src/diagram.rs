//! Text wire diagrams for terminal output.
//!
//! Instructions are packed greedily into columns: an instruction lands in the
//! first column after every earlier instruction touching any wire between its
//! lowest and highest qubit. Multi-qubit gates draw a `┼` on the wires they
//! cross so columns never interleave unrelated operations.

use std::fmt::Write as _;

use crate::circuit::Circuit;
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};

const WIRE: char = '─';

/// Render `circuit` as one line of text per qubit.
pub fn render(circuit: &Circuit) -> String {
    let num_qubits = circuit.num_qubits();
    if num_qubits == 0 {
        return String::new();
    }

    let columns = layout(circuit);
    let label_width = format!("q{}", num_qubits - 1).len();

    let mut rows: Vec<String> = (0..num_qubits)
        .map(|q| format!("{:>label_width$}: {WIRE}", format!("q{q}")))
        .collect();

    for column in &columns {
        let mut cells: Vec<Option<String>> = vec![None; num_qubits];
        for inst in column {
            place(inst, &mut cells);
        }
        let width = cells
            .iter()
            .flatten()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(1);
        for (row, cell) in rows.iter_mut().zip(cells) {
            let text = cell.unwrap_or_default();
            let pad = width - text.chars().count();
            row.push(WIRE);
            row.push_str(&text);
            row.extend(std::iter::repeat_n(WIRE, pad + 1));
        }
    }

    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{row}");
    }
    out
}

fn layout(circuit: &Circuit) -> Vec<Vec<&Instruction>> {
    let mut frontier = vec![0usize; circuit.num_qubits()];
    let mut columns: Vec<Vec<&Instruction>> = Vec::new();

    for inst in circuit.instructions() {
        let Some((lo, hi)) = span(inst) else {
            continue;
        };
        let col = frontier[lo..=hi].iter().copied().max().unwrap_or(0);
        if columns.len() <= col {
            columns.resize_with(col + 1, Vec::new);
        }
        columns[col].push(inst);
        for slot in &mut frontier[lo..=hi] {
            *slot = col + 1;
        }
    }

    columns
}

fn span(inst: &Instruction) -> Option<(usize, usize)> {
    let lo = inst.qubits.iter().map(|q| q.index()).min()?;
    let hi = inst.qubits.iter().map(|q| q.index()).max()?;
    Some((lo, hi))
}

fn place(inst: &Instruction, cells: &mut [Option<String>]) {
    match &inst.kind {
        InstructionKind::Measure => {
            for q in &inst.qubits {
                cells[q.index()] = Some("M".into());
            }
        }
        InstructionKind::Barrier => {
            for q in &inst.qubits {
                cells[q.index()] = Some("░".into());
            }
        }
        InstructionKind::Gate(gate) if gate.num_qubits() == 2 => {
            let (a, b) = (inst.qubits[0].index(), inst.qubits[1].index());
            for cell in &mut cells[a.min(b) + 1..a.max(b)] {
                *cell = Some("┼".into());
            }
            let (first, second) = match gate {
                StandardGate::CX => ("●", "⊕"),
                StandardGate::CZ => ("●", "●"),
                _ => ("x", "x"),
            };
            cells[a] = Some(first.into());
            cells[b] = Some(second.into());
        }
        InstructionKind::Gate(gate) => {
            let label = match gate.angle() {
                Some(theta) => format!("{}({})", gate.name().to_uppercase(), format_angle(theta)),
                None => gate.name().to_uppercase(),
            };
            for q in &inst.qubits {
                cells[q.index()] = Some(label.clone());
            }
        }
    }
}

fn format_angle(theta: f64) -> String {
    use std::f64::consts::PI;
    for (den, tag) in [(1.0, ""), (2.0, "/2"), (4.0, "/4")] {
        let ratio = theta * den / PI;
        if (ratio - ratio.round()).abs() < 1e-10 {
            let k = ratio.round() as i64;
            return match k {
                0 => "0".into(),
                1 => format!("π{tag}"),
                -1 => format!("-π{tag}"),
                _ => format!("{k}π{tag}"),
            };
        }
    }
    format!("{theta:.3}")
}
