//! Quantum circuit structure for HEA
//!
//! Gantree: L1_Circuit → Circuit
//!
//! Gate list over a fixed qubit register. Ansatz circuits are produced
//! here and handed to a backend for execution.

use crate::error::{HeaError, HeaResult};
use crate::gate::Gate;
use crate::topology::Topology;
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Gate sequence
    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,

    /// Optional circuit name
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create from a vector of gates, validating qubit indices
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> HeaResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> HeaResult<()> {
        if let Some(qubit) = gate.qubits().into_iter().find(|&q| q >= self.num_qubits) {
            return Err(HeaError::GateQubitMismatch {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> HeaResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Calculate circuit depth (longest path)
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in &self.gates {
            if gate.is_barrier() {
                continue;
            }
            let qubits = gate.qubits();
            if qubits.is_empty() {
                // MeasureAll touches every qubit
                let level = qubit_depths.iter().max().copied().unwrap_or(0) + 1;
                qubit_depths.iter_mut().for_each(|d| *d = level);
            } else {
                let level = qubits
                    .iter()
                    .filter_map(|&q| qubit_depths.get(q))
                    .max()
                    .copied()
                    .unwrap_or(0)
                    + 1;
                for q in qubits {
                    if let Some(d) = qubit_depths.get_mut(q) {
                        *d = level;
                    }
                }
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Get total gate count
    /// Gantree: gate_count(&self) -> usize // 게이트 수
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit gates
    /// Gantree: count_1q(&self) -> usize // 1Q 수
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_single_qubit()).count()
    }

    /// Count two-qubit gates
    /// Gantree: count_2q(&self) -> usize // 2Q 수
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Count measurement operations
    pub fn count_measurements(&self) -> usize {
        self.gates.iter().filter(|g| g.is_measurement()).count()
    }

    /// Count parameterized gates
    pub fn count_parameterized(&self) -> usize {
        self.gates.iter().filter(|g| g.is_parameterized()).count()
    }

    /// All gate angles in gate order
    pub fn angles(&self) -> Vec<Angle> {
        self.gates.iter().flat_map(|g| g.angles()).collect()
    }

    /// Check whether the circuit ends in measurement of any qubit
    pub fn has_measurements(&self) -> bool {
        self.gates.iter().any(|g| g.is_measurement())
    }

    /// Get two-qubit gate pairs (for topology validation)
    pub fn two_qubit_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.gates
            .iter()
            .filter_map(|g| match g {
                Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate circuit against a topology
    /// Gantree: validate(&self, Topology) -> Result // 토폴로지 검증
    pub fn validate(&self, topology: &Topology) -> HeaResult<()> {
        topology.validate_circuit(self)
    }

    // ========================================================================
    // QASM Conversion
    // ========================================================================

    /// Convert to OpenQASM 2.0 string
    /// Gantree: to_qasm(&self) -> String // QASM2 출력
    pub fn to_qasm(&self) -> String {
        let mut lines = vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            String::new(),
            format!("qreg q[{}];", self.num_qubits),
            format!("creg c[{}];", self.num_qubits),
            String::new(),
        ];

        lines.extend(self.gates.iter().map(Gate::to_qasm));
        lines.join("\n")
    }

    /// Parse from OpenQASM 2.0 string (basic support)
    /// Gantree: from_qasm(s) -> Result<Self> // QASM2 파싱
    pub fn from_qasm(qasm: &str) -> HeaResult<Self> {
        let mut num_qubits = 0;
        let mut gates = Vec::new();

        for line in qasm.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if line.starts_with("qreg") {
                num_qubits = parse_register_size(line)
                    .ok_or_else(|| HeaError::InvalidQasm(format!("Bad qreg: {}", line)))?;
                continue;
            }

            if line.starts_with("OPENQASM")
                || line.starts_with("include")
                || line.starts_with("creg")
            {
                continue;
            }

            gates.push(parse_gate_line(line)?);
        }

        if num_qubits == 0 {
            return Err(HeaError::InvalidQasm("No qreg declaration found".into()));
        }

        Circuit::from_gates(num_qubits, gates)
    }
}

// ============================================================================
// QASM Parsing Helpers
// ============================================================================

fn parse_register_size(line: &str) -> Option<usize> {
    // "qreg q[N];" -> N
    let start = line.find('[')?;
    let end = line.find(']')?;
    line.get(start + 1..end)?.parse().ok()
}

fn parse_gate_line(line: &str) -> HeaResult<Gate> {
    let stmt = line.trim().trim_end_matches(';');
    let bad = || HeaError::InvalidQasm(format!("Unsupported statement: {}", line));

    if stmt == "measure q -> c" {
        return Ok(Gate::MeasureAll);
    }
    if stmt == "barrier q" {
        return Ok(Gate::Barrier(Vec::new()));
    }

    let (name, params, operands) = match stmt.find('(') {
        Some(open) => {
            let close = stmt[open..]
                .find(')')
                .map(|i| open + i)
                .ok_or_else(|| HeaError::InvalidQasm(format!("Missing closing paren: {}", line)))?;
            let params = stmt[open + 1..close]
                .split(',')
                .map(|s| s.trim().parse::<f64>().map_err(|_| bad()))
                .collect::<HeaResult<Vec<f64>>>()?;
            (&stmt[..open], params, stmt[close + 1..].trim())
        }
        None => {
            let (name, rest) = stmt.split_once(' ').ok_or_else(bad)?;
            (name, Vec::new(), rest.trim())
        }
    };

    // "measure q[i] -> c[i]" keeps only the quantum operand
    let operands = operands.split("->").next().unwrap_or(operands);
    let qubits = parse_qubits(operands)?;

    let one = |f: fn(QubitId) -> Gate| match qubits.as_slice() {
        [q] => Ok(f(*q)),
        _ => Err(bad()),
    };
    let rot = |f: fn(QubitId, Angle) -> Gate| match (qubits.as_slice(), params.as_slice()) {
        ([q], [a]) => Ok(f(*q, *a)),
        _ => Err(bad()),
    };
    let two = |f: fn(QubitId, QubitId) -> Gate| match qubits.as_slice() {
        [a, b] => Ok(f(*a, *b)),
        _ => Err(bad()),
    };

    match name.trim().to_lowercase().as_str() {
        "h" => one(Gate::H),
        "x" => one(Gate::X),
        "y" => one(Gate::Y),
        "z" => one(Gate::Z),
        "s" => one(Gate::S),
        "sdg" => one(Gate::Sdg),
        "rx" => rot(Gate::Rx),
        "ry" => rot(Gate::Ry),
        "rz" => rot(Gate::Rz),
        "u" | "u3" => match (qubits.as_slice(), params.as_slice()) {
            ([q], [theta, phi, lambda]) => Ok(Gate::U(*q, *theta, *phi, *lambda)),
            _ => Err(bad()),
        },
        "cx" | "cnot" => two(Gate::Cnot),
        "cz" => two(Gate::Cz),
        "swap" => two(Gate::Swap),
        "measure" => one(Gate::Measure),
        "barrier" => Ok(Gate::Barrier(qubits)),
        _ => Err(bad()),
    }
}

fn parse_qubits(s: &str) -> HeaResult<Vec<QubitId>> {
    s.split(',')
        .map(|part| {
            // "q[N]" -> N
            let part = part.trim();
            part.find('[')
                .zip(part.find(']'))
                .and_then(|(start, end)| part.get(start + 1..end))
                .and_then(|idx| idx.parse().ok())
                .ok_or_else(|| HeaError::InvalidQasm(format!("Bad qubit operand: {}", part)))
        })
        .collect()
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} gates)",
            self.num_qubits,
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        writeln!(f, "  1Q gates: {}", self.count_1q())?;
        writeln!(f, "  2Q gates: {}", self.count_2q())?;
        writeln!(f, "  Parameterized: {}", self.count_parameterized())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_new() {
        let circuit = Circuit::new(5);
        assert_eq!(circuit.num_qubits(), 5);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(3);
        assert!(circuit.add_gate(Gate::H(0)).is_ok());
        let err = circuit.add_gate(Gate::Cnot(1, 5)).unwrap_err();
        assert_eq!(
            err,
            HeaError::GateQubitMismatch {
                qubit: 5,
                num_qubits: 3
            }
        );
        assert_eq!(circuit.gate_count(), 1);
    }

    #[test]
    fn test_circuit_depth() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::H(1)).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_gate(Gate::H(2)).unwrap();

        // H(0), H(1), H(2) share the first level, CNOT is second
        assert_eq!(circuit.depth(), 2);

        circuit.add_gate(Gate::MeasureAll).unwrap();
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_gate_counts() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::U(1, 0.1, 0.2, 0.3)).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_gate(Gate::Rx(0, 1.0)).unwrap();
        circuit.add_gate(Gate::MeasureAll).unwrap();

        assert_eq!(circuit.count_1q(), 3);
        assert_eq!(circuit.count_2q(), 1);
        assert_eq!(circuit.count_parameterized(), 2);
        assert_eq!(circuit.count_measurements(), 1);
        assert_eq!(circuit.angles(), vec![0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_to_qasm() {
        let mut circuit = Circuit::new(2);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_gate(Gate::MeasureAll).unwrap();

        let qasm = circuit.to_qasm();
        assert!(qasm.contains("OPENQASM 2.0"));
        assert!(qasm.contains("qreg q[2]"));
        assert!(qasm.contains("h q[0]"));
        assert!(qasm.contains("cx q[0],q[1]"));
        assert!(qasm.ends_with("measure q -> c;"));
    }

    #[test]
    fn test_from_qasm() {
        let qasm = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            u3(0.5,0.25,0.125) q[0];
            ry(1.5) q[1];
            cx q[0],q[1];
            measure q[1] -> c[1];
        "#;

        let circuit = Circuit::from_qasm(qasm).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(
            circuit.gates(),
            &[
                Gate::U(0, 0.5, 0.25, 0.125),
                Gate::Ry(1, 1.5),
                Gate::Cnot(0, 1),
                Gate::Measure(1),
            ]
        );
    }

    #[test]
    fn test_qasm_roundtrip_preserves_gates() {
        let circuit = Circuit::from_gates(
            3,
            vec![
                Gate::U(0, 0.1, 0.2, 0.3),
                Gate::Rz(2, -0.7),
                Gate::Cnot(1, 2),
                Gate::MeasureAll,
            ],
        )
        .unwrap();

        let parsed = Circuit::from_qasm(&circuit.to_qasm()).unwrap();
        assert_eq!(parsed.gates(), circuit.gates());
    }

    #[test]
    fn test_from_qasm_errors() {
        assert!(Circuit::from_qasm("h q[0];").is_err());
        assert!(Circuit::from_qasm("qreg q[1];\nccx q[0],q[1],q[2];").is_err());
        assert!(Circuit::from_qasm("qreg q[1];\nrx(abc) q[0];").is_err());
        // closing paren ahead of the opening one
        assert!(matches!(
            Circuit::from_qasm("qreg q[1];\nx) (1;"),
            Err(HeaError::InvalidQasm(_))
        ));
        // out-of-range qubit caught by from_gates
        assert!(matches!(
            Circuit::from_qasm("qreg q[1];\nh q[3];"),
            Err(HeaError::GateQubitMismatch { .. })
        ));
    }

    #[test]
    fn test_two_qubit_pairs() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::Cz(1, 2)).unwrap();

        assert_eq!(circuit.two_qubit_pairs(), vec![(0, 1), (1, 2)]);
    }
}
