//! Circuit builder for HEA
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for constructing circuits gate by gate or one
//! ansatz layer at a time.

use crate::circuit::Circuit;
use crate::error::{HeaError, HeaResult};
use crate::gate::{Entanglement, Gate};
use crate::types::{Angle, QubitId};

/// Fluent circuit builder (consuming self pattern)
///
/// Gate-adding methods never fail; the first rejected gate is remembered
/// and reported by [`CircuitBuilder::try_build`].
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    /// Internal circuit being built
    /// Gantree: circuit: Circuit // 내부 회로
    circuit: Circuit,

    /// First error raised while adding gates
    error: Option<HeaError>,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new circuit builder
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            error: None,
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
            error: None,
        }
    }

    /// Append a gate, keeping the first failure
    /// Gantree: push(self, Gate) -> Self // 게이트 추가
    pub fn push(mut self, gate: Gate) -> Self {
        if let Err(e) = self.circuit.add_gate(gate) {
            self.error.get_or_insert(e);
        }
        self
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Add Hadamard gate
    pub fn h(self, qubit: QubitId) -> Self {
        self.push(Gate::H(qubit))
    }

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.push(Gate::X(qubit))
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.push(Gate::Y(qubit))
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.push(Gate::Z(qubit))
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.push(Gate::S(qubit))
    }

    /// Add S-dagger gate
    pub fn sdg(self, qubit: QubitId) -> Self {
        self.push(Gate::Sdg(qubit))
    }

    /// Add Rx rotation
    /// Gantree: rx(self, q, a) -> Self // Rx 추가
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Rx(qubit, angle))
    }

    /// Add Ry rotation
    /// Gantree: ry(self, q, a) -> Self // Ry 추가
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Ry(qubit, angle))
    }

    /// Add Rz rotation
    /// Gantree: rz(self, q, a) -> Self // Rz 추가
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.push(Gate::Rz(qubit, angle))
    }

    /// Add U gate (general single-qubit)
    /// Gantree: u(self, q, θ, φ, λ) -> Self // U 추가
    pub fn u(self, qubit: QubitId, theta: Angle, phi: Angle, lambda: Angle) -> Self {
        self.push(Gate::U(qubit, theta, phi, lambda))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    /// Gantree: cnot(self, c, t) -> Self // CNOT 추가
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cnot(control, target))
    }

    /// Alias for cnot
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.cnot(control, target)
    }

    /// Add CZ gate
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cz(control, target))
    }

    /// Add SWAP gate
    pub fn swap(self, qubit1: QubitId, qubit2: QubitId) -> Self {
        self.push(Gate::Swap(qubit1, qubit2))
    }

    // ========================================================================
    // Measurement and Control
    // ========================================================================

    /// Add measurement on single qubit
    pub fn measure(self, qubit: QubitId) -> Self {
        self.push(Gate::Measure(qubit))
    }

    /// Add measurement on all qubits
    /// Gantree: measure_all(self) -> Self // 전체 측정
    pub fn measure_all(self) -> Self {
        self.push(Gate::MeasureAll)
    }

    /// Add barrier on every qubit
    pub fn barrier(self) -> Self {
        let qubits: Vec<QubitId> = (0..self.circuit.num_qubits()).collect();
        self.push(Gate::Barrier(qubits))
    }

    // ========================================================================
    // Layer Operations
    // ========================================================================

    /// Add Ry rotation layer on all qubits
    /// Gantree: ry_layer(self, angles) -> Self // Ry 레이어
    pub fn ry_layer(self, angles: &[Angle]) -> Self {
        angles
            .iter()
            .take(self.circuit.num_qubits())
            .enumerate()
            .fold(self, |b, (q, &a)| b.ry(q, a))
    }

    /// Add Rz rotation layer on all qubits
    /// Gantree: rz_layer(self, angles) -> Self // Rz 레이어
    pub fn rz_layer(self, angles: &[Angle]) -> Self {
        angles
            .iter()
            .take(self.circuit.num_qubits())
            .enumerate()
            .fold(self, |b, (q, &a)| b.rz(q, a))
    }

    /// Ry on every qubit, then Rz on every qubit
    ///
    /// `angles` holds the N Ry angles followed by the N Rz angles.
    /// Gantree: rotation_pair_layer(self, angles) -> Self // RyRz 레이어
    pub fn rotation_pair_layer(self, angles: &[Angle]) -> Self {
        let n = self.circuit.num_qubits();
        if angles.len() != 2 * n {
            return self.fail(HeaError::ParameterCountMismatch {
                expected: 2 * n,
                actual: angles.len(),
            });
        }
        let (ry, rz) = angles.split_at(n);
        self.ry_layer(ry).rz_layer(rz)
    }

    /// U(θ, φ, λ) on every qubit; qubit j reads `angles[3j..3j+3]`
    /// Gantree: unitary_layer(self, angles) -> Self // U3 레이어
    pub fn unitary_layer(self, angles: &[Angle]) -> Self {
        let n = self.circuit.num_qubits();
        if angles.len() != 3 * n {
            return self.fail(HeaError::ParameterCountMismatch {
                expected: 3 * n,
                actual: angles.len(),
            });
        }
        angles
            .chunks_exact(3)
            .enumerate()
            .fold(self, |b, (q, t)| b.u(q, t[0], t[1], t[2]))
    }

    /// Coupling block for the given pattern
    /// Gantree: entangle(self, Entanglement) -> Self // 얽힘 블록
    pub fn entangle(self, entanglement: Entanglement) -> Self {
        entanglement
            .pairs(self.circuit.num_qubits())
            .into_iter()
            .fold(self, |b, (c, t)| b.push(entanglement.gate(c, t)))
    }

    /// Add CX chain (linear connectivity)
    pub fn cx_chain(self) -> Self {
        self.entangle(Entanglement::Linear)
    }

    fn fail(mut self, error: HeaError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build and return the circuit, dropping any rejected gates
    /// Gantree: build(self) -> Circuit // 빌드
    pub fn build(self) -> Circuit {
        self.circuit
    }

    /// Build, failing on the first rejected gate or an empty circuit
    /// Gantree: try_build(self) -> Result<Circuit> // 검증 빌드
    pub fn try_build(self) -> HeaResult<Circuit> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.circuit.is_empty() {
            return Err(HeaError::EmptyCircuit);
        }
        Ok(self.circuit)
    }

    /// Get reference to current circuit state
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .cnot(0, 1)
            .cnot(1, 2)
            .measure_all()
            .build();

        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.gate_count(), 4);
    }

    #[test]
    fn test_builder_chain() {
        let circuit = CircuitBuilder::new(5).h(0).cx_chain().measure_all().build();

        // H + 4 CNOTs + MeasureAll
        assert_eq!(circuit.gate_count(), 6);
        assert_eq!(circuit.count_2q(), 4);
    }

    #[test]
    fn test_rotation_pair_layer_order() {
        let circuit = CircuitBuilder::new(2)
            .rotation_pair_layer(&[0.1, 0.2, 0.3, 0.4])
            .try_build()
            .unwrap();

        assert_eq!(
            circuit.gates(),
            &[
                Gate::Ry(0, 0.1),
                Gate::Ry(1, 0.2),
                Gate::Rz(0, 0.3),
                Gate::Rz(1, 0.4),
            ]
        );
    }

    #[test]
    fn test_unitary_layer() {
        let circuit = CircuitBuilder::new(2)
            .unitary_layer(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .try_build()
            .unwrap();

        assert_eq!(
            circuit.gates(),
            &[Gate::U(0, 0.1, 0.2, 0.3), Gate::U(1, 0.4, 0.5, 0.6)]
        );
    }

    #[test]
    fn test_layer_length_mismatch() {
        let err = CircuitBuilder::new(3)
            .unitary_layer(&[0.0; 8])
            .try_build()
            .unwrap_err();
        assert_eq!(
            err,
            HeaError::ParameterCountMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_entangle_full() {
        let circuit = CircuitBuilder::new(4).entangle(Entanglement::Full).build();
        assert_eq!(circuit.count_2q(), 6);
        assert_eq!(circuit.gates()[0], Gate::Cnot(0, 1));
        assert_eq!(circuit.gates()[5], Gate::Cnot(2, 3));
    }

    #[test]
    fn test_try_build_reports_first_error() {
        let result = CircuitBuilder::new(2).h(0).cnot(0, 4).x(7).try_build();
        assert_eq!(
            result.unwrap_err(),
            HeaError::GateQubitMismatch {
                qubit: 4,
                num_qubits: 2
            }
        );

        assert_eq!(
            CircuitBuilder::new(2).try_build().unwrap_err(),
            HeaError::EmptyCircuit
        );
    }
}
