//! Hardware-efficient ansatz generation
//!
//! Gantree: L2_Ansatz → AnsatzSpec
//!
//! An ansatz is `L` repetitions of a layer: one single-qubit gate from the
//! chosen [`GateFamily`] on every qubit, then a CNOT on every pair the
//! [`Entanglement`] pattern selects (control on the lower index).
//!
//! Parameters are laid out layer-major. Within layer `d` of an `N`-qubit
//! ansatz:
//!
//! * `UnitaryThree`: qubit `j` reads `params[d·3N + 3j ..][..3]` as (θ, φ, λ)
//! * `RotationPair`: `Ry(params[d·2N + j])` on every qubit, then
//!   `Rz(params[d·2N + N + j])` on every qubit
//!
//! ```rust
//! use hea_core::prelude::*;
//!
//! let spec = AnsatzSpec::new(3, Entanglement::Linear, GateFamily::UnitaryThree, 2).unwrap();
//! assert_eq!(spec.num_parameters(), 18);
//!
//! let circuit = spec.build(&vec![0.1; 18]).unwrap();
//! assert_eq!(circuit.count_2q(), 4);
//! ```

use crate::builder::CircuitBuilder;
use crate::circuit::Circuit;
use crate::constants::ansatz::MAX_QUBITS;
use crate::error::{HeaError, HeaResult};
use crate::gate::{Entanglement, GateFamily};
use crate::topology::Topology;
use crate::types::{Angle, ParamVec, QubitId};
use rand::Rng;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Structural Description
// ============================================================================

/// Kind of single-qubit rotation placed in a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RotationKind {
    /// Ry(θ)
    Ry,
    /// Rz(θ)
    Rz,
    /// U(θ, φ, λ)
    U,
}

/// One parameterised single-qubit gate and the parameter slots it reads
/// Gantree: Rotation // 회전 슬롯
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rotation {
    /// Target qubit
    pub qubit: QubitId,
    /// Gate kind
    pub kind: RotationKind,
    /// Indices into the parameter vector, in gate argument order
    pub params: Vec<usize>,
}

/// One layer: rotations in gate order, then coupling pairs
/// Gantree: Layer // 레이어
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Zero-based layer index
    pub index: usize,
    /// Single-qubit rotations
    pub rotations: Vec<Rotation>,
    /// CNOT (control, target) pairs; empty when the block is omitted
    pub couplings: Vec<(QubitId, QubitId)>,
}

// ============================================================================
// AnsatzSpec
// ============================================================================

/// Shape of a hardware-efficient ansatz
/// Gantree: AnsatzSpec // 안사츠 정의
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnsatzSpec {
    num_qubits: usize,
    entanglement: Entanglement,
    family: GateFamily,
    layers: usize,
    final_entanglement: bool,
}

impl AnsatzSpec {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Validate and create an ansatz shape
    /// Gantree: new(n, ent, family, L) -> Result<Self> // 생성자
    pub fn new(
        num_qubits: usize,
        entanglement: Entanglement,
        family: GateFamily,
        layers: usize,
    ) -> HeaResult<Self> {
        if num_qubits == 0 {
            return Err(HeaError::InvalidAnsatz(
                "qubit count must be at least 1".into(),
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(HeaError::InvalidAnsatz(format!(
                "qubit count {} exceeds maximum {}",
                num_qubits, MAX_QUBITS
            )));
        }
        if layers == 0 {
            return Err(HeaError::InvalidAnsatz(
                "layer count must be at least 1".into(),
            ));
        }

        Ok(Self {
            num_qubits,
            entanglement,
            family,
            layers,
            final_entanglement: true,
        })
    }

    /// Keep or drop the coupling block after the last layer
    pub fn with_final_entanglement(mut self, enabled: bool) -> Self {
        self.final_entanglement = enabled;
        self
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Entanglement pattern
    pub fn entanglement(&self) -> Entanglement {
        self.entanglement
    }

    /// Gate family
    pub fn family(&self) -> GateFamily {
        self.family
    }

    /// Number of layers
    pub fn num_layers(&self) -> usize {
        self.layers
    }

    /// Whether the last layer carries its coupling block
    pub fn final_entanglement(&self) -> bool {
        self.final_entanglement
    }

    /// Total free parameters: N × params_per_qubit × L
    /// Gantree: num_parameters() -> usize // 파라미터 수
    pub fn num_parameters(&self) -> usize {
        self.params_per_layer() * self.layers
    }

    /// Parameters consumed by one layer
    pub fn params_per_layer(&self) -> usize {
        self.num_qubits * self.family.params_per_qubit()
    }

    /// Coupling pairs of one layer, in gate order
    /// Gantree: coupling_pairs() -> Vec<(q,q)> // 결합 쌍
    pub fn coupling_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.entanglement.pairs(self.num_qubits)
    }

    /// Two-qubit gates in one full layer
    pub fn coupling_gates_per_layer(&self) -> usize {
        self.coupling_pairs().len()
    }

    /// Two-qubit gates in the whole circuit
    pub fn total_coupling_gates(&self) -> usize {
        let entangled = (0..self.layers).filter(|&d| self.entangles(d)).count();
        entangled * self.coupling_gates_per_layer()
    }

    fn entangles(&self, layer: usize) -> bool {
        self.final_entanglement || layer + 1 < self.layers
    }

    /// Position of a parameter in the flat vector
    ///
    /// `slot` is the gate argument: 0..3 for U (θ, φ, λ), 0 (Ry) or 1 (Rz)
    /// for the rotation pair. Returns `None` outside the ansatz.
    /// Gantree: parameter_index(d, j, slot) -> Option<usize> // 파라미터 위치
    pub fn parameter_index(&self, layer: usize, qubit: QubitId, slot: usize) -> Option<usize> {
        let ppq = self.family.params_per_qubit();
        if layer >= self.layers || qubit >= self.num_qubits || slot >= ppq {
            return None;
        }
        let base = layer * self.params_per_layer();
        Some(match self.family {
            GateFamily::UnitaryThree => base + ppq * qubit + slot,
            GateFamily::RotationPair => base + slot * self.num_qubits + qubit,
        })
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Structural description of every layer
    /// Gantree: layers() -> Vec<Layer> // 레이어 구조
    pub fn layers(&self) -> Vec<Layer> {
        let pairs = self.coupling_pairs();
        (0..self.layers)
            .map(|d| Layer {
                index: d,
                rotations: self.layer_rotations(d),
                couplings: if self.entangles(d) {
                    pairs.clone()
                } else {
                    Vec::new()
                },
            })
            .collect()
    }

    fn layer_rotations(&self, d: usize) -> Vec<Rotation> {
        let n = self.num_qubits;
        let slot = |q, s| self.parameter_index(d, q, s).unwrap_or_default();
        match self.family {
            GateFamily::UnitaryThree => (0..n)
                .map(|q| Rotation {
                    qubit: q,
                    kind: RotationKind::U,
                    params: (0..3).map(|s| slot(q, s)).collect(),
                })
                .collect(),
            GateFamily::RotationPair => [RotationKind::Ry, RotationKind::Rz]
                .into_iter()
                .enumerate()
                .flat_map(|(s, kind)| {
                    (0..n).map(move |q| (q, s, kind))
                })
                .map(|(q, s, kind)| Rotation {
                    qubit: q,
                    kind,
                    params: vec![slot(q, s)],
                })
                .collect(),
        }
    }

    // ========================================================================
    // Circuit Construction
    // ========================================================================

    /// Build the circuit, ending in measurement of every qubit
    /// Gantree: build(&params) -> Result<Circuit> // 회로 생성
    pub fn build(&self, params: &[Angle]) -> HeaResult<Circuit> {
        self.assemble(params)?.measure_all().try_build()
    }

    /// Build the circuit without the final measurement
    pub fn build_unmeasured(&self, params: &[Angle]) -> HeaResult<Circuit> {
        self.assemble(params)?.try_build()
    }

    fn assemble(&self, params: &[Angle]) -> HeaResult<CircuitBuilder> {
        self.check_parameters(params)?;

        let name = format!(
            "hea_{}_{}_l{}",
            self.family, self.entanglement, self.layers
        )
        .to_lowercase();

        let builder = params
            .chunks_exact(self.params_per_layer())
            .enumerate()
            .fold(
                CircuitBuilder::with_name(self.num_qubits, name),
                |b, (d, chunk)| {
                    let b = match self.family {
                        GateFamily::UnitaryThree => b.unitary_layer(chunk),
                        GateFamily::RotationPair => b.rotation_pair_layer(chunk),
                    };
                    if self.entangles(d) {
                        b.entangle(self.entanglement)
                    } else {
                        b
                    }
                },
            );

        Ok(builder)
    }

    /// Check length and finiteness of a parameter vector
    /// Gantree: check_parameters(&params) -> Result // 파라미터 검증
    pub fn check_parameters(&self, params: &[Angle]) -> HeaResult<()> {
        if params.len() != self.num_parameters() {
            return Err(HeaError::ParameterCountMismatch {
                expected: self.num_parameters(),
                actual: params.len(),
            });
        }
        match params.iter().find(|p| !p.is_finite()) {
            Some(&bad) => Err(HeaError::InvalidAngle(bad)),
            None => Ok(()),
        }
    }

    /// Uniform [0, 1) starting point
    /// Gantree: random_parameters(rng) -> ParamVec // 초기 파라미터
    pub fn random_parameters<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamVec {
        (0..self.num_parameters()).map(|_| rng.gen::<f64>()).collect()
    }

    // ========================================================================
    // Topology
    // ========================================================================

    /// Smallest standard topology that runs this ansatz without routing
    /// Gantree: required_topology() -> Topology // 필요 토폴로지
    pub fn required_topology(&self) -> Topology {
        match self.entanglement {
            Entanglement::Linear => Topology::linear(self.num_qubits),
            Entanglement::Full => Topology::all_to_all(self.num_qubits),
        }
    }

    /// Check that every coupling is an edge of `topology`
    /// Gantree: fits(&Topology) -> Result // 토폴로지 적합성
    pub fn fits(&self, topology: &Topology) -> HeaResult<()> {
        let zeros = vec![0.0; self.num_parameters()];
        topology.validate_circuit(&self.build_unmeasured(&zeros)?)
    }
}

impl fmt::Display for AnsatzSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ansatz: {} qubits, {} entanglement, {} layers ({} parameters)",
            self.family,
            self.num_qubits,
            self.entanglement,
            self.layers,
            self.num_parameters()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spec(n: usize, e: Entanglement, f: GateFamily, l: usize) -> AnsatzSpec {
        AnsatzSpec::new(n, e, f, l).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_shapes() {
        for (n, l) in [(0, 1), (2, 0), (MAX_QUBITS + 1, 1)] {
            let err = AnsatzSpec::new(n, Entanglement::Linear, GateFamily::UnitaryThree, l)
                .unwrap_err();
            assert!(matches!(err, HeaError::InvalidAnsatz(_)));
        }
    }

    #[test]
    fn test_parameter_count() {
        assert_eq!(
            spec(3, Entanglement::Linear, GateFamily::UnitaryThree, 4).num_parameters(),
            36
        );
        assert_eq!(
            spec(2, Entanglement::Full, GateFamily::RotationPair, 1).num_parameters(),
            4
        );
    }

    #[test]
    fn test_u3_linear_two_layers() {
        let s = spec(2, Entanglement::Linear, GateFamily::UnitaryThree, 2);
        let params: Vec<f64> = (0..12).map(|i| i as f64 * 0.1).collect();
        let circuit = s.build(&params).unwrap();

        let expected = vec![
            Gate::U(0, params[0], params[1], params[2]),
            Gate::U(1, params[3], params[4], params[5]),
            Gate::Cnot(0, 1),
            Gate::U(0, params[6], params[7], params[8]),
            Gate::U(1, params[9], params[10], params[11]),
            Gate::Cnot(0, 1),
            Gate::MeasureAll,
        ];
        assert_eq!(circuit.gates(), expected.as_slice());
    }

    #[test]
    fn test_rotation_pair_block_order() {
        let s = spec(3, Entanglement::Linear, GateFamily::RotationPair, 1);
        let params = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let circuit = s.build_unmeasured(&params).unwrap();

        assert_eq!(
            &circuit.gates()[..6],
            &[
                Gate::Ry(0, 1.0),
                Gate::Ry(1, 2.0),
                Gate::Ry(2, 3.0),
                Gate::Rz(0, 4.0),
                Gate::Rz(1, 5.0),
                Gate::Rz(2, 6.0),
            ]
        );
        assert_eq!(&circuit.gates()[6..], &[Gate::Cnot(0, 1), Gate::Cnot(1, 2)]);
    }

    #[test]
    fn test_full_entanglement_pairs() {
        let s = spec(4, Entanglement::Full, GateFamily::UnitaryThree, 1);
        assert_eq!(s.coupling_gates_per_layer(), 6);
        assert_eq!(
            s.coupling_pairs(),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_single_qubit_has_no_couplings() {
        let s = spec(1, Entanglement::Full, GateFamily::UnitaryThree, 3);
        let circuit = s.build(&[0.5; 9]).unwrap();
        assert_eq!(circuit.count_2q(), 0);
        assert_eq!(circuit.count_1q(), 3);
    }

    #[test]
    fn test_final_entanglement_toggle() {
        let s = spec(3, Entanglement::Linear, GateFamily::UnitaryThree, 2);
        assert_eq!(s.total_coupling_gates(), 4);

        let trimmed = s.clone().with_final_entanglement(false);
        assert_eq!(trimmed.total_coupling_gates(), 2);

        let circuit = trimmed.build_unmeasured(&[0.0; 18]).unwrap();
        assert_eq!(circuit.count_2q(), 2);
        // last gates are the second-layer rotations
        assert!(matches!(circuit.gates().last(), Some(Gate::U(2, ..))));

        let layers = trimmed.layers();
        assert_eq!(layers[0].couplings.len(), 2);
        assert!(layers[1].couplings.is_empty());
    }

    #[test]
    fn test_parameter_count_mismatch() {
        let s = spec(2, Entanglement::Linear, GateFamily::RotationPair, 2);
        assert_eq!(
            s.build(&[0.0; 7]).unwrap_err(),
            HeaError::ParameterCountMismatch {
                expected: 8,
                actual: 7
            }
        );
        assert!(matches!(
            s.build(&[0.0, 0.0, f64::INFINITY, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Err(HeaError::InvalidAngle(_))
        ));
    }

    #[test]
    fn test_parameter_index_matches_build() {
        for family in [GateFamily::UnitaryThree, GateFamily::RotationPair] {
            let s = spec(3, Entanglement::Linear, family, 2);
            let params: Vec<f64> = (0..s.num_parameters()).map(|i| i as f64).collect();
            let angles = s.build_unmeasured(&params).unwrap().angles();

            // every parameter appears exactly once
            let mut seen = angles.clone();
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(seen, params);

            for layer in s.layers() {
                for rot in &layer.rotations {
                    for (slot, &idx) in rot.params.iter().enumerate() {
                        let slot = if family == GateFamily::RotationPair {
                            (rot.kind == RotationKind::Rz) as usize
                        } else {
                            slot
                        };
                        assert_eq!(s.parameter_index(layer.index, rot.qubit, slot), Some(idx));
                    }
                }
            }
        }
    }

    #[test]
    fn test_parameter_index_bounds() {
        let s = spec(2, Entanglement::Linear, GateFamily::UnitaryThree, 2);
        assert_eq!(s.parameter_index(1, 1, 2), Some(11));
        assert_eq!(s.parameter_index(2, 0, 0), None);
        assert_eq!(s.parameter_index(0, 2, 0), None);
        assert_eq!(s.parameter_index(0, 0, 3), None);
    }

    #[test]
    fn test_topology_fit() {
        let full = spec(3, Entanglement::Full, GateFamily::UnitaryThree, 1);
        assert!(full.fits(&Topology::all_to_all(3)).is_ok());
        assert_eq!(
            full.fits(&Topology::linear(3)),
            Err(HeaError::TopologyViolation { q1: 0, q2: 2 })
        );

        let linear = spec(4, Entanglement::Linear, GateFamily::RotationPair, 2);
        assert!(linear.fits(&linear.required_topology()).is_ok());
        assert!(linear.fits(&Topology::ring(4)).is_ok());
    }

    #[test]
    fn test_random_parameters_reproducible() {
        let s = spec(2, Entanglement::Linear, GateFamily::UnitaryThree, 3);
        let a = s.random_parameters(&mut ChaCha8Rng::seed_from_u64(7));
        let b = s.random_parameters(&mut ChaCha8Rng::seed_from_u64(7));

        assert_eq!(a.len(), 18);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn test_display() {
        let s = spec(2, Entanglement::Full, GateFamily::RotationPair, 3);
        assert_eq!(
            s.to_string(),
            "RYRZ ansatz: 2 qubits, Full entanglement, 3 layers (12 parameters)"
        );
    }
}
