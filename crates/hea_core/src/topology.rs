//! Qubit topology for HEA
//!
//! Gantree: L1_Circuit → Topology
//!
//! Device coupling maps. An ansatz is executable without routing only
//! when every coupling pair it uses is an edge here.

use crate::circuit::Circuit;
use crate::error::{HeaError, HeaResult};
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Qubit topology (coupling map)
/// Gantree: Topology // 큐비트 토폴로지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Coupling map: list of (control, target) pairs
    /// Gantree: coupling_map: Vec<(QubitId, QubitId)> // 연결 맵
    coupling_map: Vec<(QubitId, QubitId)>,

    /// Number of qubits
    num_qubits: usize,

    /// Whether topology is bidirectional
    bidirectional: bool,

    /// Optional topology name
    name: Option<String>,
}

impl Topology {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from coupling map
    /// Gantree: from_coupling_map(map) -> Self // 맵에서 생성
    pub fn from_coupling_map(
        coupling_map: Vec<(QubitId, QubitId)>,
        bidirectional: bool,
    ) -> HeaResult<Self> {
        if coupling_map.is_empty() {
            return Err(HeaError::EmptyCouplingMap);
        }

        if let Some(&(q1, q2)) = coupling_map.iter().find(|(a, b)| a == b) {
            return Err(HeaError::InvalidCoupling(q1, q2));
        }

        let max_qubit = coupling_map
            .iter()
            .map(|&(a, b)| a.max(b))
            .max()
            .unwrap_or(0);

        Ok(Self {
            coupling_map,
            num_qubits: max_qubit + 1,
            bidirectional,
            name: None,
        })
    }

    fn named(coupling_map: Vec<(QubitId, QubitId)>, num_qubits: usize, name: String) -> Self {
        Self {
            coupling_map,
            num_qubits,
            bidirectional: true,
            name: Some(name),
        }
    }

    /// Create linear chain topology
    /// Gantree: linear(n) -> Self // 선형 체인
    ///
    /// Connectivity: 0-1-2-3-...-N-1
    pub fn linear(n: usize) -> Self {
        let map = (1..n).map(|i| (i - 1, i)).collect();
        Self::named(map, n, format!("linear_{}", n))
    }

    /// Create ring topology
    /// Gantree: ring(n) -> Self // 원형
    ///
    /// Connectivity: 0-1-2-...-N-1-0
    pub fn ring(n: usize) -> Self {
        let mut map: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
        if n > 2 {
            map.push((n - 1, 0));
        }
        Self::named(map, n, format!("ring_{}", n))
    }

    /// Create grid topology
    /// Gantree: grid(rows, cols) -> Self // 그리드
    ///
    /// Qubit indexing: row * cols + col
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut map = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    map.push((q, q + 1));
                }
                if r + 1 < rows {
                    map.push((q, q + cols));
                }
            }
        }
        Self::named(map, rows * cols, format!("grid_{}x{}", rows, cols))
    }

    /// Create all-to-all topology (ideal)
    /// Gantree: all_to_all(n) -> Self // 완전 연결
    pub fn all_to_all(n: usize) -> Self {
        let map = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        Self::named(map, n, format!("all_to_all_{}", n))
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get coupling map
    pub fn coupling_map(&self) -> &[(QubitId, QubitId)] {
        &self.coupling_map
    }

    /// Get topology name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get number of edges
    pub fn num_edges(&self) -> usize {
        self.coupling_map.len()
    }

    // ========================================================================
    // Connectivity Queries
    // ========================================================================

    /// Check if two qubits are directly connected
    /// Gantree: is_connected(q1, q2) -> bool // 연결 여부
    pub fn is_connected(&self, q1: QubitId, q2: QubitId) -> bool {
        if q1 == q2 {
            return true;
        }

        let has_forward = self.coupling_map.contains(&(q1, q2));

        if self.bidirectional {
            has_forward || self.coupling_map.contains(&(q2, q1))
        } else {
            has_forward
        }
    }

    /// Get neighbors of a qubit, sorted
    /// Gantree: neighbors(q) -> Vec<QubitId> // 이웃
    pub fn neighbors(&self, qubit: QubitId) -> Vec<QubitId> {
        let mut neighbors = BTreeSet::new();

        for &(q1, q2) in &self.coupling_map {
            if q1 == qubit {
                neighbors.insert(q2);
            }
            if self.bidirectional && q2 == qubit {
                neighbors.insert(q1);
            }
        }

        neighbors.into_iter().collect()
    }

    /// Get qubit degree (number of connections)
    pub fn degree(&self, qubit: QubitId) -> usize {
        self.neighbors(qubit).len()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Two-qubit pairs of `circuit` that have no edge here, deduplicated
    /// Gantree: missing_couplings(&Circuit) -> Vec // 누락 연결
    pub fn missing_couplings(&self, circuit: &Circuit) -> Vec<(QubitId, QubitId)> {
        let missing: BTreeSet<_> = circuit
            .two_qubit_pairs()
            .into_iter()
            .filter(|&(q1, q2)| !self.is_connected(q1, q2))
            .collect();
        missing.into_iter().collect()
    }

    /// Validate a circuit against this topology
    /// Gantree: validate_circuit(&self, Circuit) -> Result // 검증
    pub fn validate_circuit(&self, circuit: &Circuit) -> HeaResult<()> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(HeaError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                max: self.num_qubits.saturating_sub(1),
            });
        }

        match circuit
            .two_qubit_pairs()
            .into_iter()
            .find(|&(q1, q2)| !self.is_connected(q1, q2))
        {
            Some((q1, q2)) => Err(HeaError::TopologyViolation { q1, q2 }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topology({} qubits, {} edges{})",
            self.num_qubits,
            self.num_edges(),
            self.name
                .as_ref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CircuitBuilder;
    use crate::gate::Entanglement;

    #[test]
    fn test_linear_topology() {
        let topo = Topology::linear(5);

        assert_eq!(topo.num_qubits(), 5);
        assert_eq!(topo.num_edges(), 4);
        assert!(topo.is_connected(1, 0));
        assert!(!topo.is_connected(0, 2));
    }

    #[test]
    fn test_ring_topology() {
        let topo = Topology::ring(4);

        assert_eq!(topo.num_edges(), 4);
        assert!(topo.is_connected(3, 0));
        // two qubits form a single edge, no duplicate closure
        assert_eq!(Topology::ring(2).num_edges(), 1);
    }

    #[test]
    fn test_grid_topology() {
        let topo = Topology::grid(2, 3);

        assert_eq!(topo.num_qubits(), 6);
        // 2 rows x 2 horizontal + 3 vertical
        assert_eq!(topo.num_edges(), 7);
        assert_eq!(topo.degree(4), 3);
    }

    #[test]
    fn test_neighbors() {
        let topo = Topology::linear(5);

        assert_eq!(topo.neighbors(0), vec![1]);
        assert_eq!(topo.neighbors(2), vec![1, 3]);
        assert_eq!(topo.neighbors(4), vec![3]);
    }

    #[test]
    fn test_from_coupling_map() {
        assert_eq!(
            Topology::from_coupling_map(vec![], true),
            Err(HeaError::EmptyCouplingMap)
        );
        assert_eq!(
            Topology::from_coupling_map(vec![(0, 1), (2, 2)], true),
            Err(HeaError::InvalidCoupling(2, 2))
        );

        let directed = Topology::from_coupling_map(vec![(0, 1), (1, 3)], false).unwrap();
        assert_eq!(directed.num_qubits(), 4);
        assert!(directed.is_connected(0, 1));
        assert!(!directed.is_connected(1, 0));
    }

    #[test]
    fn test_validate_circuit() {
        let topo = Topology::linear(5);
        let chain = CircuitBuilder::new(5).h(0).cx_chain().build();
        assert!(topo.validate_circuit(&chain).is_ok());

        let full = CircuitBuilder::new(3).entangle(Entanglement::Full).build();
        assert_eq!(
            topo.validate_circuit(&full),
            Err(HeaError::TopologyViolation { q1: 0, q2: 2 })
        );
        assert_eq!(topo.missing_couplings(&full), vec![(0, 2)]);
    }

    #[test]
    fn test_validate_circuit_too_wide() {
        let topo = Topology::linear(2);
        let circuit = CircuitBuilder::new(3).h(2).build();
        assert!(matches!(
            topo.validate_circuit(&circuit),
            Err(HeaError::QubitOutOfRange { qubit: 2, max: 1 })
        ));
    }

    #[test]
    fn test_all_to_all() {
        let topo = Topology::all_to_all(4);
        assert_eq!(topo.num_edges(), 6);

        for i in 0..4 {
            for j in 0..4 {
                assert!(topo.is_connected(i, j));
            }
        }
    }
}
