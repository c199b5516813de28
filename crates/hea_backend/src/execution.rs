//! Backend execution types and traits
//!
//! Gantree: L3_Backend → BackendTrait
//!
//! Defines the interface for executing ansatz circuits and the
//! result type shared by every backend.

use hea_core::{Bitstring, Circuit, Counts, Distribution, HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Result of circuit execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts (bitstring -> count)
    pub counts: Counts,

    /// Number of shots executed
    pub shots: u64,

    /// Execution metadata
    pub metadata: ExecutionMetadata,
}

/// Execution metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Backend name
    pub backend: String,

    /// Execution time in milliseconds
    pub execution_time_ms: Option<u64>,

    /// Whether simulation was used
    pub simulated: bool,

    /// Seed used (if any)
    pub seed: Option<u64>,

    /// Additional info
    pub extra: HashMap<String, String>,
}

impl ExecutionResult {
    /// Create new execution result
    pub fn new(counts: Counts, shots: u64, backend: &str) -> Self {
        Self {
            counts,
            shots,
            metadata: ExecutionMetadata {
                backend: backend.to_string(),
                simulated: true,
                ..Default::default()
            },
        }
    }

    /// Get total count (should equal shots)
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Get probability of a specific bitstring
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        let count = self.counts.get(bitstring).copied().unwrap_or(0);
        count as f64 / self.shots as f64
    }

    /// Most frequent bitstring; ties go to the lexicographically smaller one
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.counts
            .iter()
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
            .map(|(bs, &count)| (bs, count))
    }

    /// Counts for every basis state in index order, unobserved states as 0
    /// Gantree: padded_counts(n) -> Result<Vec<(String,u64)>> // 0 채움 카운트
    pub fn padded_counts(&self, num_qubits: usize) -> HeaResult<Vec<(String, u64)>> {
        let len = Distribution::state_count(num_qubits)?;
        Ok((0..len)
            .map(|i| {
                let bs = Bitstring::from_index(i, num_qubits).to_string();
                let count = self.counts.get(&bs).copied().unwrap_or(0);
                (bs, count)
            })
            .collect())
    }

    /// Measured distribution over all 2^N states
    /// Gantree: distribution(n) -> Result<Distribution> // 확률 분포
    pub fn distribution(&self, num_qubits: usize) -> HeaResult<Distribution> {
        if self.total_counts() != self.shots {
            return Err(HeaError::BackendError(format!(
                "counts sum to {} but {} shots were taken",
                self.total_counts(),
                self.shots
            )));
        }
        Distribution::from_counts(&self.counts, num_qubits)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecutionResult(shots={}, unique={}, backend={})",
            self.shots,
            self.counts.len(),
            self.metadata.backend
        )
    }
}

/// Quantum backend trait
/// Gantree: BackendTrait // 백엔드 인터페이스
pub trait Backend: Send + Sync {
    /// Get backend name
    fn name(&self) -> &str;

    /// Get number of qubits
    fn num_qubits(&self) -> usize;

    /// Execute a circuit
    /// Gantree: execute(circuit, shots) -> Result<ExecutionResult>
    fn execute(&self, circuit: &Circuit, shots: u64) -> HeaResult<ExecutionResult>;

    /// Execute multiple circuits (batch)
    fn execute_batch(&self, circuits: &[Circuit], shots: u64) -> HeaResult<Vec<ExecutionResult>> {
        circuits.iter().map(|c| self.execute(c, shots)).collect()
    }

    /// Exact output distribution, where the backend can compute one
    fn probabilities(&self, circuit: &Circuit) -> HeaResult<Distribution> {
        let _ = circuit;
        Err(HeaError::BackendError(format!(
            "{} cannot compute exact probabilities",
            self.name()
        )))
    }

    /// Check if backend is simulator
    fn is_simulator(&self) -> bool {
        true
    }

    /// Get maximum shots per execution
    fn max_shots(&self) -> u64 {
        hea_core::constants::execution::MAX_SHOTS
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_counts() -> Counts {
        let mut counts = HashMap::new();
        counts.insert("000".to_string(), 400);
        counts.insert("001".to_string(), 100);
        counts.insert("011".to_string(), 100);
        counts.insert("100".to_string(), 250);
        counts.insert("110".to_string(), 100);
        counts.insert("111".to_string(), 50);
        counts
    }

    #[test]
    fn test_total_counts() {
        let result = ExecutionResult::new(make_test_counts(), 1000, "test");
        assert_eq!(result.total_counts(), 1000);
        assert_eq!(result.metadata.backend, "test");
    }

    #[test]
    fn test_probability() {
        let result = ExecutionResult::new(make_test_counts(), 1000, "test");

        assert!((result.probability("000") - 0.4).abs() < 1e-10);
        assert!((result.probability("111") - 0.05).abs() < 1e-10);
        assert_eq!(result.probability("010"), 0.0);
    }

    #[test]
    fn test_padded_counts_fill_unobserved() {
        let result = ExecutionResult::new(make_test_counts(), 1000, "test");
        let padded = result.padded_counts(3).unwrap();

        assert_eq!(padded.len(), 8);
        assert_eq!(padded[2], ("010".to_string(), 0));
        assert_eq!(padded[4], ("100".to_string(), 250));
        assert_eq!(padded[5], ("101".to_string(), 0));
    }

    #[test]
    fn test_padded_counts_rejects_wide_register() {
        let result = ExecutionResult::new(Counts::new(), 1, "test");
        assert!(matches!(
            result.padded_counts(64),
            Err(HeaError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_distribution() {
        let result = ExecutionResult::new(make_test_counts(), 1000, "test");
        let dist = result.distribution(3).unwrap();

        assert_eq!(
            dist.as_slice(),
            &[0.4, 0.1, 0.0, 0.1, 0.25, 0.0, 0.1, 0.05]
        );
    }

    #[test]
    fn test_distribution_rejects_inconsistent_shots() {
        let result = ExecutionResult::new(make_test_counts(), 999, "test");
        assert!(result.distribution(3).is_err());
    }

    #[test]
    fn test_most_frequent() {
        let result = ExecutionResult::new(make_test_counts(), 1000, "test");

        let (bs, count) = result.most_frequent().unwrap();
        assert_eq!(bs, "000");
        assert_eq!(count, 400);

        let mut tied = Counts::new();
        tied.insert("10".to_string(), 5);
        tied.insert("01".to_string(), 5);
        let tied = ExecutionResult::new(tied, 10, "test");
        assert_eq!(tied.most_frequent().unwrap().0, "01");
    }
}
