//! Error types for HEA
//!
//! Gantree: L0_Foundation → Errors
//!
//! One error enum shared by every crate in the workspace.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for HEA
/// Gantree: HeaError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    /// Gantree: InvalidProbability(f64) // 확률 범위
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Qubit index out of range
    /// Gantree: QubitOutOfRange{{q,max}} // 큐비트 범위
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    /// Invalid T2 value (must be <= 2*T1)
    #[error("Invalid T2 ({t2_us:.2}µs): must be <= 2*T1 ({t1_us:.2}µs)")]
    InvalidT2 { t2_us: f64, t1_us: f64 },

    /// Invalid noise level
    #[error("Invalid noise level {0}: must be in range [0, 0.06]")]
    InvalidNoiseLevel(f64),

    /// Invalid bitstring format
    #[error("Invalid bitstring '{0}': must contain only '0' and '1'")]
    InvalidBitstring(String),

    /// Invalid angle
    #[error("Invalid angle {0}: must be finite")]
    InvalidAngle(f64),

    /// Probability vector is not a distribution over 2^N states
    /// Gantree: InvalidDistribution(String) // 분포 검증
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Two distributions over different state spaces
    #[error("Distribution length mismatch: expected {expected}, got {actual}")]
    DistributionMismatch { expected: usize, actual: usize },

    /// Unknown gate family / entanglement name
    #[error("Unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Empty circuit
    /// Gantree: EmptyCircuit // 빈 회로
    #[error("Circuit is empty")]
    EmptyCircuit,

    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Topology violation (qubits not connected)
    /// Gantree: TopologyViolation{{q1,q2}} // 연결 위반
    #[error("Topology violation: qubits {q1} and {q2} are not connected")]
    TopologyViolation { q1: usize, q2: usize },

    /// Invalid QASM format
    #[error("Invalid QASM: {0}")]
    InvalidQasm(String),

    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// Empty coupling map
    #[error("Coupling map is empty")]
    EmptyCouplingMap,

    /// Invalid coupling
    #[error("Invalid coupling ({0}, {1}): qubits must be different")]
    InvalidCoupling(usize, usize),

    // ========================================================================
    // Ansatz Errors
    // ========================================================================
    /// Ansatz shape rejected
    /// Gantree: InvalidAnsatz(String) // 안사츠 검증
    #[error("Invalid ansatz: {0}")]
    InvalidAnsatz(String),

    /// Wrong number of variational parameters
    /// Gantree: ParameterCountMismatch{{expected,actual}} // 파라미터 수
    #[error("Ansatz expects {expected} parameters, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Backend execution error
    /// Gantree: BackendError(String) // 백엔드
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Shots out of range
    #[error("Shots {0} out of range [{1}, {2}]")]
    ShotsOutOfRange(u64, u64, u64),

    // ========================================================================
    // Optimization Errors
    // ========================================================================
    /// Objective produced NaN or infinity
    #[error("Objective returned non-finite value {0}")]
    NonFiniteCost(f64),

    /// Configuration rejected
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline stage called out of order
    #[error("Pipeline stage error: {0}")]
    PipelineStage(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for HEA operations
/// Gantree: HeaResult<T> // type alias
pub type HeaResult<T> = Result<T, HeaError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for HeaError {
    fn from(err: serde_json::Error) -> Self {
        HeaError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for HeaError {
    fn from(err: std::io::Error) -> Self {
        HeaError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl HeaError {
    /// Check if error is recoverable (a retry with other settings may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HeaError::NonFiniteCost(_)
                | HeaError::BackendError(_)
        )
    }

    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HeaError::InvalidProbability(_)
                | HeaError::QubitOutOfRange { .. }
                | HeaError::InvalidT2 { .. }
                | HeaError::InvalidNoiseLevel(_)
                | HeaError::InvalidBitstring(_)
                | HeaError::InvalidAngle(_)
                | HeaError::InvalidDistribution(_)
                | HeaError::DistributionMismatch { .. }
                | HeaError::UnknownOption { .. }
                | HeaError::InvalidAnsatz(_)
                | HeaError::ParameterCountMismatch { .. }
                | HeaError::ConfigError(_)
        )
    }

    /// Check if error is a circuit error
    pub fn is_circuit_error(&self) -> bool {
        matches!(
            self,
            HeaError::EmptyCircuit
                | HeaError::GateQubitMismatch { .. }
                | HeaError::TopologyViolation { .. }
                | HeaError::InvalidQasm(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeaError::InvalidProbability(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_parameter_count_mismatch_display() {
        let err = HeaError::ParameterCountMismatch {
            expected: 24,
            actual: 23,
        };
        let msg = err.to_string();
        assert!(msg.contains("24"));
        assert!(msg.contains("23"));
    }

    #[test]
    fn test_unknown_option_display() {
        let err = HeaError::UnknownOption {
            kind: "entanglement",
            value: "circular".into(),
        };
        assert_eq!(err.to_string(), "Unknown entanglement 'circular'");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(HeaError::NonFiniteCost(f64::NAN).is_recoverable());
        assert!(!HeaError::EmptyCircuit.is_recoverable());
    }

    #[test]
    fn test_is_validation_error() {
        assert!(HeaError::InvalidAnsatz("layers".into()).is_validation_error());
        assert!(!HeaError::BackendError("test".into()).is_validation_error());
        assert!(HeaError::TopologyViolation { q1: 0, q2: 2 }.is_circuit_error());
    }

    #[test]
    fn test_json_conversion() {
        let err: HeaError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, HeaError::JsonError(_)));
    }
}
