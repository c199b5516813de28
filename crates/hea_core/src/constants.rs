//! Default values and limits for HEA
//!
//! Gantree: L0_Foundation → Constants

// ============================================================================
// Ansatz Defaults
// Gantree: ansatz // 안사츠 기본값
// ============================================================================

pub mod ansatz {
    //! Shape defaults for generated ansatz circuits

    /// Default number of variational layers
    /// Gantree: DEFAULT_LAYERS: usize = 4
    pub const DEFAULT_LAYERS: usize = 4;

    /// Largest register the state-vector simulator accepts
    pub const MAX_QUBITS: usize = 24;

    /// Parameters per qubit per layer for the Ry/Rz family
    pub const ROTATION_PAIR_PARAMS: usize = 2;

    /// Parameters per qubit per layer for the U3 family
    pub const UNITARY_PARAMS: usize = 3;
}

// ============================================================================
// Distribution Constants
// ============================================================================

pub mod distribution {
    //! Tolerances used when validating probability vectors

    /// Allowed deviation of sum(p) from 1
    pub const SUM_TOLERANCE: f64 = 1e-6;

    /// Floor applied inside the KL logarithm
    pub const KL_EPSILON: f64 = 1e-12;
}

// ============================================================================
// Execution Constants
// Gantree: execution // 실행 상수
// ============================================================================

pub mod execution {
    //! Shot counts and noise limits

    /// Default number of shots per circuit evaluation
    /// Gantree: DEFAULT_SHOTS: u64 = 1024
    pub const DEFAULT_SHOTS: u64 = 1024;

    /// Minimum shots
    pub const MIN_SHOTS: u64 = 1;

    /// Maximum shots accepted by the simulator
    pub const MAX_SHOTS: u64 = 1_000_000;

    /// Absolute maximum depolarizing noise level
    pub const ABSOLUTE_MAX_NOISE: f64 = 0.06;

    /// Two-qubit error rate relative to the single-qubit rate
    pub const TWO_QUBIT_ERROR_RATIO: f64 = 10.0;

    /// Readout error relative to the single-qubit rate
    pub const READOUT_ERROR_RATIO: f64 = 0.25;
}

// ============================================================================
// Optimizer Defaults
// ============================================================================

pub mod optimizer {
    //! Classical optimizer defaults

    /// Default maximum optimizer iterations
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;

    /// Default convergence tolerance
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    /// Initial trust-region radius for COBYLA
    pub const DEFAULT_RHO_BEGIN: f64 = 0.5;

    /// Final trust-region radius for COBYLA
    pub const DEFAULT_RHO_END: f64 = 1e-3;

    /// SPSA step-size gain a
    pub const SPSA_A: f64 = 0.1;

    /// SPSA perturbation gain c
    pub const SPSA_C: f64 = 0.1;

    /// SPSA step-size decay exponent
    pub const SPSA_ALPHA: f64 = 0.602;

    /// SPSA perturbation decay exponent
    pub const SPSA_GAMMA: f64 = 0.101;

    /// Number of recent improvements inspected for early stopping
    pub const CONVERGENCE_WINDOW: usize = 3;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_ratios() {
        // max 2Q error stays a probability
        assert!(execution::ABSOLUTE_MAX_NOISE * execution::TWO_QUBIT_ERROR_RATIO <= 1.0);
        assert!(execution::READOUT_ERROR_RATIO < 1.0);
    }

    #[test]
    fn test_shot_bounds() {
        assert!(execution::MIN_SHOTS <= execution::DEFAULT_SHOTS);
        assert!(execution::DEFAULT_SHOTS <= execution::MAX_SHOTS);
    }

    #[test]
    fn test_rho_ordering() {
        assert!(optimizer::DEFAULT_RHO_END < optimizer::DEFAULT_RHO_BEGIN);
    }
}
