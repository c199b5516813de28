//! # HEA Noise
//!
//! Noise models for simulated ansatz execution.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_noise // L2: Noise Model
//!     NoiseModel // 통합 노이즈
//!         t1_us, t2_us, gate_error_1q, gate_error_2q, readout_error
//!         new(), ideal(), ibm_typical(), from_depol()
//!         validate(), effective_depol(), is_ideal()
//!         estimate_circuit_fidelity()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_noise::prelude::*;
//!
//! // 1Q = p, 2Q = 10p, readout = p/4
//! let model = NoiseModel::from_depol(0.01).unwrap();
//! println!("Effective depol: {:.4}", model.effective_depol());
//! assert!(!model.is_ideal());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Noise model (Gantree: L2_Noise → NoiseModel)
pub mod noise_model;

// ============================================================================
// Re-exports
// ============================================================================

pub use noise_model::NoiseModel;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hea_noise::prelude::*;
    //! ```

    pub use crate::noise_model::NoiseModel;
}

// ============================================================================
// Integration Tests
// ============================================================================
