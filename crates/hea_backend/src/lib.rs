//! # HEA Backend
//!
//! Backend abstraction and state-vector execution of ansatz circuits.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_backend // L3: Backend
//!     BackendTrait // 백엔드 인터페이스
//!         execute(), execute_batch(), probabilities()
//!     ExecutionResult // 측정 결과
//!         probability(), padded_counts(), distribution()
//!     SimulatorBackend // 상태벡터 시뮬레이터
//!         ideal(), from_depol(), with_seed()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_backend::prelude::*;
//! use hea_core::CircuitBuilder;
//!
//! let backend = SimulatorBackend::ideal(3).with_seed(42);
//!
//! let circuit = CircuitBuilder::new(3)
//!     .h(0)
//!     .cnot(0, 1)
//!     .cnot(1, 2)
//!     .measure_all()
//!     .build();
//!
//! let result = backend.execute(&circuit, 1000).unwrap();
//! println!("P(000) = {:.3}", result.probability("000"));
//! ```
//!
//! ## Noisy Simulation
//!
//! ```rust
//! use hea_backend::prelude::*;
//! use hea_core::CircuitBuilder;
//!
//! let backend = SimulatorBackend::from_depol(2, 0.02)
//!     .unwrap()
//!     .with_seed(42);
//!
//! let circuit = CircuitBuilder::new(2).h(0).cnot(0, 1).build();
//! let dist = backend.execute(&circuit, 1000).unwrap().distribution(2).unwrap();
//! println!("{}", dist);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Execution types and backend trait (Gantree: L3_Backend → BackendTrait)
pub mod execution;

/// Simulator backend (Gantree: L3_Backend → SimulatorBackend)
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use execution::{Backend, ExecutionMetadata, ExecutionResult};
pub use simulator::SimulatorBackend;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hea_backend::prelude::*;
    //! ```

    pub use crate::execution::{Backend, ExecutionMetadata, ExecutionResult};
    pub use crate::simulator::SimulatorBackend;
}

// ============================================================================
// Integration Tests
// ============================================================================
