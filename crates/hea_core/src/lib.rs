//! # HEA Core
//!
//! Core types, circuits, topology and ansatz construction for the
//! hardware-efficient ansatz generator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_core // L0+L1+L2: Foundation + Circuit + Ansatz
//!     L0_Foundation // 기반 타입/상수/에러
//!         CoreTypes // 핵심 타입
//!         Constants // 기본값/한계
//!         Errors // 에러 타입
//!     L1_Circuit // 회로 구조
//!         Gate // 게이트 enum + 계열/얽힘
//!         Circuit // 회로 구조체
//!         CircuitBuilder // 빌더 패턴
//!         Topology // 큐비트 토폴로지
//!         Distribution // 확률 분포
//!     L2_Ansatz // 안사츠 생성
//!         AnsatzSpec // 레이어 반복 회로
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_core::prelude::*;
//!
//! let spec = AnsatzSpec::new(3, Entanglement::Full, GateFamily::RotationPair, 2).unwrap();
//! let params = vec![0.25; spec.num_parameters()];
//! let circuit = spec.build(&params).unwrap();
//!
//! println!("{}", circuit);
//! println!("{}", circuit.to_qasm());
//! ```
//!
//! ## Topology Check
//!
//! ```rust
//! use hea_core::prelude::*;
//!
//! let spec = AnsatzSpec::new(4, Entanglement::Full, GateFamily::UnitaryThree, 1).unwrap();
//!
//! // all-pairs coupling needs routing on a chain
//! assert!(spec.fits(&Topology::linear(4)).is_err());
//! assert!(spec.fits(&spec.required_topology()).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

/// Qubit topology (Gantree: L1_Circuit → Topology)
pub mod topology;

/// Probability distributions (Gantree: L1_Circuit → Distribution)
pub mod distribution;

/// Ansatz generation (Gantree: L2_Ansatz → AnsatzSpec)
pub mod ansatz;

// ============================================================================
// Re-exports
// ============================================================================

pub use ansatz::{AnsatzSpec, Layer, Rotation, RotationKind};
pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use distribution::Distribution;
pub use error::{HeaError, HeaResult};
pub use gate::{Entanglement, Gate, GateFamily};
pub use topology::Topology;
pub use types::{Angle, Bitstring, Counts, ParamVec, Probability, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use hea_core::prelude::*;
    //! ```

    pub use crate::ansatz::{AnsatzSpec, Layer, Rotation, RotationKind};
    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants::{ansatz as ansatz_defaults, execution, optimizer};
    pub use crate::distribution::Distribution;
    pub use crate::error::{HeaError, HeaResult};
    pub use crate::gate::{Entanglement, Gate, GateFamily};
    pub use crate::topology::Topology;
    pub use crate::types::{Angle, Bitstring, Counts, ParamVec, Probability, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
