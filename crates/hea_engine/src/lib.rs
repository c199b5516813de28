//! # HEA Engine
//!
//! Variational fitting of target distributions with hardware-efficient
//! ansätze.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_engine // L4: Engine
//!     VqaConfig // 실행 설정
//!         target, gate_family, entanglement, layers
//!         shots, cost, evaluation, optimizer, noise, seed
//!         JSON load/save
//!     CostFunction // 비용 함수
//!         Manhattan, Euclidean, KullbackLeibler
//!     Optimizer // 최적화기
//!         Cobyla - trust-region simplex
//!         Spsa - stochastic gradient, optional early stop
//!     Convergence // 수렴 판단
//!     VqaRunner // 변분 실행기
//!         objective() → optimize() → sample()
//!         find_target_distribution() - 원클릭 실행
//!     Pipeline // 단계별 실행
//!         build_ansatz() → validate_topology() → optimize() → sample()
//!     DistributionReport // 결과 리포트
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_engine::prelude::*;
//!
//! let target = Distribution::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap();
//! let config = VqaConfig::exact(target)
//!     .with_layers(1)
//!     .with_optimizer(Cobyla::new().with_max_iter(60))
//!     .with_seed(7);
//!
//! let outcome = VqaRunner::new(config)
//!     .unwrap()
//!     .find_target_distribution()
//!     .unwrap();
//! println!("{}", outcome);
//! assert!(outcome.cost <= outcome.initial_cost());
//! ```
//!
//! ## Using Pipeline
//!
//! ```rust
//! use hea_engine::prelude::*;
//!
//! let target = Distribution::uniform(2).unwrap();
//! let config = VqaConfig::quick(target)
//!     .with_optimizer(Cobyla::new().with_max_iter(20))
//!     .with_seed(42);
//!
//! let mut pipeline = Pipeline::new(config);
//!
//! // Run stages individually
//! pipeline.build_ansatz().unwrap();
//! pipeline.validate_topology(None).unwrap();
//! pipeline.optimize().unwrap();
//! pipeline.sample().unwrap();
//!
//! let report = pipeline.report().unwrap();
//! println!("{}", report.render(ReportFormat::Markdown).unwrap());
//! ```
//!
//! ## Configuration from JSON
//!
//! ```rust
//! use hea_engine::prelude::*;
//!
//! let json = r#"{
//!     "target": [0.25, 0.25, 0.25, 0.25],
//!     "gate_family": "unitary_three",
//!     "entanglement": "linear",
//!     "layers": 2,
//!     "optimizer": { "method": "spsa", "max_iter": 50 }
//! }"#;
//!
//! let config = VqaConfig::from_json_str(json).unwrap();
//! assert_eq!(config.layers, 2);
//! assert_eq!(config.optimizer.max_iter(), 50);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L4_Engine → VqaConfig)
pub mod config;

/// Cost functions (Gantree: L4_Engine → CostFunction)
pub mod cost;

/// Convergence tracking (Gantree: L4_Engine → Convergence)
pub mod convergence;

/// Optimizers (Gantree: L4_Engine → Optimizer)
pub mod optimizer;

/// VQA runner (Gantree: L4_Engine → VqaRunner)
pub mod runner;

/// Pipeline (Gantree: L4_Engine → Pipeline)
pub mod pipeline;

/// Reporting (Gantree: L4_Engine → Report)
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{EvaluationMode, VqaConfig};
pub use convergence::Convergence;
pub use cost::CostFunction;
pub use optimizer::{Cobyla, Objective, Optimizer, OptimizerChoice, OptimizerOutcome, Spsa};
pub use pipeline::{Pipeline, PipelineStage, PipelineState};
pub use report::{DistributionReport, ReportFormat, ReportRow};
pub use runner::{VqaOutcome, VqaRunner};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hea_engine::prelude::*;
    //! ```

    pub use crate::config::{EvaluationMode, VqaConfig};
    pub use crate::convergence::Convergence;
    pub use crate::cost::CostFunction;
    pub use crate::optimizer::{Cobyla, Optimizer, OptimizerChoice, OptimizerOutcome, Spsa};
    pub use crate::pipeline::{Pipeline, PipelineStage};
    pub use crate::report::{DistributionReport, ReportFormat};
    pub use crate::runner::{VqaOutcome, VqaRunner};
    pub use hea_core::{Distribution, Entanglement, GateFamily, HeaError, HeaResult, Topology};
    pub use hea_noise::NoiseModel;
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
