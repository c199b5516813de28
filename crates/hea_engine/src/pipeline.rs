//! Pipeline for staged VQA execution
//!
//! Gantree: L4_Engine → Pipeline
//!
//! Provides staged execution with intermediate results:
//! build_ansatz → validate_topology → optimize → sample.

use crate::config::VqaConfig;
use crate::optimizer::OptimizerOutcome;
use crate::report::DistributionReport;
use crate::runner::{VqaOutcome, VqaRunner};
use hea_core::{Circuit, HeaError, HeaResult, Topology};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Initial state
    Initial,
    /// Ansatz built at the initial parameters
    AnsatzBuilt,
    /// Ansatz checked against a device topology
    Validated,
    /// Optimization completed
    Optimized,
    /// Found parameters executed
    Sampled,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pipeline state holding intermediate results
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,

    /// Configuration
    pub config: VqaConfig,

    /// Ansatz circuit at the initial parameters
    pub circuit: Option<Circuit>,

    /// Topology the ansatz was validated against
    pub topology: Option<Topology>,

    /// Optimizer result
    pub optimized: Option<OptimizerOutcome>,

    /// Final outcome
    pub outcome: Option<VqaOutcome>,
}

impl PipelineState {
    /// Create new pipeline state
    pub fn new(config: VqaConfig) -> Self {
        Self {
            stage: PipelineStage::Initial,
            config,
            circuit: None,
            topology: None,
            optimized: None,
            outcome: None,
        }
    }

    /// Check if ansatz built
    pub fn has_circuit(&self) -> bool {
        self.circuit.is_some()
    }

    /// Check if optimized
    pub fn is_optimized(&self) -> bool {
        self.optimized.is_some()
    }

    /// Check if sampled
    pub fn is_sampled(&self) -> bool {
        self.outcome.is_some()
    }
}

/// VQA execution pipeline
/// Gantree: Pipeline // 단계별 실행
pub struct Pipeline {
    /// Current state
    state: PipelineState,

    /// Runner created by `build_ansatz`
    runner: Option<VqaRunner>,

    /// Start of the current run
    started: Option<Instant>,
}

impl Pipeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new pipeline with configuration
    pub fn new(config: VqaConfig) -> Self {
        Self {
            state: PipelineState::new(config),
            runner: None,
            started: None,
        }
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Get configuration
    pub fn config(&self) -> &VqaConfig {
        &self.state.config
    }

    /// Runner, once the ansatz is built
    pub fn runner(&self) -> Option<&VqaRunner> {
        self.runner.as_ref()
    }

    fn require(&self, expected: PipelineStage, action: &str) -> HeaResult<()> {
        if self.state.stage != expected {
            return Err(HeaError::PipelineStage(format!(
                "cannot {} at stage {}, expected {}",
                action, self.state.stage, expected
            )));
        }
        Ok(())
    }

    fn runner_ref(&self) -> HeaResult<&VqaRunner> {
        self.runner
            .as_ref()
            .ok_or_else(|| HeaError::PipelineStage("ansatz has not been built".into()))
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Stage 1: Build ansatz
    ///
    /// Validates the configuration, draws initial parameters and builds
    /// the circuit at those parameters.
    pub fn build_ansatz(&mut self) -> HeaResult<&Circuit> {
        self.require(PipelineStage::Initial, "build ansatz")?;
        info!("Pipeline: building ansatz...");

        self.started = Some(Instant::now());
        let runner = VqaRunner::new(self.state.config.clone())?;
        let circuit = runner.circuit(runner.initial_parameters())?;

        self.runner = Some(runner);
        self.state.stage = PipelineStage::AnsatzBuilt;
        Ok(self.state.circuit.insert(circuit))
    }

    /// Stage 2: Validate topology
    ///
    /// `None` checks against the topology the ansatz itself requires.
    pub fn validate_topology(&mut self, topology: Option<&Topology>) -> HeaResult<()> {
        self.require(PipelineStage::AnsatzBuilt, "validate topology")?;
        let runner = self.runner_ref()?;

        let topology = match topology {
            Some(t) => t.clone(),
            None => runner.ansatz().required_topology(),
        };

        if let Err(e) = runner.ansatz().fits(&topology) {
            warn!("Pipeline: ansatz needs routing on this device: {}", e);
            return Err(e);
        }

        info!("Pipeline: ansatz fits topology ({} edges)", topology.num_edges());
        self.state.topology = Some(topology);
        self.state.stage = PipelineStage::Validated;
        Ok(())
    }

    /// Stage 3: Optimize
    pub fn optimize(&mut self) -> HeaResult<&OptimizerOutcome> {
        self.require(PipelineStage::Validated, "optimize")?;
        info!("Pipeline: optimizing...");

        let optimized = self.runner_ref()?.optimize()?;

        self.state.stage = PipelineStage::Optimized;
        Ok(self.state.optimized.insert(optimized))
    }

    /// Stage 4: Sample
    ///
    /// Executes the found parameters and assembles the outcome.
    pub fn sample(&mut self) -> HeaResult<&VqaOutcome> {
        self.require(PipelineStage::Optimized, "sample")?;
        let optimized = self
            .state
            .optimized
            .as_ref()
            .ok_or_else(|| HeaError::PipelineStage("no optimizer result".into()))?;

        let mut outcome = self.runner_ref()?.sample(optimized)?;
        if let Some(started) = self.started {
            outcome.total_time_ms = started.elapsed().as_millis() as u64;
        }

        self.state.stage = PipelineStage::Sampled;
        Ok(self.state.outcome.insert(outcome))
    }

    /// Run full pipeline
    ///
    /// Executes all stages in sequence from the initial stage.
    pub fn run(&mut self) -> HeaResult<VqaOutcome> {
        self.build_ansatz()?;
        self.validate_topology(None)?;
        self.optimize()?;
        Ok(self.sample()?.clone())
    }

    /// Comparison report of the sampled outcome
    pub fn report(&self) -> Option<DistributionReport> {
        self.state.outcome.as_ref().map(DistributionReport::from_outcome)
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset pipeline to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.reconfigure(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: VqaConfig) {
        self.state = PipelineState::new(config);
        self.runner = None;
        self.started = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
