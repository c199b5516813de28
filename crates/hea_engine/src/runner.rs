//! Variational runner
//!
//! Gantree: L4_Engine → VqaRunner
//!
//! Builds the ansatz from a configuration, scores parameter vectors
//! against the target and drives the optimizer.

use crate::config::{EvaluationMode, VqaConfig};
use crate::cost::CostFunction;
use crate::optimizer::{Optimizer, OptimizerOutcome};
use hea_backend::{Backend, SimulatorBackend};
use hea_core::{AnsatzSpec, Circuit, Counts, Distribution, HeaResult, ParamVec};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Result of fitting the ansatz to the target
/// Gantree: VqaOutcome // 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqaOutcome {
    /// Target distribution
    pub target: Distribution,

    /// Distribution produced by the found parameters
    pub output: Distribution,

    /// Counts from the final execution
    pub counts: Counts,

    /// Best objective value reached by the optimizer
    pub cost: f64,

    /// Cost function used
    pub cost_function: CostFunction,

    /// Parameters found
    pub params: ParamVec,

    /// Starting parameters
    pub initial_params: ParamVec,

    /// Objective evaluations
    pub evaluations: usize,

    /// Optimizer iterations
    pub iterations: usize,

    /// Whether the optimizer met its stopping criterion
    pub converged: bool,

    /// Best cost after each iteration
    pub history: Vec<f64>,

    /// Shots of the final execution
    pub shots: u64,

    /// Wall time of the whole run (0 when sampled on its own)
    pub total_time_ms: u64,
}

impl VqaOutcome {
    /// Cost of the final output distribution, recomputed
    pub fn final_error(&self) -> HeaResult<f64> {
        self.cost_function.evaluate(&self.target, &self.output)
    }

    /// Cost at the initial parameters
    pub fn initial_cost(&self) -> f64 {
        self.history.first().copied().unwrap_or(self.cost)
    }

    /// Cost reduction over the run
    pub fn improvement(&self) -> f64 {
        self.initial_cost() - self.cost
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.target.num_qubits()
    }
}

impl fmt::Display for VqaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target Distribution:   {:?}", self.target.as_slice())?;
        writeln!(f, "Obtained Distribution: {:?}", self.output.as_slice())?;
        writeln!(f, "Output Error ({}): {:.6}", self.cost_function, self.cost)?;
        writeln!(f, "Parameters Found:   {:?}", self.params)?;
        writeln!(f, "Initial Parameters: {:?}", self.initial_params)?;
        write!(f, "Evaluations: {}", self.evaluations)
    }
}

/// VQA runner
/// Gantree: VqaRunner // 변분 실행기
pub struct VqaRunner {
    /// Configuration
    config: VqaConfig,

    /// Ansatz shape
    ansatz: AnsatzSpec,

    /// Execution backend
    backend: SimulatorBackend,

    /// Starting point of the optimization
    initial_params: ParamVec,
}

impl VqaRunner {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Validate configuration and prepare the ansatz and backend
    /// Gantree: new(config) -> Result<Self> // 생성+검증
    pub fn new(config: VqaConfig) -> HeaResult<Self> {
        config.validate()?;

        let ansatz = config.ansatz_spec()?;
        let n = ansatz.num_qubits();

        let mut backend = SimulatorBackend::new(n, config.noise.clone()).with_name("hea_vqa");
        if let Some(seed) = config.seed {
            backend = backend.with_seed(seed);
        }

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let initial_params = ansatz.random_parameters(&mut rng);

        if ansatz.num_parameters() > config.target.len() {
            warn!(
                "{} parameters for {} target probabilities; the ansatz may overfit shot noise",
                ansatz.num_parameters(),
                config.target.len()
            );
        }

        Ok(Self {
            config,
            ansatz,
            backend,
            initial_params,
        })
    }

    /// Replace the random starting point
    pub fn with_initial_parameters(mut self, params: ParamVec) -> HeaResult<Self> {
        self.ansatz.check_parameters(&params)?;
        self.initial_params = params;
        Ok(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get configuration
    pub fn config(&self) -> &VqaConfig {
        &self.config
    }

    /// Get ansatz shape
    pub fn ansatz(&self) -> &AnsatzSpec {
        &self.ansatz
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.ansatz.num_qubits()
    }

    /// Starting parameters
    pub fn initial_parameters(&self) -> &[f64] {
        &self.initial_params
    }

    /// Execution backend
    pub fn backend(&self) -> &SimulatorBackend {
        &self.backend
    }

    // ========================================================================
    // Objective
    // ========================================================================

    /// Ansatz circuit for a parameter vector
    pub fn circuit(&self, params: &[f64]) -> HeaResult<Circuit> {
        self.ansatz.build(params)
    }

    /// Output distribution for a parameter vector
    /// Gantree: output_distribution(params) -> Result<Distribution> // 출력 분포
    pub fn output_distribution(&self, params: &[f64]) -> HeaResult<Distribution> {
        let circuit = self.circuit(params)?;
        match self.config.evaluation {
            EvaluationMode::Exact => self.backend.probabilities(&circuit),
            EvaluationMode::Sampled => self
                .backend
                .execute(&circuit, self.config.shots)?
                .distribution(self.num_qubits()),
        }
    }

    /// Cost of a parameter vector against the target
    /// Gantree: objective(params) -> Result<f64> // 목적 함수
    pub fn objective(&self, params: &[f64]) -> HeaResult<f64> {
        let output = self.output_distribution(params)?;
        self.config.cost.evaluate(&self.config.target, &output)
    }

    // ========================================================================
    // Main Optimization
    // ========================================================================

    /// Run the optimizer from the initial parameters
    /// Gantree: optimize() -> Result<OptimizerOutcome> // 최적화
    pub fn optimize(&self) -> HeaResult<OptimizerOutcome> {
        let optimizer = self.config.optimizer.clone().seeded(self.config.seed);

        info!(
            "Fitting {} parameters with {}: {}",
            self.ansatz.num_parameters(),
            optimizer,
            self.ansatz
        );

        let mut objective = |params: &[f64]| self.objective(params);
        let outcome = optimizer.minimize(&mut objective, &self.initial_params)?;

        info!(
            "{} finished: cost {:.6} -> {:.6} after {} iterations ({} evaluations){}",
            optimizer.name(),
            outcome.initial_value(),
            outcome.value,
            outcome.iterations,
            outcome.evaluations,
            if outcome.converged { "" } else { ", iteration limit reached" }
        );

        Ok(outcome)
    }

    /// Execute the found parameters and assemble the outcome
    /// Gantree: sample(outcome) -> Result<VqaOutcome> // 최종 샘플링
    pub fn sample(&self, optimized: &OptimizerOutcome) -> HeaResult<VqaOutcome> {
        let circuit = self.circuit(&optimized.params)?;
        let result = self.backend.execute(&circuit, self.config.shots)?;

        let output = match self.config.evaluation {
            EvaluationMode::Exact => self.backend.probabilities(&circuit)?,
            EvaluationMode::Sampled => result.distribution(self.num_qubits())?,
        };

        let outcome = VqaOutcome {
            target: self.config.target.clone(),
            output,
            counts: result.counts,
            cost: optimized.value,
            cost_function: self.config.cost,
            params: optimized.params.clone(),
            initial_params: self.initial_params.clone(),
            evaluations: optimized.evaluations,
            iterations: optimized.iterations,
            converged: optimized.converged,
            history: optimized.history.clone(),
            shots: self.config.shots,
            total_time_ms: 0,
        };

        info!("Target distribution:   {:?}", outcome.target.as_slice());
        info!("Obtained distribution: {:?}", outcome.output.as_slice());
        info!("Output error ({}): {:.6}", outcome.cost_function, outcome.cost);

        Ok(outcome)
    }

    /// Fit the ansatz to the target distribution
    ///
    /// This is the main entry point.
    /// Gantree: find_target_distribution() -> Result<VqaOutcome> // 목표 분포 탐색
    pub fn find_target_distribution(&self) -> HeaResult<VqaOutcome> {
        let started = Instant::now();
        info!("Starting VQA: {}", self.config);

        let optimized = self.optimize()?;
        let mut outcome = self.sample(&optimized)?;
        outcome.total_time_ms = started.elapsed().as_millis() as u64;
        Ok(outcome)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::{Cobyla, Spsa};
    use approx::assert_relative_eq;
    use hea_core::{Entanglement, GateFamily, HeaError};
    use hea_noise::NoiseModel;

    fn target(p: &[f64]) -> Distribution {
        Distribution::new(p.to_vec()).unwrap()
    }

    #[test]
    fn test_runner_new() {
        let config = VqaConfig::new(target(&[0.5, 0.0, 0.0, 0.5])).with_seed(1);
        let runner = VqaRunner::new(config).unwrap();

        assert_eq!(runner.num_qubits(), 2);
        assert_eq!(runner.initial_parameters().len(), 2 * 3 * 4);
        assert!(runner
            .initial_parameters()
            .iter()
            .all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn test_runner_rejects_invalid_config() {
        let config = VqaConfig::new(target(&[1.0, 0.0])).with_shots(0);
        assert!(matches!(
            VqaRunner::new(config),
            Err(HeaError::ShotsOutOfRange(..))
        ));
    }

    #[test]
    fn test_initial_parameters_seeded() {
        let config = VqaConfig::new(target(&[0.25; 4])).with_seed(77);
        let a = VqaRunner::new(config.clone()).unwrap();
        let b = VqaRunner::new(config).unwrap();
        assert_eq!(a.initial_parameters(), b.initial_parameters());
    }

    #[test]
    fn test_with_initial_parameters() {
        let config = VqaConfig::new(target(&[1.0, 0.0])).with_layers(1);
        let runner = VqaRunner::new(config).unwrap();

        assert!(runner.with_initial_parameters(vec![0.0; 2]).is_err());

        let config = VqaConfig::new(target(&[1.0, 0.0])).with_layers(1);
        let runner = VqaRunner::new(config)
            .unwrap()
            .with_initial_parameters(vec![0.0; 3])
            .unwrap();
        assert_eq!(runner.initial_parameters(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_exact_objective_at_known_point() {
        // Ry(π/2) on one qubit gives a fair coin
        let config = VqaConfig::exact(target(&[0.5, 0.5]))
            .with_gate_family(GateFamily::RotationPair)
            .with_layers(1);
        let runner = VqaRunner::new(config).unwrap();

        assert_relative_eq!(
            runner.objective(&[std::f64::consts::FRAC_PI_2, 0.0]).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(runner.objective(&[0.0, 0.0]).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sampled_objective_deterministic_per_params() {
        let config = VqaConfig::new(target(&[0.25; 4])).with_seed(5);
        let runner = VqaRunner::new(config).unwrap();
        let params = runner.initial_parameters().to_vec();

        assert_eq!(
            runner.objective(&params).unwrap(),
            runner.objective(&params).unwrap()
        );
    }

    #[test]
    fn test_fit_single_qubit_exact() {
        let config = VqaConfig::exact(target(&[0.2, 0.8]))
            .with_layers(1)
            .with_optimizer(Cobyla::new().with_max_iter(200).with_tol(1e-8))
            .with_seed(3);

        let outcome = VqaRunner::new(config)
            .unwrap()
            .find_target_distribution()
            .unwrap();

        assert!(outcome.cost < 0.02, "cost = {}", outcome.cost);
        assert_relative_eq!(outcome.output.get(1).unwrap(), 0.8, epsilon = 0.02);
        assert_eq!(outcome.counts.values().sum::<u64>(), outcome.shots);
        assert!(outcome.history.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_fit_bell_target_sampled() {
        let config = VqaConfig::new(target(&[0.5, 0.0, 0.0, 0.5]))
            .with_gate_family(GateFamily::RotationPair)
            .with_entanglement(Entanglement::Linear)
            .with_layers(1)
            .with_shots(2000)
            .with_optimizer(Cobyla::new().with_max_iter(150))
            .with_seed(42);

        let runner = VqaRunner::new(config).unwrap();
        let outcome = runner.find_target_distribution().unwrap();

        assert!(outcome.cost < outcome.initial_cost());
        assert!(outcome.cost < 0.3, "cost = {}", outcome.cost);
        assert_eq!(outcome.initial_params, runner.initial_parameters());
        assert!(outcome.final_error().unwrap() >= 0.0);
    }

    #[test]
    fn test_spsa_runner_under_noise() {
        let config = VqaConfig::new(target(&[0.0, 1.0]))
            .with_layers(1)
            .with_shots(256)
            .with_noise(NoiseModel::from_depol(0.01).unwrap())
            .with_optimizer(Spsa::new().with_max_iter(60).with_gains(0.6, 0.2))
            .with_seed(8);

        let outcome = VqaRunner::new(config)
            .unwrap()
            .find_target_distribution()
            .unwrap();

        assert_eq!(outcome.evaluations, 1 + 3 * 60);
        assert!(outcome.improvement() >= 0.0);
        assert!(outcome.cost < 0.5, "cost = {}", outcome.cost);
    }
}
