//! Configuration for a VQA run
//!
//! Gantree: L4_Engine → VqaConfig
//!
//! Everything needed to fit an ansatz to a target distribution:
//! ansatz shape, sampling, cost, optimizer and noise. Serializable to
//! and from JSON.

use crate::cost::CostFunction;
use crate::optimizer::{Cobyla, OptimizerChoice};
use hea_core::constants::ansatz::{DEFAULT_LAYERS, MAX_QUBITS};
use hea_core::constants::execution::{DEFAULT_SHOTS, MAX_SHOTS, MIN_SHOTS};
use hea_core::{AnsatzSpec, Distribution, Entanglement, GateFamily, HeaError, HeaResult};
use hea_noise::NoiseModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// How the objective obtains the output distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Estimate from `shots` measurement samples
    #[default]
    Sampled,
    /// Exact |ψ|² from the state vector (noise-free)
    Exact,
}

fn default_layers() -> usize {
    DEFAULT_LAYERS
}

fn default_shots() -> u64 {
    DEFAULT_SHOTS
}

fn default_true() -> bool {
    true
}

/// VQA configuration
/// Gantree: VqaConfig // 실행 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqaConfig {
    // ========================================================================
    // Problem
    // ========================================================================
    /// Distribution to reproduce; its length fixes the qubit count
    pub target: Distribution,

    // ========================================================================
    // Ansatz
    // ========================================================================
    /// Single-qubit gate family
    #[serde(default)]
    pub gate_family: GateFamily,

    /// Coupling pattern
    #[serde(default)]
    pub entanglement: Entanglement,

    /// Number of layers
    #[serde(default = "default_layers")]
    pub layers: usize,

    /// Whether the last layer carries its coupling block
    #[serde(default = "default_true")]
    pub final_entanglement: bool,

    // ========================================================================
    // Evaluation
    // ========================================================================
    /// Shots per circuit execution
    #[serde(default = "default_shots")]
    pub shots: u64,

    /// Cost between target and output
    #[serde(default)]
    pub cost: CostFunction,

    /// Sampled or exact objective
    #[serde(default)]
    pub evaluation: EvaluationMode,

    /// Classical optimizer
    #[serde(default)]
    pub optimizer: OptimizerChoice,

    /// Simulator noise
    #[serde(default)]
    pub noise: NoiseModel,

    // ========================================================================
    // Execution
    // ========================================================================
    /// Random seed for initial parameters, sampling and SPSA
    #[serde(default)]
    pub seed: Option<u64>,
}

impl VqaConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Defaults: U3, 4 layers, linear coupling, 1024 shots, Manhattan cost,
    /// sampled objective, COBYLA, ideal simulator
    pub fn new(target: Distribution) -> Self {
        Self {
            target,
            gate_family: GateFamily::default(),
            entanglement: Entanglement::default(),
            layers: DEFAULT_LAYERS,
            final_entanglement: true,
            shots: DEFAULT_SHOTS,
            cost: CostFunction::default(),
            evaluation: EvaluationMode::default(),
            optimizer: OptimizerChoice::default(),
            noise: NoiseModel::ideal(),
            seed: None,
        }
    }

    /// Create quick configuration (fewer layers and iterations)
    pub fn quick(target: Distribution) -> Self {
        Self {
            layers: 2,
            shots: 512,
            optimizer: Cobyla::new().with_max_iter(100).into(),
            ..Self::new(target)
        }
    }

    /// Create exact configuration (no shot noise)
    pub fn exact(target: Distribution) -> Self {
        Self {
            evaluation: EvaluationMode::Exact,
            ..Self::new(target)
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set gate family
    pub fn with_gate_family(mut self, family: GateFamily) -> Self {
        self.gate_family = family;
        self
    }

    /// Set entanglement
    pub fn with_entanglement(mut self, entanglement: Entanglement) -> Self {
        self.entanglement = entanglement;
        self
    }

    /// Set layers
    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    /// Keep or drop the coupling block after the last layer
    pub fn with_final_entanglement(mut self, enabled: bool) -> Self {
        self.final_entanglement = enabled;
        self
    }

    /// Set shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set cost function
    pub fn with_cost(mut self, cost: CostFunction) -> Self {
        self.cost = cost;
        self
    }

    /// Set evaluation mode
    pub fn with_evaluation(mut self, evaluation: EvaluationMode) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Set optimizer
    pub fn with_optimizer(mut self, optimizer: impl Into<OptimizerChoice>) -> Self {
        self.optimizer = optimizer.into();
        self
    }

    /// Set noise model
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Qubit count implied by the target length
    pub fn num_qubits(&self) -> usize {
        self.target.num_qubits()
    }

    /// Ansatz shape described by this configuration
    pub fn ansatz_spec(&self) -> HeaResult<AnsatzSpec> {
        Ok(AnsatzSpec::new(
            self.num_qubits(),
            self.entanglement,
            self.gate_family,
            self.layers,
        )?
        .with_final_entanglement(self.final_entanglement))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> HeaResult<()> {
        if self.num_qubits() > MAX_QUBITS {
            return Err(HeaError::InvalidAnsatz(format!(
                "target needs {} qubits, at most {} supported",
                self.num_qubits(),
                MAX_QUBITS
            )));
        }

        if !(MIN_SHOTS..=MAX_SHOTS).contains(&self.shots) {
            return Err(HeaError::ShotsOutOfRange(self.shots, MIN_SHOTS, MAX_SHOTS));
        }

        self.ansatz_spec()?;
        self.noise.validate()?;
        self.optimizer.validate()?;

        if self.evaluation == EvaluationMode::Exact && !self.noise.is_ideal() {
            return Err(HeaError::ConfigError(
                "exact evaluation cannot apply a noise model".into(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Parse configuration from JSON text
    pub fn from_json_str(json: &str) -> HeaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> HeaResult<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> HeaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write configuration to a JSON file
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> HeaResult<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

impl fmt::Display for VqaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VqaConfig({}Q, {}, {}, L={}, shots={}, cost={}, {})",
            self.num_qubits(),
            self.gate_family,
            self.entanglement,
            self.layers,
            self.shots,
            self.cost.name(),
            self.optimizer
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Spsa;

    fn bell_target() -> Distribution {
        Distribution::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = VqaConfig::new(bell_target());

        assert_eq!(config.num_qubits(), 2);
        assert_eq!(config.gate_family, GateFamily::UnitaryThree);
        assert_eq!(config.entanglement, Entanglement::Linear);
        assert_eq!(config.layers, 4);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.cost, CostFunction::Manhattan);
        assert_eq!(config.evaluation, EvaluationMode::Sampled);
        assert!(matches!(config.optimizer, OptimizerChoice::Cobyla(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quick_and_exact() {
        let quick = VqaConfig::quick(bell_target());
        assert_eq!(quick.layers, 2);
        assert_eq!(quick.optimizer.max_iter(), 100);

        let exact = VqaConfig::exact(bell_target());
        assert_eq!(exact.evaluation, EvaluationMode::Exact);
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_ansatz_spec() {
        let config = VqaConfig::new(bell_target())
            .with_gate_family(GateFamily::RotationPair)
            .with_entanglement(Entanglement::Full)
            .with_layers(3)
            .with_final_entanglement(false);

        let spec = config.ansatz_spec().unwrap();
        assert_eq!(spec.num_parameters(), 2 * 2 * 3);
        assert!(!spec.final_entanglement());
    }

    #[test]
    fn test_validation() {
        let target = bell_target();

        assert!(matches!(
            VqaConfig::new(target.clone()).with_shots(0).validate(),
            Err(HeaError::ShotsOutOfRange(0, _, _))
        ));
        assert!(matches!(
            VqaConfig::new(target.clone()).with_layers(0).validate(),
            Err(HeaError::InvalidAnsatz(_))
        ));
        assert!(VqaConfig::exact(target.clone())
            .with_noise(NoiseModel::ibm_typical())
            .validate()
            .is_err());
        assert!(VqaConfig::new(target)
            .with_noise(NoiseModel::ideal().with_gate_error_2q(1.5))
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = VqaConfig::new(bell_target())
            .with_cost(CostFunction::KullbackLeibler)
            .with_optimizer(Spsa::new().with_max_iter(50))
            .with_noise(NoiseModel::from_depol(0.01).unwrap())
            .with_seed(9);

        let json = config.to_json_string().unwrap();
        let back = VqaConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let config = VqaConfig::from_json_str(
            r#"{
                "target": [0.25, 0.25, 0.5, 0.0],
                "gate_family": "rotation_pair",
                "entanglement": "full",
                "optimizer": { "method": "cobyla", "max_iter": 200 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.gate_family, GateFamily::RotationPair);
        assert_eq!(config.entanglement, Entanglement::Full);
        assert_eq!(config.layers, DEFAULT_LAYERS);
        assert_eq!(config.shots, DEFAULT_SHOTS);
        assert_eq!(config.optimizer.max_iter(), 200);
        assert!(config.final_entanglement);
        assert!(config.noise.is_ideal());
    }

    #[test]
    fn test_json_rejects_invalid_target() {
        let result = VqaConfig::from_json_str(r#"{ "target": [0.5, 0.2, 0.2] }"#);
        assert!(matches!(result, Err(HeaError::JsonError(_))));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("hea_config_{}.json", std::process::id()));
        let config = VqaConfig::quick(bell_target()).with_seed(1);

        config.to_json_file(&path).unwrap();
        let loaded = VqaConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
        assert!(matches!(
            VqaConfig::from_json_file(path.with_extension("missing")),
            Err(HeaError::FileError(_))
        ));
    }
}
