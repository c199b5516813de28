//! Noise model for HEA
//!
//! Gantree: L2_Noise → NoiseModel
//!
//! Gate, readout and decoherence parameters used by the simulator
//! to run noisy trajectories of an ansatz circuit.

use hea_core::circuit::Circuit;
use hea_core::constants::execution::{
    ABSOLUTE_MAX_NOISE, READOUT_ERROR_RATIO, TWO_QUBIT_ERROR_RATIO,
};
use hea_core::error::{HeaError, HeaResult};
use hea_core::types::Probability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Noise model for a simulated device
///
/// `None` for T1/T2 means no decoherence (ideal qubits).
/// Gantree: NoiseModel // 통합 노이즈
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// T1 relaxation time in microseconds
    /// Gantree: t1_us: Option<f64> // T1 (μs)
    t1_us: Option<f64>,

    /// T2 dephasing time in microseconds
    /// Gantree: t2_us: Option<f64> // T2 (μs)
    t2_us: Option<f64>,

    /// Single-qubit gate error rate
    /// Gantree: gate_error_1q: f64 // 1Q 에러
    gate_error_1q: f64,

    /// Two-qubit gate error rate
    /// Gantree: gate_error_2q: f64 // 2Q 에러
    gate_error_2q: f64,

    /// Readout bit-flip probability
    /// Gantree: readout_error: f64 // 측정 에러
    readout_error: f64,
}

impl NoiseModel {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new noise model with validation
    /// Gantree: new(t1,t2,e1,e2,ro) -> Result<Self> // 생성+검증
    pub fn new(
        t1_us: f64,
        t2_us: f64,
        gate_error_1q: f64,
        gate_error_2q: f64,
        readout_error: f64,
    ) -> HeaResult<Self> {
        let model = Self {
            t1_us: Some(t1_us),
            t2_us: Some(t2_us),
            gate_error_1q,
            gate_error_2q,
            readout_error,
        };
        model.validate()?;
        Ok(model)
    }

    /// Create ideal (noiseless) model
    /// Gantree: ideal() -> Self // 이상적
    pub fn ideal() -> Self {
        Self {
            t1_us: None,
            t2_us: None,
            gate_error_1q: 0.0,
            gate_error_2q: 0.0,
            readout_error: 0.0,
        }
    }

    /// Typical superconducting transmon device
    /// Gantree: ibm_typical() -> Self // IBM 전형
    pub fn ibm_typical() -> Self {
        Self {
            t1_us: Some(100.0),
            t2_us: Some(60.0),
            gate_error_1q: 0.0003,
            gate_error_2q: 0.01,
            readout_error: 0.01,
        }
    }

    /// Create from a single depolarizing rate
    ///
    /// 1Q error = p, 2Q error = 10p, readout = p/4.
    /// Gantree: from_depol(p) -> Result<Self> // depol 기반
    pub fn from_depol(p_depol: f64) -> HeaResult<Self> {
        if !(0.0..=ABSOLUTE_MAX_NOISE).contains(&p_depol) {
            return Err(HeaError::InvalidNoiseLevel(p_depol));
        }

        Ok(Self {
            t1_us: Some(100.0),
            t2_us: Some(60.0),
            gate_error_1q: p_depol,
            gate_error_2q: p_depol * TWO_QUBIT_ERROR_RATIO,
            readout_error: p_depol * READOUT_ERROR_RATIO,
        })
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set T1 time
    pub fn with_t1(mut self, t1_us: f64) -> Self {
        self.t1_us = Some(t1_us);
        self
    }

    /// Set T2 time
    pub fn with_t2(mut self, t2_us: f64) -> Self {
        self.t2_us = Some(t2_us);
        self
    }

    /// Set single-qubit gate error
    pub fn with_gate_error_1q(mut self, error: f64) -> Self {
        self.gate_error_1q = error;
        self
    }

    /// Set two-qubit gate error
    pub fn with_gate_error_2q(mut self, error: f64) -> Self {
        self.gate_error_2q = error;
        self
    }

    /// Set readout error
    pub fn with_readout_error(mut self, error: f64) -> Self {
        self.readout_error = error;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// T1 time in microseconds, if finite
    pub fn t1_us(&self) -> Option<f64> {
        self.t1_us
    }

    /// T2 time in microseconds, if finite
    pub fn t2_us(&self) -> Option<f64> {
        self.t2_us
    }

    /// Get single-qubit gate error rate
    pub fn gate_error_1q(&self) -> f64 {
        self.gate_error_1q
    }

    /// Get two-qubit gate error rate
    pub fn gate_error_2q(&self) -> f64 {
        self.gate_error_2q
    }

    /// Get readout error rate
    pub fn readout_error(&self) -> f64 {
        self.readout_error
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate noise model constraints
    /// Gantree: validate(&self) -> Result // T2<=2*T1
    pub fn validate(&self) -> HeaResult<()> {
        for t in [self.t1_us, self.t2_us].into_iter().flatten() {
            if t.is_nan() || t <= 0.0 {
                return Err(HeaError::ConfigError(format!(
                    "coherence time must be positive: {}",
                    t
                )));
            }
        }

        if let (Some(t1_us), Some(t2_us)) = (self.t1_us, self.t2_us) {
            if t2_us > 2.0 * t1_us {
                return Err(HeaError::InvalidT2 { t2_us, t1_us });
            }
        }

        for rate in [self.gate_error_1q, self.gate_error_2q, self.readout_error] {
            Probability::new(rate)?;
        }

        Ok(())
    }

    // ========================================================================
    // Derived Quantities
    // ========================================================================

    /// Effective depolarizing rate (the single-qubit gate error)
    /// Gantree: effective_depol(&self) -> f64 // 유효 depol
    pub fn effective_depol(&self) -> f64 {
        self.gate_error_1q
    }

    /// True when no gate or readout error is applied
    pub fn is_ideal(&self) -> bool {
        self.gate_error_1q == 0.0 && self.gate_error_2q == 0.0 && self.readout_error == 0.0
    }

    /// Probability that a circuit runs without any gate or readout error
    /// Gantree: estimate_circuit_fidelity(&Circuit) -> f64 // 회로 충실도
    pub fn estimate_circuit_fidelity(&self, circuit: &Circuit) -> f64 {
        let measured = if circuit.has_measurements() {
            circuit.num_qubits()
        } else {
            0
        };

        (1.0 - self.gate_error_1q).powi(circuit.count_1q() as i32)
            * (1.0 - self.gate_error_2q).powi(circuit.count_2q() as i32)
            * (1.0 - self.readout_error).powi(measured as i32)
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::ideal()
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ideal() {
            return write!(f, "NoiseModel(ideal)");
        }
        let t = |v: Option<f64>| v.map_or("inf".to_string(), |x| format!("{:.0}μs", x));
        write!(
            f,
            "NoiseModel(T1={}, T2={}, 1Q={:.4}, 2Q={:.4}, RO={:.4})",
            t(self.t1_us),
            t(self.t2_us),
            self.gate_error_1q,
            self.gate_error_2q,
            self.readout_error
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
