//! Classical optimizers for the variational loop
//!
//! Gantree: L4_Engine → Optimizer
//!
//! Derivative-free minimizers over the ansatz parameters. Objectives are
//! fallible: an error from the objective aborts the run and is returned.

use crate::convergence::Convergence;
use hea_core::constants::optimizer::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_RHO_BEGIN, DEFAULT_RHO_END, DEFAULT_TOLERANCE, SPSA_A,
    SPSA_ALPHA, SPSA_C, SPSA_GAMMA,
};
use hea_core::{HeaError, HeaResult};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallible objective over a parameter vector
pub type Objective<'a> = dyn FnMut(&[f64]) -> HeaResult<f64> + 'a;

// ============================================================================
// Outcome
// ============================================================================

/// Result of an optimization run
/// Gantree: OptimizerOutcome // 최적화 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOutcome {
    /// Best parameters found
    pub params: Vec<f64>,

    /// Objective value at `params`
    pub value: f64,

    /// Number of objective evaluations
    pub evaluations: usize,

    /// Number of iterations
    pub iterations: usize,

    /// Best value after each iteration, starting with the initial point
    pub history: Vec<f64>,

    /// Whether the stopping criterion was met before the iteration limit
    pub converged: bool,
}

impl OptimizerOutcome {
    /// Objective value at the initial point
    pub fn initial_value(&self) -> f64 {
        self.history.first().copied().unwrap_or(self.value)
    }

    /// Decrease of the objective over the run
    pub fn improvement(&self) -> f64 {
        self.initial_value() - self.value
    }
}

/// Classical optimizer interface
/// Gantree: Optimizer // 최적화기 trait
pub trait Optimizer {
    /// Optimizer name
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from `initial`
    /// Gantree: minimize(objective, initial) -> Result<OptimizerOutcome>
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: &[f64],
    ) -> HeaResult<OptimizerOutcome>;
}

// ============================================================================
// Evaluation Bookkeeping
// ============================================================================

/// Counts evaluations and keeps the best point seen
struct Tracker<'o, 'a> {
    objective: &'o mut Objective<'a>,
    evaluations: usize,
    best_params: Vec<f64>,
    best_value: f64,
    history: Vec<f64>,
}

impl<'o, 'a> Tracker<'o, 'a> {
    fn start(objective: &'o mut Objective<'a>, initial: &[f64]) -> HeaResult<Self> {
        if initial.is_empty() {
            return Err(HeaError::ConfigError(
                "cannot optimize an empty parameter vector".into(),
            ));
        }

        let mut tracker = Self {
            objective,
            evaluations: 0,
            best_params: initial.to_vec(),
            best_value: f64::INFINITY,
            history: Vec::new(),
        };
        tracker.eval(initial)?;
        tracker.history.push(tracker.best_value);
        Ok(tracker)
    }

    fn eval(&mut self, params: &[f64]) -> HeaResult<f64> {
        let value = (self.objective)(params)?;
        if !value.is_finite() {
            return Err(HeaError::NonFiniteCost(value));
        }

        self.evaluations += 1;
        if value < self.best_value {
            self.best_value = value;
            self.best_params = params.to_vec();
        }
        Ok(value)
    }

    fn end_iteration(&mut self) {
        self.history.push(self.best_value);
    }

    fn finish(self, iterations: usize, converged: bool) -> OptimizerOutcome {
        OptimizerOutcome {
            params: self.best_params,
            value: self.best_value,
            evaluations: self.evaluations,
            iterations,
            history: self.history,
            converged,
        }
    }
}

// ============================================================================
// COBYLA
// ============================================================================

/// Trust-region-bounded simplex search
///
/// Simplified COBYLA: a simplex of n+1 points whose moves are capped by
/// the trust radius ρ. When the simplex values flatten out below `tol`,
/// ρ is halved and the simplex is rebuilt around the best point; the run
/// converges once that happens at `rho_end`.
/// Gantree: Cobyla // COBYLA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cobyla {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Value spread below which the simplex counts as flat
    pub tol: f64,
    /// Initial trust region radius
    pub rho_begin: f64,
    /// Final trust region radius
    pub rho_end: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITERATIONS,
            tol: DEFAULT_TOLERANCE,
            rho_begin: DEFAULT_RHO_BEGIN,
            rho_end: DEFAULT_RHO_END,
        }
    }
}

impl Cobyla {
    /// Create with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region radii
    pub fn with_trust_region(mut self, rho_begin: f64, rho_end: f64) -> Self {
        self.rho_begin = rho_begin;
        self.rho_end = rho_end;
        self
    }

    /// Check settings
    pub fn validate(&self) -> HeaResult<()> {
        if !(self.rho_end > 0.0 && self.rho_begin >= self.rho_end) {
            return Err(HeaError::ConfigError(format!(
                "trust region must satisfy 0 < rho_end <= rho_begin, got {} and {}",
                self.rho_end, self.rho_begin
            )));
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(HeaError::ConfigError(format!("tolerance {} is negative", self.tol)));
        }
        Ok(())
    }
}

/// Simplex vertices with their objective values, kept sorted best first
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// n+1 vertices: `center` plus one step of `rho` along each axis
    fn around(
        center: &[f64],
        value: f64,
        rho: f64,
        tracker: &mut Tracker<'_, '_>,
    ) -> HeaResult<Self> {
        let mut points = vec![center.to_vec()];
        let mut values = vec![value];
        for i in 0..center.len() {
            let mut point = center.to_vec();
            point[i] += rho;
            values.push(tracker.eval(&point)?);
            points.push(point);
        }

        let mut simplex = Self { points, values };
        simplex.sort();
        Ok(simplex)
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        self.points = order.iter().map(|&i| self.points[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.points.len() - 1
    }

    fn spread(&self) -> f64 {
        self.values[self.worst()] - self.values[0]
    }

    /// Centroid of every vertex except the worst
    fn centroid(&self) -> Vec<f64> {
        let n = self.worst();
        let mut centroid = vec![0.0; self.points[0].len()];
        for point in &self.points[..n] {
            for (c, x) in centroid.iter_mut().zip(point) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= n as f64);
        centroid
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let worst = self.worst();
        self.points[worst] = point;
        self.values[worst] = value;
    }
}

/// `centroid + scale · (point − centroid)`
fn along(centroid: &[f64], point: &[f64], scale: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + scale * (p - c))
        .collect()
}

/// Cap each coordinate's distance from `centroid` at `rho`
fn clamp_step(centroid: &[f64], point: &mut [f64], rho: f64) {
    for (x, c) in point.iter_mut().zip(centroid) {
        let diff = *x - c;
        if diff.abs() > rho {
            *x = c + rho * diff.signum();
        }
    }
}

impl Optimizer for Cobyla {
    fn name(&self) -> &'static str {
        "COBYLA"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: &[f64],
    ) -> HeaResult<OptimizerOutcome> {
        self.validate()?;

        let mut tracker = Tracker::start(objective, initial)?;
        let mut rho = self.rho_begin;
        let start_value = tracker.best_value;
        let mut simplex = Simplex::around(initial, start_value, rho, &mut tracker)?;

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            if simplex.spread() < self.tol {
                if rho <= self.rho_end {
                    converged = true;
                    tracker.end_iteration();
                    break;
                }
                // flat at this radius: shrink and rebuild around the best vertex
                rho = (rho * 0.5).max(self.rho_end);
                let best = simplex.points[0].clone();
                simplex = Simplex::around(&best, simplex.values[0], rho, &mut tracker)?;
                tracker.end_iteration();
                continue;
            }

            let centroid = simplex.centroid();
            let worst = simplex.worst();

            let mut reflected = along(&centroid, &simplex.points[worst], -1.0);
            clamp_step(&centroid, &mut reflected, rho);
            let f_reflected = tracker.eval(&reflected)?;

            if f_reflected < simplex.values[0] {
                let mut expanded = along(&centroid, &reflected, 2.0);
                clamp_step(&centroid, &mut expanded, 2.0 * rho);
                let f_expanded = tracker.eval(&expanded)?;

                if f_expanded < f_reflected {
                    simplex.replace_worst(expanded, f_expanded);
                } else {
                    simplex.replace_worst(reflected, f_reflected);
                }
            } else if f_reflected < simplex.values[worst - 1] {
                simplex.replace_worst(reflected, f_reflected);
            } else {
                let contracted = along(&centroid, &simplex.points[worst], 0.5);
                let f_contracted = tracker.eval(&contracted)?;

                if f_contracted < simplex.values[worst] {
                    simplex.replace_worst(contracted, f_contracted);
                } else {
                    // shrink every vertex halfway towards the best
                    let best = simplex.points[0].clone();
                    for i in 1..simplex.points.len() {
                        let shrunk = along(&best, &simplex.points[i], 0.5);
                        simplex.values[i] = tracker.eval(&shrunk)?;
                        simplex.points[i] = shrunk;
                    }
                }
            }

            simplex.sort();
            tracker.end_iteration();

            debug!(
                "COBYLA iter {}: best={:.6}, spread={:.2e}, rho={:.2e}",
                iterations,
                tracker.best_value,
                simplex.spread(),
                rho
            );
        }

        Ok(tracker.finish(iterations, converged))
    }
}

// ============================================================================
// SPSA
// ============================================================================

/// Simultaneous perturbation stochastic approximation
///
/// Each iteration estimates the gradient from two evaluations at
/// x ± c_k·Δ with Δ a random ±1 vector, where
/// a_k = a / (k+1)^α and c_k = c / (k+1)^γ.
/// Gantree: Spsa // SPSA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spsa {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Step-size gain
    pub a: f64,
    /// Perturbation gain
    pub c: f64,
    /// Step-size decay exponent
    pub alpha: f64,
    /// Perturbation decay exponent
    pub gamma: f64,
    /// Seed for the perturbation directions
    pub seed: Option<u64>,
    /// Optional early stop on stalled best values
    pub early_stop: Option<Convergence>,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITERATIONS,
            a: SPSA_A,
            c: SPSA_C,
            alpha: SPSA_ALPHA,
            gamma: SPSA_GAMMA,
            seed: None,
            early_stop: None,
        }
    }
}

impl Spsa {
    /// Create with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set gains a and c
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stop early when best values stall
    pub fn with_early_stop(mut self, convergence: Convergence) -> Self {
        self.early_stop = Some(convergence);
        self
    }

    /// Check settings
    pub fn validate(&self) -> HeaResult<()> {
        if !(self.a > 0.0 && self.c > 0.0) {
            return Err(HeaError::ConfigError(format!(
                "SPSA gains must be positive, got a={} c={}",
                self.a, self.c
            )));
        }
        Ok(())
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Optimizer for Spsa {
    fn name(&self) -> &'static str {
        "SPSA"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: &[f64],
    ) -> HeaResult<OptimizerOutcome> {
        self.validate()?;

        let mut tracker = Tracker::start(objective, initial)?;
        let mut rng = self.rng();
        let mut early_stop = self.early_stop.clone();
        if let Some(conv) = early_stop.as_mut() {
            conv.reset();
            conv.observe(tracker.best_value);
        }

        let mut x = initial.to_vec();
        let mut iterations = 0;
        let mut converged = false;

        for k in 0..self.max_iter {
            iterations += 1;
            let step = (k + 1) as f64;
            let a_k = self.a / step.powf(self.alpha);
            let c_k = self.c / step.powf(self.gamma);

            let delta: Vec<f64> = (0..x.len())
                .map(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 })
                .collect();

            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

            let slope = (tracker.eval(&x_plus)? - tracker.eval(&x_minus)?) / (2.0 * c_k);
            // Δᵢ = ±1, so 1/Δᵢ = Δᵢ
            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi -= a_k * slope * di;
            }
            tracker.eval(&x)?;
            tracker.end_iteration();

            debug!(
                "SPSA iter {}: best={:.6}, a_k={:.4}, c_k={:.4}",
                iterations, tracker.best_value, a_k, c_k
            );

            if let Some(conv) = early_stop.as_mut() {
                if conv.observe(tracker.best_value) {
                    converged = true;
                    break;
                }
            }
        }

        Ok(tracker.finish(iterations, converged))
    }
}

// ============================================================================
// Optimizer Choice
// ============================================================================

/// Serializable selection of an optimizer and its settings
/// Gantree: OptimizerChoice // 최적화기 선택
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OptimizerChoice {
    /// COBYLA-style simplex search
    Cobyla(Cobyla),
    /// SPSA
    Spsa(Spsa),
}

impl OptimizerChoice {
    /// Give SPSA a seed when it has none of its own
    pub fn seeded(self, seed: Option<u64>) -> Self {
        match (self, seed) {
            (OptimizerChoice::Spsa(spsa), Some(seed)) if spsa.seed.is_none() => {
                OptimizerChoice::Spsa(spsa.with_seed(seed))
            }
            (choice, _) => choice,
        }
    }

    /// Check settings
    pub fn validate(&self) -> HeaResult<()> {
        match self {
            OptimizerChoice::Cobyla(o) => o.validate(),
            OptimizerChoice::Spsa(o) => o.validate(),
        }
    }

    /// Iteration limit
    pub fn max_iter(&self) -> usize {
        match self {
            OptimizerChoice::Cobyla(o) => o.max_iter,
            OptimizerChoice::Spsa(o) => o.max_iter,
        }
    }
}

impl Default for OptimizerChoice {
    fn default() -> Self {
        OptimizerChoice::Cobyla(Cobyla::default())
    }
}

impl From<Cobyla> for OptimizerChoice {
    fn from(o: Cobyla) -> Self {
        OptimizerChoice::Cobyla(o)
    }
}

impl From<Spsa> for OptimizerChoice {
    fn from(o: Spsa) -> Self {
        OptimizerChoice::Spsa(o)
    }
}

impl Optimizer for OptimizerChoice {
    fn name(&self) -> &'static str {
        match self {
            OptimizerChoice::Cobyla(o) => o.name(),
            OptimizerChoice::Spsa(o) => o.name(),
        }
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: &[f64],
    ) -> HeaResult<OptimizerOutcome> {
        match self {
            OptimizerChoice::Cobyla(o) => o.minimize(objective, initial),
            OptimizerChoice::Spsa(o) => o.minimize(objective, initial),
        }
    }
}

impl fmt::Display for OptimizerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(max_iter={})", self.name(), self.max_iter())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(p: &[f64]) -> HeaResult<f64> {
        Ok((p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2))
    }

    #[test]
    fn test_cobyla_quadratic() {
        let cobyla = Cobyla::new().with_max_iter(300).with_tol(1e-8);
        let outcome = cobyla.minimize(&mut quadratic, &[0.0, 0.0]).unwrap();

        assert!(outcome.value < 1e-3, "value = {}", outcome.value);
        assert!((outcome.params[0] - 1.0).abs() < 0.05);
        assert!((outcome.params[1] - 2.0).abs() < 0.05);
        assert!(outcome.evaluations > outcome.iterations);
    }

    #[test]
    fn test_cobyla_converges_on_flat_objective() {
        let mut flat = |_: &[f64]| -> HeaResult<f64> { Ok(0.25) };
        let outcome = Cobyla::new().minimize(&mut flat, &[0.1, 0.2, 0.3]).unwrap();

        assert!(outcome.converged);
        assert!(outcome.iterations < 20);
        assert_eq!(outcome.params, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_cobyla_history_is_monotone() {
        let outcome = Cobyla::new()
            .with_max_iter(50)
            .minimize(&mut quadratic, &[3.0, -1.0])
            .unwrap();

        assert_eq!(outcome.history.len(), outcome.iterations + 1);
        assert!(outcome.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(outcome.initial_value(), 13.0);
        assert!(outcome.improvement() > 0.0);
    }

    #[test]
    fn test_objective_error_propagates() {
        let mut calls = 0;
        let mut failing = |_: &[f64]| -> HeaResult<f64> {
            calls += 1;
            if calls > 3 {
                Err(HeaError::BackendError("device lost".into()))
            } else {
                Ok(1.0)
            }
        };

        let result = Cobyla::new().minimize(&mut failing, &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(result, Err(HeaError::BackendError("device lost".into())));
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let mut nan = |_: &[f64]| -> HeaResult<f64> { Ok(f64::NAN) };
        let result = Spsa::new().with_seed(1).minimize(&mut nan, &[0.0]);
        assert!(matches!(result, Err(HeaError::NonFiniteCost(_))));
    }

    #[test]
    fn test_empty_parameters_rejected() {
        let result = Cobyla::new().minimize(&mut quadratic, &[]);
        assert!(matches!(result, Err(HeaError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_trust_region() {
        let cobyla = Cobyla::new().with_trust_region(0.01, 0.1);
        assert!(cobyla.validate().is_err());
        assert!(cobyla.minimize(&mut quadratic, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_spsa_quadratic() {
        let spsa = Spsa::new().with_max_iter(300).with_gains(0.5, 0.1).with_seed(7);
        let outcome = spsa.minimize(&mut quadratic, &[0.0, 0.0]).unwrap();

        assert!(outcome.value < 0.1, "value = {}", outcome.value);
        assert_eq!(outcome.evaluations, 1 + 3 * 300);
        assert!(!outcome.converged);
    }

    #[test]
    fn test_spsa_seed_reproducible() {
        let spsa = Spsa::new().with_max_iter(20).with_seed(11);
        let a = spsa.minimize(&mut quadratic, &[0.5, 0.5]).unwrap();
        let b = spsa.minimize(&mut quadratic, &[0.5, 0.5]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spsa_early_stop() {
        let mut flat = |_: &[f64]| -> HeaResult<f64> { Ok(1.0) };
        let spsa = Spsa::new()
            .with_seed(3)
            .with_early_stop(Convergence::new(3, 1e-6));

        let outcome = spsa.minimize(&mut flat, &[0.0, 0.0]).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 3);
    }

    #[test]
    fn test_choice_seeding_and_serde() {
        let choice = OptimizerChoice::from(Spsa::new()).seeded(Some(5));
        assert!(matches!(&choice, OptimizerChoice::Spsa(s) if s.seed == Some(5)));

        let json = serde_json::to_string(&choice).unwrap();
        assert!(json.contains("\"method\":\"spsa\""));
        let back: OptimizerChoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, choice);

        let partial: OptimizerChoice =
            serde_json::from_str(r#"{"method":"cobyla","max_iter":42}"#).unwrap();
        assert_eq!(partial.max_iter(), 42);
        assert_eq!(partial.name(), "COBYLA");
    }
}
