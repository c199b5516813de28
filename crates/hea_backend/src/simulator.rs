//! Simulator backend for HEA
//!
//! Gantree: L3_Backend → SimulatorBackend
//!
//! Dense state-vector simulator. With an ideal noise model the circuit is
//! evolved once and shots are sampled from |ψ|²; otherwise every shot runs
//! its own trajectory with random Pauli errors and readout flips.

use crate::execution::{Backend, ExecutionMetadata, ExecutionResult};
use hea_core::constants::ansatz::MAX_QUBITS;
use hea_core::constants::execution::{MAX_SHOTS, MIN_SHOTS};
use hea_core::{Circuit, Counts, Distribution, Gate, HeaError, HeaResult};
use hea_noise::NoiseModel;
use num_complex::Complex64;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::time::Instant;

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Simulator backend with noise model
/// Gantree: SimulatorBackend // 시뮬레이터 구현
pub struct SimulatorBackend {
    /// Backend name
    name: String,

    /// Number of qubits
    num_qubits: usize,

    /// Noise model
    noise_model: NoiseModel,

    /// Random seed
    seed: Option<u64>,
}

impl SimulatorBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new simulator backend
    pub fn new(num_qubits: usize, noise_model: NoiseModel) -> Self {
        Self {
            name: "hea_simulator".to_string(),
            num_qubits,
            noise_model,
            seed: None,
        }
    }

    /// Create ideal (noiseless) simulator
    pub fn ideal(num_qubits: usize) -> Self {
        Self::new(num_qubits, NoiseModel::ideal())
    }

    /// Create from depolarizing error rate
    pub fn from_depol(num_qubits: usize, p_depol: f64) -> HeaResult<Self> {
        let noise_model = NoiseModel::from_depol(p_depol)?;
        Ok(Self::new(num_qubits, noise_model))
    }

    /// Set seed for reproducibility
    ///
    /// Every `execute` call restarts from this seed, so equal circuits
    /// give equal counts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set backend name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Noise model in use
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn check_circuit(&self, circuit: &Circuit) -> HeaResult<()> {
        let n = circuit.num_qubits();
        if n == 0 {
            return Err(HeaError::BackendError("circuit has no qubits".into()));
        }
        let limit = self.num_qubits.min(MAX_QUBITS);
        if n > limit {
            return Err(HeaError::QubitOutOfRange {
                qubit: n - 1,
                max: limit.saturating_sub(1),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Evolve |0…0⟩ through the circuit without noise
    fn evolve_ideal(&self, circuit: &Circuit) -> StateVector {
        let mut state = StateVector::zero(circuit.num_qubits());
        for gate in circuit.gates() {
            state.apply(gate);
        }
        state
    }

    /// Sample all shots from one ideal evolution
    fn sample_ideal(&self, circuit: &Circuit, shots: u64, rng: &mut StdRng) -> Counts {
        let n = circuit.num_qubits();
        let sampler = Sampler::new(&self.evolve_ideal(circuit).probabilities());

        let mut tallies: HashMap<usize, u64> = HashMap::new();
        for _ in 0..shots {
            *tallies.entry(sampler.sample(rng)).or_insert(0) += 1;
        }

        tallies
            .into_iter()
            .map(|(idx, c)| (format!("{:0width$b}", idx, width = n), c))
            .collect()
    }

    /// One noisy trajectory per shot
    fn sample_noisy(&self, circuit: &Circuit, shots: u64, rng: &mut StdRng) -> Counts {
        let n = circuit.num_qubits();
        let mut counts: Counts = HashMap::new();

        for _ in 0..shots {
            let mut state = StateVector::zero(n);
            for gate in circuit.gates() {
                state.apply(gate);
                self.inject_error(&mut state, gate, rng);
            }

            let mut outcome = Sampler::new(&state.probabilities()).sample(rng);
            outcome = self.flip_readout(outcome, n, rng);

            *counts
                .entry(format!("{:0width$b}", outcome, width = n))
                .or_insert(0) += 1;
        }

        counts
    }

    /// Random Pauli error after a gate, at the gate's error rate
    fn inject_error(&self, state: &mut StateVector, gate: &Gate, rng: &mut StdRng) {
        let rate = if gate.is_two_qubit() {
            self.noise_model.gate_error_2q()
        } else if gate.is_single_qubit() {
            self.noise_model.gate_error_1q()
        } else {
            0.0
        };

        if rate <= 0.0 || rng.gen::<f64>() >= rate {
            return;
        }

        let qubits = gate.qubits();
        // non-identity Pauli string over the gate's qubits
        let choices = 4usize.pow(qubits.len() as u32);
        let mut code = rng.gen_range(1..choices);
        for q in qubits {
            match code % 4 {
                1 => state.apply_single(q, &pauli_x()),
                2 => state.apply_single(q, &pauli_y()),
                3 => state.apply_single(q, &pauli_z()),
                _ => {}
            }
            code /= 4;
        }
    }

    fn flip_readout(&self, outcome: usize, n: usize, rng: &mut StdRng) -> usize {
        let p = self.noise_model.readout_error();
        if p <= 0.0 {
            return outcome;
        }
        (0..n).fold(outcome, |acc, bit| {
            if rng.gen::<f64>() < p {
                acc ^ (1 << bit)
            } else {
                acc
            }
        })
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn execute(&self, circuit: &Circuit, shots: u64) -> HeaResult<ExecutionResult> {
        self.check_circuit(circuit)?;
        if !(MIN_SHOTS..=self.max_shots()).contains(&shots) {
            return Err(HeaError::ShotsOutOfRange(shots, MIN_SHOTS, self.max_shots()));
        }

        let started = Instant::now();
        let mut rng = self.rng();

        let counts = if self.noise_model.is_ideal() {
            self.sample_ideal(circuit, shots, &mut rng)
        } else {
            self.sample_noisy(circuit, shots, &mut rng)
        };

        Ok(ExecutionResult {
            counts,
            shots,
            metadata: ExecutionMetadata {
                backend: self.name.clone(),
                execution_time_ms: Some(started.elapsed().as_millis() as u64),
                simulated: true,
                seed: self.seed,
                ..Default::default()
            },
        })
    }

    fn probabilities(&self, circuit: &Circuit) -> HeaResult<Distribution> {
        self.check_circuit(circuit)?;
        let mut probs = self.evolve_ideal(circuit).probabilities();
        let total: f64 = probs.iter().sum();
        probs.iter_mut().for_each(|p| *p /= total);
        Distribution::new(probs)
    }

    fn is_simulator(&self) -> bool {
        true
    }

    fn max_shots(&self) -> u64 {
        MAX_SHOTS
    }
}

// ============================================================================
// State Vector
// ============================================================================

/// Amplitudes over 2^n basis states; bit q of the index is qubit q
struct StateVector {
    amps: Vec<Complex64>,
}

impl StateVector {
    fn zero(n: usize) -> Self {
        let mut amps = vec![ZERO; 1 << n];
        amps[0] = ONE;
        Self { amps }
    }

    fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    fn apply(&mut self, gate: &Gate) {
        match gate {
            Gate::H(q) => self.apply_single(*q, &hadamard()),
            Gate::X(q) => self.apply_single(*q, &pauli_x()),
            Gate::Y(q) => self.apply_single(*q, &pauli_y()),
            Gate::Z(q) => self.apply_single(*q, &pauli_z()),
            Gate::S(q) => self.apply_single(*q, &phase(I)),
            Gate::Sdg(q) => self.apply_single(*q, &phase(-I)),
            Gate::Rx(q, theta) => self.apply_single(*q, &rx(*theta)),
            Gate::Ry(q, theta) => self.apply_single(*q, &ry(*theta)),
            Gate::Rz(q, theta) => self.apply_single(*q, &rz(*theta)),
            Gate::U(q, theta, phi, lambda) => self.apply_single(*q, &u3(*theta, *phi, *lambda)),
            Gate::Cnot(c, t) => self.apply_cnot(*c, *t),
            Gate::Cz(a, b) => self.apply_cz(*a, *b),
            Gate::Swap(a, b) => self.apply_swap(*a, *b),
            // every qubit is read out after the last gate
            Gate::Measure(_) | Gate::MeasureAll | Gate::Barrier(_) => {}
        }
    }

    fn apply_single(&mut self, q: usize, m: &Matrix2) {
        let mask = 1 << q;
        for i in 0..self.amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amps[i], self.amps[j]);
                self.amps[i] = m[0][0] * a + m[0][1] * b;
                self.amps[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_cnot(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1 << control, 1 << target);
        for i in 0..self.amps.len() {
            if i & cm != 0 && i & tm == 0 {
                self.amps.swap(i, i | tm);
            }
        }
    }

    fn apply_cz(&mut self, a: usize, b: usize) {
        let mask = (1 << a) | (1 << b);
        for (i, amp) in self.amps.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        let (ma, mb) = (1 << a, 1 << b);
        for i in 0..self.amps.len() {
            if i & ma != 0 && i & mb == 0 {
                self.amps.swap(i, i ^ ma ^ mb);
            }
        }
    }
}

// ============================================================================
// Gate Matrices
// ============================================================================

fn hadamard() -> Matrix2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Matrix2 {
    [[ZERO, -I], [I, ZERO]]
}

fn pauli_z() -> Matrix2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

fn phase(p: Complex64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, p]]
}

fn rx(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::new(c, 0.0);
    let ms = Complex64::new(0.0, -s);
    [[c, ms], [ms, c]]
}

fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// U(θ, φ, λ) in the OpenQASM convention
fn u3(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
        ],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

// ============================================================================
// Sampling
// ============================================================================

/// Inverse-CDF sampler over basis-state indices
struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    fn new(probs: &[f64]) -> Self {
        let cumulative = probs
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.gen::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len().saturating_sub(1))
    }
}

// ============================================================================
// Tests
// ============================================================================
