//! Probability distributions over computational basis states
//!
//! Gantree: L1_Circuit → Distribution
//!
//! Entry `i` is the probability of basis state `i`, whose bitstring is
//! `Bitstring::from_index(i, N)` (qubit 0 rightmost).

use crate::constants::ansatz::MAX_QUBITS;
use crate::constants::distribution::SUM_TOLERANCE;
use crate::error::{HeaError, HeaResult};
use crate::types::{Bitstring, Counts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated probability vector of length 2^N
/// Gantree: Distribution // 확률 분포
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Distribution {
    probs: Vec<f64>,
    num_qubits: usize,
}

impl Distribution {
    /// Validate and wrap a probability vector
    /// Gantree: new(Vec<f64>) -> Result<Self> // 생성+검증
    pub fn new(probs: Vec<f64>) -> HeaResult<Self> {
        let len = probs.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(HeaError::InvalidDistribution(format!(
                "length {} is not 2^N with N >= 1",
                len
            )));
        }

        if let Some(&p) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(HeaError::InvalidDistribution(format!(
                "entry {} is not a non-negative number",
                p
            )));
        }

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(HeaError::InvalidDistribution(format!(
                "entries sum to {}, expected 1",
                sum
            )));
        }

        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            probs,
        })
    }

    /// Number of basis states for `num_qubits` qubits, 2^N
    ///
    /// Errors when `num_qubits` exceeds [`MAX_QUBITS`].
    pub fn state_count(num_qubits: usize) -> HeaResult<usize> {
        if num_qubits > MAX_QUBITS {
            return Err(HeaError::InvalidDistribution(format!(
                "{} qubits exceeds maximum of {}",
                num_qubits, MAX_QUBITS
            )));
        }
        Ok(1 << num_qubits)
    }

    /// Uniform distribution over `num_qubits` qubits
    pub fn uniform(num_qubits: usize) -> HeaResult<Self> {
        let len = Self::state_count(num_qubits)?;
        Self::new(vec![1.0 / len as f64; len])
    }

    /// Normalise measurement counts into a distribution over all 2^N states
    ///
    /// States never observed get probability 0.
    /// Gantree: from_counts(&Counts, n) -> Result<Self> // 카운트→분포
    pub fn from_counts(counts: &Counts, num_qubits: usize) -> HeaResult<Self> {
        let len = Self::state_count(num_qubits)?;

        let mut tallies = vec![0u64; len];
        for (bits, &count) in counts {
            let bs = Bitstring::parse(bits)?;
            if bs.len() != num_qubits {
                return Err(HeaError::InvalidBitstring(bits.clone()));
            }
            let index = bs
                .to_usize()
                .ok_or_else(|| HeaError::InvalidBitstring(bits.clone()))?;
            tallies[index] += count;
        }

        let total: u64 = tallies.iter().sum();
        if total == 0 {
            return Err(HeaError::InvalidDistribution("no counts recorded".into()));
        }

        Self::new(
            tallies
                .into_iter()
                .map(|c| c as f64 / total as f64)
                .collect(),
        )
    }

    /// Number of qubits N
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states, 2^N
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Probability of basis state `index`
    pub fn get(&self, index: usize) -> Option<f64> {
        self.probs.get(index).copied()
    }

    /// Probability of the state written as `bitstring`
    pub fn probability_of(&self, bitstring: &str) -> HeaResult<f64> {
        let bs = Bitstring::parse(bitstring)?;
        if bs.len() != self.num_qubits {
            return Err(HeaError::InvalidBitstring(bitstring.to_string()));
        }
        bs.to_usize()
            .and_then(|i| self.probs.get(i).copied())
            .ok_or_else(|| HeaError::InvalidBitstring(bitstring.to_string()))
    }

    /// Probabilities ordered by basis-state index
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// (bitstring, probability) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (Bitstring, f64)> + '_ {
        let n = self.num_qubits;
        self.probs
            .iter()
            .enumerate()
            .map(move |(i, &p)| (Bitstring::from_index(i, n), p))
    }

    /// Index and probability of the most likely state
    pub fn mode(&self) -> (usize, f64) {
        self.probs
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| {
                if p > best.1 {
                    (i, p)
                } else {
                    best
                }
            })
    }
}

impl TryFrom<Vec<f64>> for Distribution {
    type Error = HeaError;

    fn try_from(probs: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(probs)
    }
}

impl From<Distribution> for Vec<f64> {
    fn from(d: Distribution) -> Self {
        d.probs
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.probs.iter().map(|p| format!("{:.4}", p)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
