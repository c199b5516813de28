//! Cost functions between distributions
//!
//! Gantree: L4_Engine → CostFunction
//!
//! Distance between the target distribution and the distribution
//! measured from the ansatz. Lower is better; zero is a perfect fit.

use hea_core::constants::distribution::KL_EPSILON;
use hea_core::{Distribution, HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance used as the variational objective
/// Gantree: CostFunction // 비용 함수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Σ |pᵢ − qᵢ|
    #[default]
    Manhattan,
    /// Σ (pᵢ − qᵢ)²
    Euclidean,
    /// KL(target ‖ output) = Σ pᵢ ln(pᵢ / max(qᵢ, ε))
    KullbackLeibler,
}

impl CostFunction {
    /// Cost between two distributions over the same register
    /// Gantree: evaluate(target, output) -> Result<f64> // 비용 계산
    pub fn evaluate(&self, target: &Distribution, output: &Distribution) -> HeaResult<f64> {
        self.evaluate_slices(target.as_slice(), output.as_slice())
    }

    /// Cost between raw probability slices
    pub fn evaluate_slices(&self, target: &[f64], output: &[f64]) -> HeaResult<f64> {
        if target.len() != output.len() {
            return Err(HeaError::DistributionMismatch {
                expected: target.len(),
                actual: output.len(),
            });
        }

        let pairs = target.iter().zip(output);
        let cost = match self {
            CostFunction::Manhattan => pairs.map(|(p, q)| (p - q).abs()).sum(),
            CostFunction::Euclidean => pairs.map(|(p, q)| (p - q).powi(2)).sum(),
            CostFunction::KullbackLeibler => pairs
                .filter(|(p, _)| **p > 0.0)
                .map(|(p, q)| p * (p / q.max(KL_EPSILON)).ln())
                .sum(),
        };

        Ok(cost)
    }

    /// Short name
    pub fn name(&self) -> &'static str {
        match self {
            CostFunction::Manhattan => "manhattan",
            CostFunction::Euclidean => "euclidean",
            CostFunction::KullbackLeibler => "kl",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manhattan" | "l1" => Some(CostFunction::Manhattan),
            "euclidean" | "l2" => Some(CostFunction::Euclidean),
            "kl" | "kullback_leibler" => Some(CostFunction::KullbackLeibler),
            _ => None,
        }
    }
}

impl FromStr for CostFunction {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HeaError::UnknownOption {
            kind: "cost function",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostFunction::Manhattan => write!(f, "Manhattan distance"),
            CostFunction::Euclidean => write!(f, "Squared Euclidean distance"),
            CostFunction::KullbackLeibler => write!(f, "KL divergence"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dist(p: &[f64]) -> Distribution {
        Distribution::new(p.to_vec()).unwrap()
    }

    #[test]
    fn test_manhattan() {
        let target = dist(&[0.5, 0.0, 0.0, 0.5]);
        let output = dist(&[0.25, 0.25, 0.25, 0.25]);

        let cost = CostFunction::Manhattan.evaluate(&target, &output).unwrap();
        assert_relative_eq!(cost, 1.0);
    }

    #[test]
    fn test_identical_distributions_cost_zero() {
        let d = dist(&[0.1, 0.2, 0.3, 0.4]);
        for cost in [
            CostFunction::Manhattan,
            CostFunction::Euclidean,
            CostFunction::KullbackLeibler,
        ] {
            assert_relative_eq!(cost.evaluate(&d, &d).unwrap(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_euclidean_is_squared() {
        let target = dist(&[1.0, 0.0]);
        let output = dist(&[0.5, 0.5]);

        let cost = CostFunction::Euclidean.evaluate(&target, &output).unwrap();
        assert_relative_eq!(cost, 0.5);
    }

    #[test]
    fn test_kl_skips_zero_target_and_floors_output() {
        let target = dist(&[0.5, 0.5, 0.0, 0.0]);
        let output = dist(&[0.5, 0.0, 0.25, 0.25]);

        let cost = CostFunction::KullbackLeibler.evaluate(&target, &output).unwrap();
        assert!(cost.is_finite());
        assert_relative_eq!(cost, 0.5 * (0.5 / KL_EPSILON).ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        let result = CostFunction::Manhattan.evaluate_slices(&[0.5, 0.5], &[0.25; 4]);
        assert_eq!(
            result,
            Err(HeaError::DistributionMismatch {
                expected: 2,
                actual: 4
            })
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("Manhattan".parse::<CostFunction>().unwrap(), CostFunction::Manhattan);
        assert_eq!(CostFunction::parse("l2"), Some(CostFunction::Euclidean));
        assert_eq!(CostFunction::parse("kl"), Some(CostFunction::KullbackLeibler));
        assert!("hamming".parse::<CostFunction>().is_err());
        assert_eq!(CostFunction::default(), CostFunction::Manhattan);
    }
}
