//! Core types for HEA
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Fundamental type aliases and validated wrapper types
//! used throughout the workspace.

use crate::error::{HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

/// Measurement counts: bitstring -> count
/// Gantree: Counts // pub type Counts = HashMap<String, u64>
pub type Counts = HashMap<String, u64>;

/// Parameter vector for variational circuits
/// Gantree: ParamVec // pub type ParamVec = Vec<f64>
pub type ParamVec = Vec<f64>;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> HeaResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(HeaError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = HeaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// Bitstring
// ============================================================================

/// Bitstring for measurement results
///
/// Characters are stored in display order: the leftmost character belongs
/// to the highest qubit, the rightmost to qubit 0.
/// Gantree: Bitstring // 비트열 타입
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    /// Create from a vector of bools (display order)
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create from string (e.g., "0110")
    /// Gantree: parse(s) -> Self // 파싱
    pub fn parse(s: &str) -> HeaResult<Self> {
        let bits: Result<Vec<bool>, _> = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(HeaError::InvalidBitstring(s.to_string())),
            })
            .collect();
        Ok(Self { bits: bits? })
    }

    /// Bitstring of width `n` for basis-state index `index`
    /// Gantree: from_index(i,n) -> Self // 인덱스→비트열
    pub fn from_index(index: usize, n: usize) -> Self {
        let bits = (0..n).rev().map(|q| (index >> q) & 1 == 1).collect();
        Self { bits }
    }

    /// Get the number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value of qubit `qubit` (qubit 0 is the rightmost character)
    pub fn qubit(&self, qubit: QubitId) -> Option<bool> {
        let len = self.bits.len();
        if qubit >= len {
            return None;
        }
        self.bits.get(len - 1 - qubit).copied()
    }

    /// Convert to basis-state index
    ///
    /// `None` when the bitstring is wider than `usize`.
    pub fn to_usize(&self) -> Option<usize> {
        if self.bits.len() > usize::BITS as usize {
            return None;
        }
        Some(
            self.bits
                .iter()
                .rev()
                .enumerate()
                .filter(|(_, &b)| b)
                .map(|(i, _)| 1 << i)
                .sum(),
        )
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Bitstring {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_valid() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(1.0).is_ok());
    }

    #[test]
    fn test_probability_invalid() {
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_display_and_default() {
        let p = Probability::new(0.25).unwrap();
        assert_eq!(p.to_string(), "0.250000");
        assert_eq!(Probability::default(), Probability::ZERO);
        assert_eq!(Probability::ONE.value(), 1.0);
    }

    #[test]
    fn test_bitstring_parse_display() {
        let bs = Bitstring::parse("01101").unwrap();
        assert_eq!(bs.len(), 5);
        assert_eq!(bs.to_string(), "01101");
        assert_eq!(bs.to_usize(), Some(13));
    }

    #[test]
    fn test_bitstring_invalid() {
        assert!(Bitstring::parse("01a1").is_err());
        assert!("0102".parse::<Bitstring>().is_err());
    }

    #[test]
    fn test_bitstring_from_index() {
        assert_eq!(Bitstring::from_index(2, 3).to_string(), "010");
        assert_eq!(Bitstring::from_index(5, 4).to_string(), "0101");
        assert_eq!(Bitstring::from_index(0, 2).to_string(), "00");
    }

    #[test]
    fn test_bitstring_index_roundtrip() {
        for i in 0..16 {
            assert_eq!(Bitstring::from_index(i, 4).to_usize(), Some(i));
        }
    }

    #[test]
    fn test_bitstring_wider_than_usize() {
        let bits = format!("1{}", "0".repeat(usize::BITS as usize));
        let bs = Bitstring::parse(&bits).unwrap();
        assert_eq!(bs.to_usize(), None);

        let widest = Bitstring::parse(&"1".repeat(usize::BITS as usize)).unwrap();
        assert_eq!(widest.to_usize(), Some(usize::MAX));
    }

    #[test]
    fn test_bitstring_qubit_order() {
        // "001" means qubit 0 is set
        let bs = Bitstring::parse("001").unwrap();
        assert_eq!(bs.qubit(0), Some(true));
        assert_eq!(bs.qubit(2), Some(false));
        assert_eq!(bs.qubit(3), None);
    }
}
