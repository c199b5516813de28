//! Convergence tracking for iterative optimizers
//!
//! Gantree: L4_Engine → Convergence
//!
//! Sliding-window early stopping on best-value improvements.

use hea_core::constants::optimizer::{CONVERGENCE_WINDOW, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Convergence checker
/// Gantree: Convergence // 수렴 판단
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Window size for checking recent improvements
    /// Gantree: window: usize // 윈도우 크기
    pub window: usize,

    /// Improvements below this count as stalled
    /// Gantree: threshold: f64 // 임계
    pub threshold: f64,

    /// Recent improvements, newest last
    /// Gantree: history: VecDeque<f64> // 이력
    #[serde(skip)]
    history: VecDeque<f64>,

    /// Last best value seen by `observe`
    #[serde(skip)]
    last_best: Option<f64>,
}

impl Convergence {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new convergence checker
    /// Gantree: new(window,threshold) -> Self // 생성자
    pub fn new(window: usize, threshold: f64) -> Self {
        let window = window.max(1);
        Self {
            window,
            threshold,
            history: VecDeque::with_capacity(window),
            last_best: None,
        }
    }

    /// Scale the threshold to the shot noise of a sampled objective
    ///
    /// Sampled probabilities fluctuate by about 1/√shots, so smaller
    /// improvements are indistinguishable from noise.
    pub fn for_shots(shots: u64) -> Self {
        let noise_floor = 1.0 / (shots.max(1) as f64).sqrt();
        Self::new(CONVERGENCE_WINDOW, noise_floor.max(DEFAULT_TOLERANCE))
    }

    // ========================================================================
    // Convergence Check
    // ========================================================================

    /// Add improvement to history
    /// Gantree: push(&mut,improvement) // 이력 추가
    pub fn push(&mut self, improvement: f64) {
        self.history.push_back(improvement);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    /// Record a new best value and return whether the run has stalled
    /// Gantree: observe(&mut,best) -> bool // 최적값 관측
    pub fn observe(&mut self, best: f64) -> bool {
        if let Some(previous) = self.last_best {
            self.push(previous - best);
        }
        self.last_best = Some(best);
        self.check()
    }

    /// Check if converged: a full window of improvements all below threshold
    /// Gantree: check(&self) -> bool // 수렴 체크
    pub fn check(&self) -> bool {
        self.history.len() >= self.window
            && self.history.iter().all(|&imp| imp.abs() < self.threshold)
    }

    /// Reset convergence state
    /// Gantree: reset(&mut) // 초기화
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_best = None;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Sum of improvements currently in the window
    pub fn recent_improvement(&self) -> f64 {
        self.history.iter().sum()
    }

    /// Get history length
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for Convergence {
    fn default() -> Self {
        Self::new(CONVERGENCE_WINDOW, DEFAULT_TOLERANCE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convergence_needs_full_window() {
        let mut conv = Convergence::new(3, 0.01);

        assert!(!conv.check());
        conv.push(0.001);
        conv.push(0.001);
        assert!(!conv.check());
        conv.push(0.001);
        assert!(conv.check());
    }

    #[test]
    fn test_convergence_window() {
        let mut conv = Convergence::new(3, 0.030);

        conv.push(0.1);
        conv.push(0.05);
        conv.push(0.02);
        assert!(!conv.check());

        conv.push(0.01);
        conv.push(0.005);
        conv.push(0.002);

        // only the last 3 count
        assert!(conv.check());
        assert_eq!(conv.history_len(), 3);
        assert!((conv.recent_improvement() - 0.017).abs() < 1e-12);
    }

    #[test]
    fn test_observe_tracks_best_values() {
        let mut conv = Convergence::new(2, 0.01);

        assert!(!conv.observe(1.0));
        assert!(!conv.observe(0.5));
        assert!(!conv.observe(0.499));
        assert!(conv.observe(0.498));
    }

    #[test]
    fn test_convergence_reset() {
        let mut conv = Convergence::new(2, 0.5);
        conv.observe(1.0);
        conv.observe(0.9);
        conv.observe(0.8);
        assert!(conv.check());

        conv.reset();
        assert_eq!(conv.history_len(), 0);
        assert!(!conv.check());
    }

    #[test]
    fn test_for_shots() {
        let conv = Convergence::for_shots(10_000);
        assert!((conv.threshold - 0.01).abs() < 1e-12);
        assert_eq!(conv.window, CONVERGENCE_WINDOW);

        let zero_window = Convergence::new(0, 0.1);
        assert_eq!(zero_window.window, 1);
    }
}
