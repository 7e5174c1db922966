//! Exponentially weighted statistics over trailing windows.
//!
//! The weight of the `i`-th most recent observation is `(1 - δ) δ^i`. Powers of
//! `δ` are computed once per window length and reused for every estimate.

use serde::{Deserialize, Serialize};

use crate::{Result, TsmomError};

/// How decay weights are applied to a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Divide by the sum of the weights actually used, so the weights of any
    /// window sum to one. A single observation has itself as mean and zero
    /// variance.
    #[default]
    Normalized,
    /// Use `(1 - δ) δ^i` as is. Short windows then carry total weight
    /// `1 - δ^n` and the statistics shrink towards zero.
    Raw,
}

/// Weighted mean and variance of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMoments {
    /// Exponentially weighted mean.
    pub mean: f64,
    /// Exponentially weighted variance around `mean`.
    pub variance: f64,
    /// Number of observations used.
    pub observations: usize,
}

/// Precomputed decay weights for windows of up to `capacity` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayWeights {
    decay: f64,
    weighting: Weighting,
    weights: Vec<f64>,
}

impl DecayWeights {
    /// Precompute `(1 - δ) δ^i` for `i < capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::InvalidParameter`] if `decay` is not in `(0, 1)`
    /// or `capacity` is zero.
    pub fn new(decay: f64, capacity: usize, weighting: Weighting) -> Result<Self> {
        if !(decay > 0.0 && decay < 1.0) {
            return Err(TsmomError::InvalidParameter(format!(
                "decay must lie in (0, 1), got {decay}"
            )));
        }
        if capacity == 0 {
            return Err(TsmomError::InvalidParameter(
                "trailing window must hold at least one observation".to_string(),
            ));
        }

        let mut weights = Vec::with_capacity(capacity);
        let mut power = 1.0;
        for _ in 0..capacity {
            weights.push((1.0 - decay) * power);
            power *= decay;
        }

        Ok(Self {
            decay,
            weighting,
            weights,
        })
    }

    /// The decay parameter δ.
    pub const fn decay(&self) -> f64 {
        self.decay
    }

    /// Longest window these weights cover.
    pub fn capacity(&self) -> usize {
        self.weights.len()
    }

    /// Weights, most recent observation first.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted mean and variance of `window`, given in chronological order
    /// (oldest first).
    ///
    /// Only the most recent `capacity` observations are used. The mean is
    /// computed first and then held fixed while the squared deviations are
    /// weighted. Returns `None` for an empty window.
    pub fn moments(&self, window: &[f64]) -> Option<WeightedMoments> {
        let n = window.len().min(self.weights.len());
        if n == 0 {
            return None;
        }
        let recent = || window.iter().rev().take(n).zip(&self.weights);

        let scale = match self.weighting {
            Weighting::Normalized => self.weights[..n].iter().sum::<f64>(),
            Weighting::Raw => 1.0,
        };

        let mean = recent().map(|(r, w)| w * r).sum::<f64>() / scale;
        let variance = recent().map(|(r, w)| w * (r - mean).powi(2)).sum::<f64>() / scale;

        Some(WeightedMoments {
            mean,
            variance,
            observations: n,
        })
    }

    /// Number of periods after which a weight halves: `ln 0.5 / ln δ`.
    pub fn half_life(&self) -> f64 {
        0.5_f64.ln() / self.decay.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(f64::NAN)]
    fn test_invalid_decay(#[case] decay: f64) {
        assert!(DecayWeights::new(decay, 10, Weighting::Normalized).is_err());
    }

    #[test]
    fn test_zero_capacity() {
        assert!(DecayWeights::new(0.9, 0, Weighting::Normalized).is_err());
    }

    #[test]
    fn test_weights_are_decay_powers() {
        let weights = DecayWeights::new(0.5, 4, Weighting::Raw).unwrap();
        assert_eq!(weights.weights(), &[0.5, 0.25, 0.125, 0.0625]);
    }

    #[test]
    fn test_empty_window() {
        let weights = DecayWeights::new(0.9, 5, Weighting::Normalized).unwrap();
        assert!(weights.moments(&[]).is_none());
    }

    #[rstest]
    #[case(0.5)]
    #[case(0.94)]
    #[case(0.99)]
    fn test_single_observation_normalized(#[case] decay: f64) {
        let weights = DecayWeights::new(decay, 261, Weighting::Normalized).unwrap();
        let m = weights.moments(&[0.02]).unwrap();
        assert_relative_eq!(m.mean, 0.02, epsilon = 1e-15);
        assert_relative_eq!(m.variance, 0.0, epsilon = 1e-18);
        assert_eq!(m.observations, 1);
    }

    #[test]
    fn test_raw_weighting_matches_literal_sums() {
        let decay = 0.9;
        let weights = DecayWeights::new(decay, 261, Weighting::Raw).unwrap();
        // chronological: oldest first
        let window = [0.01, -0.02, 0.03];
        let m = weights.moments(&window).unwrap();

        let recent_first = [0.03, -0.02, 0.01];
        let mut mean = 0.0;
        for (i, r) in recent_first.iter().enumerate() {
            mean += (1.0 - decay) * decay.powi(i as i32) * r;
        }
        let mut var = 0.0;
        for (i, r) in recent_first.iter().enumerate() {
            var += (1.0 - decay) * decay.powi(i as i32) * (r - mean).powi(2);
        }

        assert_relative_eq!(m.mean, mean, epsilon = 1e-15);
        assert_relative_eq!(m.variance, var, epsilon = 1e-15);
    }

    #[test]
    fn test_window_truncated_to_capacity() {
        let weights = DecayWeights::new(0.5, 2, Weighting::Normalized).unwrap();
        // only the last two observations count
        let a = weights.moments(&[100.0, 1.0, 2.0]).unwrap();
        let b = weights.moments(&[1.0, 2.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.observations, 2);
    }

    #[test]
    fn test_recent_observations_dominate() {
        let weights = DecayWeights::new(0.5, 10, Weighting::Normalized).unwrap();
        let m = weights.moments(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        // weight on the latest observation: 0.5 / (1 - 0.5^4)
        assert_relative_eq!(m.mean, 0.5 / (1.0 - 0.0625), epsilon = 1e-12);
    }

    #[test]
    fn test_half_life() {
        let weights = DecayWeights::new(0.95, 10, Weighting::Normalized).unwrap();
        assert_relative_eq!(weights.half_life(), 13.51, epsilon = 0.01);
    }
}
