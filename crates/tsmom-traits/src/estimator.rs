//! Volatility estimator trait.
//!
//! An estimator turns a trailing window of daily excess returns into a single
//! annualized volatility figure. The volatility engine owns the point-in-time
//! bookkeeping (which observations are visible on which date); estimators only
//! see the window they are handed.

/// Estimates annualized volatility from a trailing return window.
///
/// Implementations should be thread-safe (`Send + Sync`) so a single estimator
/// can be shared across engines.
pub trait VolatilityEstimator: Send + Sync {
    /// Short identifier used in logs and exports.
    fn name(&self) -> &str;

    /// Maximum number of trailing observations the estimator looks at.
    fn window(&self) -> usize;

    /// Estimate volatility from `trailing`, ordered oldest first.
    ///
    /// `trailing` holds at most [`window`](Self::window) observations, all of
    /// them strictly before the estimation date. Returns `None` when no
    /// estimate can be formed, which callers must keep distinct from a zero
    /// estimate.
    fn estimate(&self, trailing: &[f64]) -> Option<f64>;
}
