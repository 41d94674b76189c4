//! Float helpers for possibly-undefined quantities.
//!
//! The algorithm carries "unknown" as `None`. These helpers give the
//! min/max/compare semantics the layout passes rely on: an unknown operand
//! of `min`/`max` defers to the known one, and unknown never turns into zero.

/// Tolerance used for every float comparison in the engine.
pub const EPSILON: f32 = 0.0001;

/// Compare two optional floats: both unknown is equal, one unknown is not.
#[inline]
pub fn floats_equal(a: Option<f32>, b: Option<f32>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() < EPSILON,
        (None, None) => true,
        _ => false,
    }
}

/// Compare two known floats with the engine tolerance.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Arithmetic over `Option<f32>`.
pub trait MaybeMath: Sized {
    /// Larger of the two; an unknown side yields the other.
    fn maybe_max(self, rhs: Option<f32>) -> Self;
    /// Smaller of the two; an unknown side yields the other.
    fn maybe_min(self, rhs: Option<f32>) -> Self;
    /// Sum, unknown if either side is unknown.
    fn maybe_add(self, rhs: Option<f32>) -> Self;
    /// Difference, unknown if either side is unknown.
    fn maybe_sub(self, rhs: Option<f32>) -> Self;
}

impl MaybeMath for Option<f32> {
    #[inline]
    fn maybe_max(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    #[inline]
    fn maybe_min(self, rhs: Option<f32>) -> Self {
        match (self, rhs) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    #[inline]
    fn maybe_add(self, rhs: Option<f32>) -> Self {
        Some(self? + rhs?)
    }

    #[inline]
    fn maybe_sub(self, rhs: Option<f32>) -> Self {
        Some(self? - rhs?)
    }
}

/// Collapse NaN and infinities to `None`.
#[inline]
pub fn finite(value: f32) -> Option<f32> {
    value.is_finite().then_some(value)
}
