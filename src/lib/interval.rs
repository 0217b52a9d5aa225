//! Closed intervals over `f64`, used for valid hit distances along a ray and for clamping.

#[derive(Clone, Copy, Debug, PartialEq)]
/// Closed range `[min, max]`.
///
/// No validation is done on construction: an interval with `min > max` behaves like
/// [Interval::EMPTY] for every query.
pub struct Interval {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl Interval {
    /// Contains nothing, its size is negative infinity.
    pub const EMPTY: Self = Self::new(f64::INFINITY, f64::NEG_INFINITY);
    /// Contains every value, infinities included.
    pub const UNIVERSE: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);

    #[inline]
    /// Create an interval from its bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    /// `max - min`, negative for an empty interval.
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    /// Inclusive membership test.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    #[inline]
    /// Exclusive membership test, the bounds themselves are outside.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Saturate `x` to the bounds.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
