use std::fmt::Display;

/// A closed interval `[lo, hi]` on the real line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Interval {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    fn new_unchecked(lo: f64, hi: f64) -> Interval {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn split_left(&self, mid: f64) -> Self {
        assert!(self.contains(mid));
        Self::new_unchecked(self.lo, mid)
    }

    pub fn split_right(&self, mid: f64) -> Self {
        assert!(self.contains(mid));
        Self::new_unchecked(mid, self.hi)
    }

    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// True if the midpoint can no longer be distinguished from an endpoint.
    #[allow(clippy::float_cmp)]
    pub fn is_collapsed(&self) -> bool {
        let mid = self.midpoint();
        mid == self.lo || mid == self.hi
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
