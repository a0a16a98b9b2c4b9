use std::fmt;
use std::ops::Mul;

/// Elapsed time between two consecutive frame starts, in seconds.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Timestep(f32);

impl Timestep {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub const fn from_seconds(seconds: f32) -> Self {
        Self(seconds)
    }

    #[inline]
    pub const fn seconds(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn milliseconds(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<Timestep> for f32 {
    fn from(ts: Timestep) -> f32 {
        ts.0
    }
}

/// `speed * ts` reads as "distance covered this frame".
impl Mul<Timestep> for f32 {
    type Output = f32;

    fn mul(self, ts: Timestep) -> f32 {
        self * ts.0
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}ms", self.milliseconds())
    }
}
