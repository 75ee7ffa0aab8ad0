//! Closed value ranges used by the placement and ambient configs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::ScatterRng;

/// A `[min, max]` interval of `f32`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate span holding a single value.
    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    /// Uniform draw from the span.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.range(self.min, self.max)
    }

    /// Uniform draw rounded to the nearest integer (at least 1).
    pub fn sample_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.sample(rng).round().max(1.0) as u32
    }

    /// Open-interval containment (`min < v < max`).
    pub fn strictly_contains(&self, v: f32) -> bool {
        v > self.min && v < self.max
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }
}
