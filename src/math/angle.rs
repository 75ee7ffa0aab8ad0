//! Angle helpers.

use std::f32::consts::{PI, TAU};

/// Wrap an angle into `[-PI, PI)`.
pub fn normalize_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

/// Signed shortest rotation from `from` to `to`.
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}
