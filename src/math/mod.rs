//! Mathematical utilities

pub mod angle;
pub mod rng;
pub mod span;

pub use angle::{normalize_angle, shortest_delta};
pub use rng::{seeded, SceneRng, ScatterRng};
pub use span::Span;
