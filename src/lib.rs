//! Reefwalk - procedural core of an aquarium tunnel walkthrough
//!
//! Decoration placement, first-person locomotion with collision volumes, and
//! ambient creature and particle motion. Rendering is left to the caller, which
//! consumes the flattened scene graph and the ambient pools.

pub mod core;
pub mod math;
pub mod assets;
pub mod placement;
pub mod locomotion;
pub mod ambient;
pub mod scene;
