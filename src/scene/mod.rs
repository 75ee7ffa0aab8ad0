//! Static scene and the world that owns it
//!
//! - `layout`: aquarium dimensions and derived geometry
//! - `node` / `graph` / `flatten`: retained scene graph and its flat export
//! - `config`: serde scene configuration
//! - `populate`: async texture loading
//! - `world`: the `World` aggregate driven once per frame

pub mod config;
pub mod flatten;
pub mod graph;
pub mod layout;
pub mod node;
pub mod populate;
pub mod world;

pub use config::{FloorScatterConfig, SceneConfig, TextureSets};
pub use flatten::{FlatInstance, InstanceKind};
pub use graph::SceneGraph;
pub use layout::AquariumLayout;
pub use node::{DecorLayer, InstanceShape, LocalTransform, NodeContent, SceneNode, SceneNodeId};
pub use populate::{load_textures, LoadedTextures};
pub use world::{FrameReport, PopulateReport, World};
