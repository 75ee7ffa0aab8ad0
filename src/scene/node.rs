//! Scene graph node types
//!
//! Core types for the CPU-side scene graph: node IDs, layers, transforms, content variants, and nodes.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::assets::TextureHandle;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneNodeId(pub u64);

/// Decorative group a node belongs to. Layers can be switched off as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorLayer {
    Structure,
    Reef,
    Rock,
    TankReef,
    FloorDeco,
    Gravel,
    Seaweed,
}

impl DecorLayer {
    pub const ALL: [DecorLayer; 7] = [
        DecorLayer::Structure,
        DecorLayer::Reef,
        DecorLayer::Rock,
        DecorLayer::TankReef,
        DecorLayer::FloorDeco,
        DecorLayer::Gravel,
        DecorLayer::Seaweed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DecorLayer::Structure => "structure",
            DecorLayer::Reef => "reef",
            DecorLayer::Rock => "rock",
            DecorLayer::TankReef => "tank_reef",
            DecorLayer::FloorDeco => "floor_deco",
            DecorLayer::Gravel => "gravel",
            DecorLayer::Seaweed => "seaweed",
        }
    }
}

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the rotation with a turn about +Y.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Mesh used by an instance batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceShape {
    /// Small faceted stone.
    Pebble,
    /// Bottom-anchored unit quad, bent by the renderer.
    Blade,
}

/// What a scene node contains.
#[derive(Clone, Debug)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,

    /// An upright textured quad centred on the node origin.
    Billboard { texture: TextureHandle, size: Vec2 },

    /// A textured quad lying on the floor; orientation comes from the transform.
    Decal { texture: TextureHandle, size: Vec2 },

    /// Flat textured annulus in the node's xz plane. `inner == 0` is a full disc.
    FloorAnnulus { texture: TextureHandle, inner: f32, outer: f32 },

    /// A soft dark disc on the floor.
    Shadow { radius: f32, opacity: f32 },

    /// Many copies of one mesh, each with its own transform relative to the node.
    Instances {
        shape: InstanceShape,
        texture: Option<TextureHandle>,
        transforms: Vec<Mat4>,
    },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    /// Cached world transform (recomputed during propagation).
    pub world_transform: Mat4,
    pub layer: DecorLayer,
    pub visible: bool,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(
        id: SceneNodeId,
        name: impl Into<String>,
        layer: DecorLayer,
        content: NodeContent,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            world_transform: Mat4::IDENTITY,
            layer,
            visible: true,
            content,
        }
    }
}
