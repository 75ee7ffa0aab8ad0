//! Flattened scene graph output for upload.
//!
//! `FlatInstance` is the result of walking the scene graph: one record per visible
//! billboard plane, decal, floor piece, shadow disc or batch instance. Records are `Pod`, so a
//! slice of them can be handed to a renderer as raw bytes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use super::node::DecorLayer;

/// Discriminant stored in [`FlatInstance::kind`].
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceKind {
    Billboard = 0,
    Decal = 1,
    Shadow = 2,
    Pebble = 3,
    Blade = 4,
    FloorAnnulus = 5,
}

/// Marker for records that have no texture.
pub const NO_TEXTURE: u32 = u32::MAX;

/// One entry in the flattened visible set.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FlatInstance {
    /// World transform, column-major.
    pub transform: [[f32; 4]; 4],
    /// Quad width and height (shadow: radius in both; annulus: inner, outer radius).
    pub size: [f32; 2],
    /// Texture slot or [`NO_TEXTURE`].
    pub texture: u32,
    /// [`InstanceKind`] as `u32`.
    pub kind: u32,
    pub opacity: f32,
    /// [`DecorLayer`] index.
    pub layer: u32,
    pub _pad: [u32; 2],
}

impl FlatInstance {
    pub fn new(kind: InstanceKind, layer: DecorLayer, transform: Mat4, size: Vec2) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            size: size.to_array(),
            texture: NO_TEXTURE,
            kind: kind as u32,
            opacity: 1.0,
            layer: layer_index(layer),
            _pad: [0; 2],
        }
    }

    pub fn with_texture(mut self, texture: u32) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }

    pub fn is_kind(&self, kind: InstanceKind) -> bool {
        self.kind == kind as u32
    }
}

fn layer_index(layer: DecorLayer) -> u32 {
    DecorLayer::ALL
        .iter()
        .position(|l| *l == layer)
        .map_or(0, |i| i as u32)
}

/// View a flattened set as bytes.
pub fn as_bytes(entries: &[FlatInstance]) -> &[u8] {
    bytemuck::cast_slice(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_record_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FlatInstance>(), 96);
        let entries = [FlatInstance::new(InstanceKind::Shadow, DecorLayer::Rock, Mat4::IDENTITY, Vec2::ONE); 3];
        assert_eq!(as_bytes(&entries).len(), 3 * 96);
    }

    #[test]
    fn test_transform_round_trips() {
        let m = Mat4::from_translation(Vec3::new(4.0, -5.0, 8.0));
        let entry = FlatInstance::new(InstanceKind::Billboard, DecorLayer::Reef, m, Vec2::new(10.0, 8.0))
            .with_texture(2);
        assert_eq!(entry.world_matrix(), m);
        assert_eq!(entry.texture, 2);
        assert!(entry.is_kind(InstanceKind::Billboard));
        assert_eq!(entry.layer, 1);
    }
}
