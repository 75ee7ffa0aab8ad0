//! Texture assets and the handles placement uses to refer to them

pub mod loader;

pub use loader::{AssetLoader, AssetSource, FsSource, MemorySource, TextureAsset};

/// Slot of a loaded texture in the [`TextureRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// The visual variants available to one decorative group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantSet {
    handles: Vec<TextureHandle>,
}

impl VariantSet {
    pub fn new(handles: Vec<TextureHandle>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &[TextureHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Union of two sets, `self` first.
    pub fn merged(&self, other: &VariantSet) -> VariantSet {
        let mut handles = self.handles.clone();
        handles.extend_from_slice(&other.handles);
        VariantSet { handles }
    }
}

/// Every texture loaded for the scene, addressed by handle.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<TextureAsset>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, asset: TextureAsset) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(asset);
        handle
    }

    /// Register a batch and return it as a variant set.
    pub fn register_all(&mut self, assets: Vec<TextureAsset>) -> VariantSet {
        VariantSet::new(assets.into_iter().map(|a| self.register(a)).collect())
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureAsset> {
        self.textures.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str) -> TextureAsset {
        TextureAsset {
            path: path.to_string(),
            width: 4,
            height: 4,
        }
    }

    #[test]
    fn test_registry_hands_out_sequential_slots() {
        let mut registry = TextureRegistry::new();
        let shells = registry.register_all(vec![asset("bhg.png"), asset("sh.png")]);
        let stars = registry.register_all(vec![asset("edr.png")]);

        assert_eq!(shells.handles(), &[TextureHandle(0), TextureHandle(1)]);
        assert_eq!(stars.handles(), &[TextureHandle(2)]);
        assert_eq!(registry.get(TextureHandle(2)).unwrap().path, "edr.png");
        assert!(registry.get(TextureHandle(3)).is_none());

        let all = shells.merged(&stars);
        assert_eq!(all.len(), 3);
    }
}
