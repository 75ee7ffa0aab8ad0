//! Async texture loading with ordered fallbacks.
//!
//! A decorative group names its textures as ordered candidate lists. The loader
//! reads bytes through an [`AssetSource`], decodes them with `image` to validate
//! and measure them, and either returns the first success
//! ([`AssetLoader::first_available`]) or every success
//! ([`AssetLoader::load_each`]).

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{Error, Result};

/// Where asset bytes come from.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    /// Read the whole asset at `path`.
    async fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads assets from a directory on disk.
///
/// Leading slashes in candidate paths are stripped, so web-style paths such as
/// `/textures/sand.png` resolve under the root.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsSource {
    async fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(path)).await
    }
}

/// In-memory asset table.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }
}

impl AssetSource for MemorySource {
    async fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

/// A decoded, measured texture.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAsset {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl TextureAsset {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Loads textures through an [`AssetSource`].
pub struct AssetLoader<S> {
    source: S,
}

impl<S: AssetSource> AssetLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load and decode a single texture.
    pub async fn load(&self, path: &str) -> Result<TextureAsset> {
        let bytes = self.source.read(path).await?;
        if bytes.is_empty() {
            return Err(Error::Asset(format!("{path} is empty")));
        }
        let image = image::load_from_memory(&bytes)?;
        Ok(TextureAsset {
            path: path.to_string(),
            width: image.width(),
            height: image.height(),
        })
    }

    /// First candidate that loads, in list order.
    ///
    /// Each failure is logged; `AssetsExhausted` when none load.
    pub async fn first_available<P: AsRef<str>>(&self, candidates: &[P]) -> Result<TextureAsset> {
        for candidate in candidates {
            let path = candidate.as_ref();
            match self.load(path).await {
                Ok(asset) => return Ok(asset),
                Err(e) => log::warn!("Texture candidate {} failed: {}", path, e),
            }
        }
        Err(Error::AssetsExhausted {
            tried: candidates.len(),
        })
    }

    /// Every candidate that loads, in list order. Failures are logged and skipped.
    pub async fn load_each<P: AsRef<str>>(&self, paths: &[P]) -> Vec<TextureAsset> {
        let mut loaded = Vec::with_capacity(paths.len());
        for p in paths {
            match self.load(p.as_ref()).await {
                Ok(asset) => loaded.push(asset),
                Err(e) => log::warn!("Missing texture {}: {}", p.as_ref(), e),
            }
        }
        loaded
    }
}
