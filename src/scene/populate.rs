//! Startup texture loading
//!
//! All groups load concurrently. A group whose candidates all fail comes back
//! empty and is skipped later; the floor is a single first-success lookup.

use crate::assets::{AssetLoader, AssetSource, TextureAsset};

use super::config::TextureSets;

/// Textures available to each decorative group after loading.
#[derive(Debug, Default)]
pub struct LoadedTextures {
    pub floor: Option<TextureAsset>,
    pub reef: Vec<TextureAsset>,
    pub rock: Vec<TextureAsset>,
    /// Shells and starfish together.
    pub deco: Vec<TextureAsset>,
    pub seaweed: Vec<TextureAsset>,
    pub reef_fish: Vec<TextureAsset>,
    pub sharks: Vec<TextureAsset>,
    pub open_water_fish: Vec<TextureAsset>,
    pub rays: Vec<TextureAsset>,
}

impl LoadedTextures {
    /// Number of textures loaded across all groups.
    pub fn total(&self) -> usize {
        usize::from(self.floor.is_some())
            + self.reef.len()
            + self.rock.len()
            + self.deco.len()
            + self.seaweed.len()
            + self.reef_fish.len()
            + self.sharks.len()
            + self.open_water_fish.len()
            + self.rays.len()
    }
}

/// Load every texture group in `sets`.
pub async fn load_textures<S: AssetSource>(loader: &AssetLoader<S>, sets: &TextureSets) -> LoadedTextures {
    let (floor, reef, rock, shells, starfish, seaweed) = tokio::join!(
        loader.first_available(&sets.floor),
        loader.load_each(&sets.reef),
        loader.load_each(&sets.rock),
        loader.load_each(&sets.shells),
        loader.load_each(&sets.starfish),
        loader.load_each(&sets.seaweed),
    );
    let (reef_fish, sharks, open_water_fish, rays) = tokio::join!(
        loader.load_each(&sets.reef_fish),
        loader.load_each(&sets.sharks),
        loader.load_each(&sets.open_water_fish),
        loader.load_each(&sets.rays),
    );

    let floor = match floor {
        Ok(asset) => Some(asset),
        Err(e) => {
            log::warn!("Sand floor texture unavailable: {}", e);
            None
        }
    };

    let mut deco = shells;
    deco.extend(starfish);

    let loaded = LoadedTextures {
        floor,
        reef,
        rock,
        deco,
        seaweed,
        reef_fish,
        sharks,
        open_water_fish,
        rays,
    };
    log::info!("Loaded {} textures", loaded.total());
    loaded
}
