//! Scene configuration
//!
//! Everything needed to rebuild the same aquarium: the seed, the layout, every
//! placement pass and the ambient pools. `Default` reproduces the stock scene.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ambient::AmbientConfig;
use crate::core::Result;
use crate::locomotion::LocomotionConfig;
use crate::math::Span;
use crate::placement::{
    ClusterProfile, DecoParams, GravelParams, SamplerProfile, ScatterArea, SeaweedParams,
    TankReefParams,
};

use super::layout::AquariumLayout;

// ---------------------------------------------------------------------------
// Texture candidates
// ---------------------------------------------------------------------------

/// Candidate texture paths per decorative group, relative to the asset root.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSets {
    /// Ordered fallbacks for the sand floor; the first that loads wins.
    pub floor: Vec<String>,
    pub reef: Vec<String>,
    pub rock: Vec<String>,
    pub shells: Vec<String>,
    pub starfish: Vec<String>,
    pub seaweed: Vec<String>,
    pub reef_fish: Vec<String>,
    pub sharks: Vec<String>,
    pub open_water_fish: Vec<String>,
    pub rays: Vec<String>,
}

fn numbered(dir: &str, stem: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("textures/{dir}/{stem}_{i:02}.png"))
        .collect()
}

impl Default for TextureSets {
    fn default() -> Self {
        Self {
            floor: vec![
                "textures/floor/ocean_sand.png".into(),
                "textures/floor/ocean_sand.jpg".into(),
                "textures/floor/sand.jpg".into(),
            ],
            reef: numbered("reef", "coral", 7),
            rock: numbered("rock", "live_rock", 3),
            shells: numbered("deco", "shell", 5),
            starfish: numbered("deco", "starfish", 4),
            seaweed: numbered("seaweed", "blade", 8),
            reef_fish: vec!["textures/fish/clownfish.png".into()],
            sharks: numbered("sharks", "shark", 6),
            open_water_fish: numbered("fish", "open_water", 4),
            rays: vec!["textures/rays/ray.png".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Floor passes
// ---------------------------------------------------------------------------

/// Unspaced floor passes and the areas they cover.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorScatterConfig {
    pub tank_reef: TankReefParams,
    pub deco: DecoParams,
    pub tank_deco: DecoParams,
    pub gravel: GravelParams,
    pub tank_gravel: GravelParams,
    pub seaweed: SeaweedParams,
    /// Big-floor decals start this far outside the floor hole.
    pub deco_ring_offset: f32,
    pub deco_ring_max: f32,
    pub gravel_ring_offset: f32,
    pub gravel_ring_max: f32,
    /// Tank passes stay this far from the glass.
    pub tank_wall_margin: f32,
    /// Empty disc around the tank reef for decals.
    pub tank_deco_dead_zone: f32,
    pub tank_gravel_dead_zone: f32,
}

impl Default for FloorScatterConfig {
    fn default() -> Self {
        Self {
            tank_reef: TankReefParams::default(),
            deco: DecoParams::big_floor(),
            tank_deco: DecoParams::tank(),
            gravel: GravelParams::big_floor(),
            tank_gravel: GravelParams::tank(),
            seaweed: SeaweedParams::default(),
            deco_ring_offset: 25.0,
            deco_ring_max: 900.0,
            gravel_ring_offset: 20.0,
            gravel_ring_max: 950.0,
            tank_wall_margin: 1.6,
            tank_deco_dead_zone: 2.8,
            tank_gravel_dead_zone: 2.4,
        }
    }
}

impl FloorScatterConfig {
    fn ring(layout: &AquariumLayout, offset: f32, max: f32) -> ScatterArea {
        ScatterArea::Ring {
            center: Vec2::ZERO,
            radius: Span::new(layout.floor_hole().max + offset, max),
        }
    }

    fn tank_disc(&self, layout: &AquariumLayout, dead_zone: f32) -> ScatterArea {
        ScatterArea::Disc {
            center: layout.tank_center(),
            radius: layout.tank_radius - self.tank_wall_margin,
            dead_zone,
        }
    }

    pub fn deco_area(&self, layout: &AquariumLayout) -> ScatterArea {
        Self::ring(layout, self.deco_ring_offset, self.deco_ring_max)
    }

    pub fn gravel_area(&self, layout: &AquariumLayout) -> ScatterArea {
        Self::ring(layout, self.gravel_ring_offset, self.gravel_ring_max)
    }

    pub fn tank_deco_area(&self, layout: &AquariumLayout) -> ScatterArea {
        self.tank_disc(layout, self.tank_deco_dead_zone)
    }

    pub fn tank_gravel_area(&self, layout: &AquariumLayout) -> ScatterArea {
        self.tank_disc(layout, self.tank_gravel_dead_zone)
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Full scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for placement and ambient spawning.
    pub seed: u64,
    pub layout: AquariumLayout,
    pub locomotion: LocomotionConfig,

    // -- Spaced cluster passes ---------------------------------------------

    pub reef_sampler: SamplerProfile,
    pub rock_sampler: SamplerProfile,
    /// Second rock pass closer to the ring.
    pub near_rock_sampler: SamplerProfile,
    pub reef_clusters: ClusterProfile,
    pub rock_clusters: ClusterProfile,

    // -- Everything else ----------------------------------------------------

    pub floor: FloorScatterConfig,
    pub ambient: AmbientConfig,
    pub textures: TextureSets,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            layout: AquariumLayout::default(),
            locomotion: LocomotionConfig::default(),
            reef_sampler: SamplerProfile::reef(),
            rock_sampler: SamplerProfile::rock(),
            near_rock_sampler: SamplerProfile::near_rock(),
            reef_clusters: ClusterProfile::reef(),
            rock_clusters: ClusterProfile::rock(),
            floor: FloorScatterConfig::default(),
            ambient: AmbientConfig::default(),
            textures: TextureSets::default(),
        }
    }
}

impl SceneConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("aquarium.json");
        let config = SceneConfig::default().with_seed(99);

        config.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();

        assert_eq!(loaded.seed, 99);
        assert_eq!(loaded.reef_sampler.count, 56);
        assert_eq!(loaded.textures.reef.len(), 7);
        assert_eq!(loaded.layout.tunnel_radius, 150.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"seed": 7, "locomotion": {"step": 0.25}}"#).unwrap();

        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.locomotion.step, 0.25);
        assert!(config.locomotion.normalize_diagonal);
        assert_eq!(config.rock_sampler.count, 102);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ seed: ").unwrap();
        assert!(matches!(SceneConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SceneConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_scatter_areas() {
        let layout = AquariumLayout::default();
        let floor = FloorScatterConfig::default();
        match floor.deco_area(&layout) {
            ScatterArea::Ring { radius, .. } => {
                assert!((radius.min - 181.1).abs() < 1e-3);
                assert_eq!(radius.max, 900.0);
            }
            other => panic!("unexpected area {other:?}"),
        }
        match floor.tank_gravel_area(&layout) {
            ScatterArea::Disc {
                center,
                radius,
                dead_zone,
            } => {
                assert_eq!(center, Vec2::new(78.0, 0.0));
                assert!((radius - 10.9).abs() < 1e-5);
                assert_eq!(dead_zone, 2.4);
            }
            other => panic!("unexpected area {other:?}"),
        }
    }
}
