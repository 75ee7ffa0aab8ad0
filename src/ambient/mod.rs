//! Ambient motion: tank particles, reef fish and open-water cruisers.
//!
//! The main entry point is [`AmbientSystem`], which owns one fixed pool per
//! agent kind and advances all of them once per tick in a fixed order.

pub mod bubbles;
pub mod cruiser;
pub mod plankton;
pub mod reef_fish;
pub mod tank;
pub mod undulation;

pub use bubbles::{BubbleField, BubbleParams};
pub use cruiser::{Cruiser, CruiserKind, CruiserParams, CruiserPool, Gait, SizeTier};
pub use plankton::{PlanktonField, PlanktonParams};
pub use reef_fish::{FishPose, OrbitBands, ReefFish, ReefFishParams, ReefSchool};
pub use tank::TankBounds;
pub use undulation::{BodyWave, SegmentPose};

use noise::Perlin;
use serde::{Deserialize, Deserializer, Serialize};

use crate::math::{seeded, SceneRng};
use crate::scene::layout::AquariumLayout;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Pool sizes and motion settings for every ambient agent kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub bubbles: BubbleParams,
    pub plankton: PlanktonParams,
    pub reef_fish: ReefFishParams,
    #[serde(deserialize_with = "sharks_over_preset")]
    pub sharks: CruiserParams,
    #[serde(deserialize_with = "open_water_fish_over_preset")]
    pub open_water_fish: CruiserParams,
    #[serde(deserialize_with = "rays_over_preset")]
    pub rays: CruiserParams,
}

fn sharks_over_preset<'de, D: Deserializer<'de>>(d: D) -> Result<CruiserParams, D::Error> {
    cruiser::overlay(CruiserParams::sharks(), d)
}

fn open_water_fish_over_preset<'de, D: Deserializer<'de>>(d: D) -> Result<CruiserParams, D::Error> {
    cruiser::overlay(CruiserParams::open_water_fish(), d)
}

fn rays_over_preset<'de, D: Deserializer<'de>>(d: D) -> Result<CruiserParams, D::Error> {
    cruiser::overlay(CruiserParams::rays(), d)
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            bubbles: BubbleParams::default(),
            plankton: PlanktonParams::default(),
            reef_fish: ReefFishParams::default(),
            sharks: CruiserParams::sharks(),
            open_water_fish: CruiserParams::open_water_fish(),
            rays: CruiserParams::rays(),
        }
    }
}

// ---------------------------------------------------------------------------
// AmbientSystem
// ---------------------------------------------------------------------------

/// Owns every ambient pool. Call [`update`](Self::update) once per tick.
pub struct AmbientSystem {
    rng: SceneRng,
    noise: Perlin,
    bubbles: BubbleField,
    plankton: PlanktonField,
    reef_fish: ReefSchool,
    sharks: CruiserPool,
    open_water_fish: CruiserPool,
    rays: CruiserPool,
}

impl AmbientSystem {
    /// Spawn every pool from `seed`.
    pub fn new(config: &AmbientConfig, layout: &AquariumLayout, seed: u64) -> Self {
        let mut rng = seeded(seed ^ 0xA3B1_E7C5);
        let bubbles = BubbleField::new(config.bubbles.clone(), layout, &mut rng);
        let plankton = PlanktonField::new(config.plankton.clone(), layout, &mut rng);
        let reef_fish = ReefSchool::new(&config.reef_fish, layout, &mut rng);
        let sharks = CruiserPool::new(CruiserKind::Shark, config.sharks.clone(), &mut rng);
        let open_water_fish =
            CruiserPool::new(CruiserKind::OpenWaterFish, config.open_water_fish.clone(), &mut rng);
        let rays = CruiserPool::new(CruiserKind::Ray, config.rays.clone(), &mut rng);

        log::info!(
            "Ambient pools: {} bubbles, {} plankton, {} reef fish, {} sharks, {} fish, {} rays",
            bubbles.len(),
            plankton.len(),
            reef_fish.len(),
            sharks.len(),
            open_water_fish.len(),
            rays.len()
        );

        Self {
            rng,
            noise: Perlin::new(seed as u32),
            bubbles,
            plankton,
            reef_fish,
            sharks,
            open_water_fish,
            rays,
        }
    }

    /// Advance all pools to logical time `t`.
    pub fn update(&mut self, t: f32) {
        self.bubbles.update(t, &mut self.rng);
        self.plankton.update(t, &mut self.rng);
        self.reef_fish.update(t);
        self.sharks.update(t, &self.noise);
        self.open_water_fish.update(t, &self.noise);
        self.rays.update(t, &self.noise);
    }

    /// Remove a cruiser kind from the scene, e.g. when none of its textures
    /// loaded.
    pub fn omit_cruisers(&mut self, kind: CruiserKind) {
        log::warn!("Omitting {} pool", kind.name());
        match kind {
            CruiserKind::Shark => self.sharks.clear(),
            CruiserKind::OpenWaterFish => self.open_water_fish.clear(),
            CruiserKind::Ray => self.rays.clear(),
        }
    }

    pub fn omit_reef_fish(&mut self) {
        log::warn!("Omitting reef fish pool");
        self.reef_fish.clear();
    }

    pub fn bubbles(&self) -> &BubbleField {
        &self.bubbles
    }

    pub fn plankton(&self) -> &PlanktonField {
        &self.plankton
    }

    pub fn reef_fish(&self) -> &ReefSchool {
        &self.reef_fish
    }

    pub fn cruisers(&self, kind: CruiserKind) -> &CruiserPool {
        match kind {
            CruiserKind::Shark => &self.sharks,
            CruiserKind::OpenWaterFish => &self.open_water_fish,
            CruiserKind::Ray => &self.rays,
        }
    }

    /// Total live agents across all pools.
    pub fn agent_count(&self) -> usize {
        self.bubbles.len()
            + self.plankton.len()
            + self.reef_fish.len()
            + self.sharks.len()
            + self.open_water_fish.len()
            + self.rays.len()
    }
}
