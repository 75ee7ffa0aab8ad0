//! The aquarium world
//!
//! [`World`] owns everything that lives for the session: the static scene
//! graph, the texture registry, the walker, the collision volumes and the
//! ambient pools. Nothing is global; callers drive it through
//! [`populate`](World::populate) once and [`tick`](World::tick) per frame.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::Serialize;

use crate::ambient::{AmbientSystem, CruiserKind};
use crate::assets::{TextureHandle, TextureRegistry, VariantSet};
use crate::core::input::MoveInput;
use crate::core::time::SimClock;
use crate::core::viewpoint::Viewpoint;
use crate::locomotion::{LocomotionController, MoveOutcome};
use crate::math::{seeded, SceneRng};
use crate::placement::{
    scatter, ClusterPlacer, ClusterProfile, FloorMask, LobbyHallZone, NoExclusion, PointSampler,
    ProtectedMargins, SamplerProfile, ScatterReport,
};

use super::config::SceneConfig;
use super::flatten::FlatInstance;
use super::graph::SceneGraph;
use super::node::{DecorLayer, LocalTransform, NodeContent, SceneNodeId};
use super::populate::LoadedTextures;

/// What `populate` managed to place.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PopulateReport {
    pub floor: bool,
    pub reef_points: usize,
    pub reef_clusters: usize,
    pub rock_points: usize,
    pub rock_clusters: usize,
    pub near_rock_clusters: usize,
    pub tank_reef: ScatterReport,
    pub floor_deco: ScatterReport,
    pub tank_deco: ScatterReport,
    pub gravel: ScatterReport,
    pub tank_gravel: ScatterReport,
    pub seaweed: ScatterReport,
    /// Scene graph size after population, root included.
    pub nodes: usize,
}

/// Result of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Logical time after the tick.
    pub time: f32,
    pub outcome: MoveOutcome,
    pub position: Vec3,
}

/// Owned container for all scene state.
pub struct World {
    config: SceneConfig,
    rng: SceneRng,
    graph: SceneGraph,
    groups: HashMap<DecorLayer, SceneNodeId>,
    textures: TextureRegistry,
    creature_variants: HashMap<CruiserKind, VariantSet>,
    reef_fish_variants: VariantSet,
    locomotion: LocomotionController,
    viewpoint: Viewpoint,
    ambient: AmbientSystem,
    clock: SimClock,
}

impl World {
    /// Build an unpopulated world: empty decoration groups, the walker at the
    /// spawn point facing the tunnel, and every ambient pool spawned.
    pub fn new(config: SceneConfig) -> Self {
        let layout = &config.layout;

        let mut graph = SceneGraph::new();
        let root = graph.root();
        let groups = DecorLayer::ALL
            .iter()
            .map(|&layer| (layer, graph.add_child(root, layer.name(), layer, NodeContent::Group)))
            .collect();

        let locomotion = LocomotionController::from_layout(layout, config.locomotion.clone());
        let viewpoint = Viewpoint::facing(layout.spawn_point(), -FRAC_PI_2);
        let ambient = AmbientSystem::new(&config.ambient, layout, config.seed);

        log::info!("Aquarium world created (seed {})", config.seed);

        Self {
            rng: seeded(config.seed),
            graph,
            groups,
            textures: TextureRegistry::new(),
            creature_variants: HashMap::new(),
            reef_fish_variants: VariantSet::default(),
            locomotion,
            viewpoint,
            ambient,
            clock: SimClock::default(),
            config,
        }
    }

    /// Register loaded textures and run every placement pass. Groups without
    /// textures are skipped with a warning.
    pub fn populate(&mut self, loaded: LoadedTextures) -> PopulateReport {
        let mut report = PopulateReport::default();

        if let Some(floor) = loaded.floor {
            let handle = self.textures.register(floor);
            self.add_floor(handle);
            report.floor = true;
        } else {
            log::warn!("No sand floor texture, floor omitted");
        }

        let reef = self.textures.register_all(loaded.reef);
        let rock = self.textures.register_all(loaded.rock);
        let deco = self.textures.register_all(loaded.deco);
        let seaweed = self.textures.register_all(loaded.seaweed);

        self.register_creatures(CruiserKind::Shark, loaded.sharks);
        self.register_creatures(CruiserKind::OpenWaterFish, loaded.open_water_fish);
        self.register_creatures(CruiserKind::Ray, loaded.rays);
        self.reef_fish_variants = self.textures.register_all(loaded.reef_fish);
        if self.reef_fish_variants.is_empty() {
            self.ambient.omit_reef_fish();
        }

        let zone = LobbyHallZone::from_layout(&self.config.layout, ProtectedMargins::default());

        // Spaced clusters
        let reef_sampler = self.config.reef_sampler.clone();
        let reef_clusters = self.config.reef_clusters.clone();
        (report.reef_points, report.reef_clusters) =
            self.place_clusters(&reef_sampler, &reef_clusters, &reef, &zone, DecorLayer::Reef);

        let rock_sampler = self.config.rock_sampler.clone();
        let near_rock_sampler = self.config.near_rock_sampler.clone();
        let rock_clusters = self.config.rock_clusters.clone();
        (report.rock_points, report.rock_clusters) =
            self.place_clusters(&rock_sampler, &rock_clusters, &rock, &zone, DecorLayer::Rock);
        (_, report.near_rock_clusters) =
            self.place_clusters(&near_rock_sampler, &rock_clusters, &rock, &zone, DecorLayer::Rock);

        // Floor passes
        let layout = self.config.layout.clone();
        let floor = &self.config.floor;
        let mask = FloorMask::from_layout(&layout);

        report.tank_reef = scatter::scatter_tank_reef(
            &mut self.rng,
            &floor.tank_reef,
            &reef,
            layout.tank_center(),
            layout.tank_radius,
            layout.sand_y(),
            &mut self.graph,
            self.groups[&DecorLayer::TankReef],
        );

        let deco_group = self.groups[&DecorLayer::FloorDeco];
        report.floor_deco = scatter::scatter_decals(
            &mut self.rng,
            &floor.deco,
            &deco,
            floor.deco_area(&layout),
            &mask,
            layout.big_floor_y,
            &mut self.graph,
            deco_group,
        );
        report.tank_deco = scatter::scatter_decals(
            &mut self.rng,
            &floor.tank_deco,
            &deco,
            floor.tank_deco_area(&layout),
            &NoExclusion,
            layout.sand_y(),
            &mut self.graph,
            deco_group,
        );

        let gravel_group = self.groups[&DecorLayer::Gravel];
        report.gravel = scatter::scatter_gravel(
            &mut self.rng,
            &floor.gravel,
            floor.gravel_area(&layout),
            &mask,
            layout.big_floor_y,
            &mut self.graph,
            gravel_group,
        );
        report.tank_gravel = scatter::scatter_gravel(
            &mut self.rng,
            &floor.tank_gravel,
            floor.tank_gravel_area(&layout),
            &NoExclusion,
            layout.sand_y(),
            &mut self.graph,
            gravel_group,
        );

        report.seaweed = scatter::scatter_seaweed(
            &mut self.rng,
            &floor.seaweed,
            &seaweed,
            &mask,
            layout.big_floor_y,
            &mut self.graph,
            self.groups[&DecorLayer::Seaweed],
        );

        report.nodes = self.graph.node_count();
        log::info!(
            "Populated scene: {} reef clusters, {} rock clusters, {} decals, {} pebbles, {} seaweed blades ({} nodes)",
            report.reef_clusters,
            report.rock_clusters + report.near_rock_clusters,
            report.floor_deco.placed + report.tank_deco.placed,
            report.gravel.placed + report.tank_gravel.placed,
            report.seaweed.placed,
            report.nodes
        );
        report
    }

    /// Sand floor in two pieces, leaving the tube footprint open.
    fn add_floor(&mut self, texture: TextureHandle) {
        let layout = &self.config.layout;
        let hole = layout.floor_hole();
        let origin = Vec3::new(0.0, layout.big_floor_y, 0.0);
        let group = self.groups[&DecorLayer::Structure];
        let pieces = [
            ("sand_floor_inner", 0.0, hole.min),
            ("sand_floor_outer", hole.max, layout.big_floor_radius),
        ];
        for (name, inner, outer) in pieces {
            self.graph.add_child_at(
                group,
                name,
                DecorLayer::Structure,
                NodeContent::FloorAnnulus { texture, inner, outer },
                LocalTransform::from_position(origin),
            );
        }
    }

    fn register_creatures(&mut self, kind: CruiserKind, assets: Vec<crate::assets::TextureAsset>) {
        let variants = self.textures.register_all(assets);
        if variants.is_empty() {
            self.ambient.omit_cruisers(kind);
        }
        self.creature_variants.insert(kind, variants);
    }

    /// Sample points and grow a cluster on each. Returns `(points, clusters)`.
    fn place_clusters(
        &mut self,
        sampler: &SamplerProfile,
        profile: &ClusterProfile,
        variants: &VariantSet,
        zone: &LobbyHallZone,
        layer: DecorLayer,
    ) -> (usize, usize) {
        if variants.is_empty() {
            log::warn!("No {} textures loaded, skipping {} clusters", layer.name(), sampler.count);
            return (0, 0);
        }

        let params = sampler.to_params(&self.config.layout);
        let outcome = PointSampler::new(params).sample(&mut self.rng, zone);
        let placer = ClusterPlacer::new(profile, variants, self.config.layout.big_floor_y);
        let placed = placer.place_all(
            &mut self.rng,
            &outcome.points,
            sampler.keep_probability,
            &mut self.graph,
            self.groups[&layer],
            layer,
        );
        log::info!(
            "Placed {}/{} {} clusters ({} sampler attempts)",
            placed,
            sampler.count,
            layer.name(),
            outcome.attempts
        );
        (outcome.len(), placed)
    }

    /// Advance one frame: move the walker, then every ambient pool.
    pub fn tick(&mut self, input: &MoveInput) -> FrameReport {
        let outcome = self.locomotion.step(&mut self.viewpoint, input);
        let time = self.clock.tick();
        self.ambient.update(time);
        FrameReport {
            frame: self.clock.frame(),
            time,
            outcome,
            position: self.viewpoint.position,
        }
    }

    /// Flat per-instance records of the visible static scene.
    pub fn flatten(&mut self) -> Vec<FlatInstance> {
        self.graph.flatten()
    }

    /// Texture for cruiser `index` of `kind`, cycling through the loaded set.
    pub fn cruiser_texture(&self, kind: CruiserKind, index: usize) -> Option<TextureHandle> {
        let handles = self.creature_variants.get(&kind)?.handles();
        if handles.is_empty() {
            return None;
        }
        handles.get(index % handles.len()).copied()
    }

    pub fn reef_fish_texture(&self) -> Option<TextureHandle> {
        self.reef_fish_variants.handles().first().copied()
    }

    pub fn group(&self, layer: DecorLayer) -> Option<SceneNodeId> {
        self.groups.get(&layer).copied()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn ambient(&self) -> &AmbientSystem {
        &self.ambient
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}
