//! Loose floor decoration.
//!
//! Unlike clusters these passes do no spacing checks: they scatter items with a
//! bounded number of attempts, rejecting only positions the floor mask forbids.
//! Each pass returns a [`ScatterReport`] so the caller can log how full it got.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::{TextureHandle, VariantSet};
use crate::math::{ScatterRng, Span};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{DecorLayer, InstanceShape, LocalTransform, NodeContent, SceneNodeId};

use super::cluster::{Bouquet, BouquetProfile};
use super::zones::ExclusionZone;

/// How full a scatter pass got.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScatterReport {
    pub placed: usize,
    pub requested: usize,
    pub attempts: usize,
}

impl ScatterReport {
    pub fn is_complete(&self) -> bool {
        self.placed >= self.requested
    }
}

impl std::ops::AddAssign for ScatterReport {
    fn add_assign(&mut self, other: Self) {
        self.placed += other.placed;
        self.requested += other.requested;
        self.attempts += other.attempts;
    }
}

/// Where a pass draws candidate positions from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScatterArea {
    /// Uniform-area annulus around `center`.
    Ring { center: Vec2, radius: Span },
    /// Uniform-area disc around `center`; draws inside `dead_zone` are rejected.
    Disc {
        center: Vec2,
        radius: f32,
        dead_zone: f32,
    },
}

impl ScatterArea {
    /// Draw a candidate, or `None` if it fell in the dead zone.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec2> {
        match *self {
            ScatterArea::Ring { center, radius } => {
                let a = rng.angle();
                let r = rng.annulus_radius(radius.min, radius.max);
                Some(center + Vec2::new(a.cos(), a.sin()) * r)
            }
            ScatterArea::Disc {
                center,
                radius,
                dead_zone,
            } => {
                let a = rng.angle();
                let r = rng.disc_radius(radius);
                if r < dead_zone {
                    return None;
                }
                Some(center + Vec2::new(a.cos(), a.sin()) * r)
            }
        }
    }
}

/// Small coral heads scattered over the tank sand.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TankReefParams {
    pub count: usize,
    /// Kept clear of the tank wall.
    pub wall_margin: f32,
    pub bouquet: BouquetProfile,
}

impl Default for TankReefParams {
    fn default() -> Self {
        Self {
            count: 9,
            wall_margin: 2.2,
            bouquet: BouquetProfile::tank_reef(),
        }
    }
}

/// Place `count` bouquets uniformly inside the tank disc.
pub fn scatter_tank_reef<R: Rng + ?Sized>(
    rng: &mut R,
    params: &TankReefParams,
    variants: &VariantSet,
    tank_center: Vec2,
    tank_radius: f32,
    sand_y: f32,
    graph: &mut SceneGraph,
    parent: SceneNodeId,
) -> ScatterReport {
    let mut report = ScatterReport {
        requested: params.count,
        ..Default::default()
    };
    if variants.is_empty() {
        log::warn!("No reef textures available, skipping tank reef");
        return report;
    }

    let max_r = (tank_radius - params.wall_margin).max(0.0);
    for _ in 0..params.count {
        report.attempts += 1;
        let Some(&variant) = rng.pick(variants.handles()) else {
            break;
        };
        let p = tank_center + rng.point_in_disc(max_r);
        let bouquet = Bouquet::sample(rng, &params.bouquet, variant, sand_y);
        let transform = LocalTransform::from_position(Vec3::new(p.x, 0.0, p.y)).with_yaw(rng.angle());
        bouquet.attach(graph, parent, DecorLayer::TankReef, transform);
        report.placed += 1;
    }
    report
}

/// Shells and starfish lying on the sand, each with a soft shadow.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoParams {
    pub count: usize,
    pub size: Span,
    /// Quad width as a multiple of size.
    pub width_factor: Span,
    /// Quad height as a multiple of size.
    pub height_factor: Span,
    pub sink: Span,
    /// Random pitch away from lying flat.
    pub tilt_jitter: f32,
    pub roll_jitter: f32,
    /// Shadow radius as a multiple of size.
    pub shadow_factor: f32,
    pub shadow_opacity: Span,
    /// Candidate budget per requested item.
    pub attempts_per_item: usize,
}

impl Default for DecoParams {
    fn default() -> Self {
        Self::big_floor()
    }
}

impl DecoParams {
    pub fn big_floor() -> Self {
        Self {
            count: 55,
            size: Span::new(1.2, 3.4),
            width_factor: Span::new(1.9, 2.25),
            height_factor: Span::new(2.75, 3.15),
            sink: Span::new(0.25, 0.75),
            tilt_jitter: 0.18,
            roll_jitter: 0.35,
            shadow_factor: 0.55,
            shadow_opacity: Span::new(0.20, 0.28),
            attempts_per_item: 40,
        }
    }

    pub fn tank() -> Self {
        Self {
            count: 26,
            size: Span::new(0.35, 0.85),
            width_factor: Span::new(5.9, 9.2),
            height_factor: Span::new(5.8, 6.15),
            sink: Span::new(0.08, 0.22),
            tilt_jitter: 0.16,
            roll_jitter: 0.25,
            shadow_factor: 0.55,
            shadow_opacity: Span::fixed(0.20),
            attempts_per_item: 50,
        }
    }
}

/// Scatter flat decals over `area`, skipping positions inside `mask`.
pub fn scatter_decals<R, Z>(
    rng: &mut R,
    params: &DecoParams,
    variants: &VariantSet,
    area: ScatterArea,
    mask: &Z,
    floor_y: f32,
    graph: &mut SceneGraph,
    parent: SceneNodeId,
) -> ScatterReport
where
    R: Rng + ?Sized,
    Z: ExclusionZone + ?Sized,
{
    let mut report = ScatterReport {
        requested: params.count,
        ..Default::default()
    };
    if variants.is_empty() {
        log::warn!("No shell or starfish textures available, skipping floor decoration");
        return report;
    }

    let max_attempts = params.count * params.attempts_per_item;
    while report.placed < params.count && report.attempts < max_attempts {
        report.attempts += 1;

        let Some(p) = area.draw(rng) else { continue };
        if mask.contains(p) {
            continue;
        }
        let Some(&texture) = rng.pick(variants.handles()) else {
            continue;
        };

        let s = params.size.sample(rng);
        let size = Vec2::new(s * params.width_factor.sample(rng), s * params.height_factor.sample(rng));
        let sink = params.sink.sample(rng);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            -FRAC_PI_2 + rng.range(-params.tilt_jitter, params.tilt_jitter),
            rng.angle(),
            rng.range(-params.roll_jitter, params.roll_jitter),
        );

        graph.add_child_at(
            parent,
            "deco_shadow",
            DecorLayer::FloorDeco,
            NodeContent::Shadow {
                radius: s * params.shadow_factor,
                opacity: params.shadow_opacity.sample(rng),
            },
            LocalTransform::from_position(Vec3::new(p.x, floor_y + 0.01, p.y)),
        );
        graph.add_child_at(
            parent,
            "deco",
            DecorLayer::FloorDeco,
            NodeContent::Decal { texture, size },
            LocalTransform::from_position(Vec3::new(p.x, floor_y + 0.03 - sink, p.y)).with_rotation(rotation),
        );
        report.placed += 1;
    }
    report
}

/// Instanced pebbles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GravelParams {
    pub count: usize,
    pub sink: Span,
    pub scale: Span,
    /// Height above the floor reference before sinking.
    pub lift: f32,
    pub attempts_per_item: usize,
}

impl Default for GravelParams {
    fn default() -> Self {
        Self::big_floor()
    }
}

impl GravelParams {
    pub fn big_floor() -> Self {
        Self {
            count: 520,
            sink: Span::new(0.06, 0.16),
            scale: Span::new(0.8, 1.5),
            lift: 0.02,
            attempts_per_item: 30,
        }
    }

    pub fn tank() -> Self {
        Self {
            count: 220,
            sink: Span::new(0.03, 0.10),
            scale: Span::new(0.7, 1.2),
            lift: 0.02,
            attempts_per_item: 30,
        }
    }
}

/// Scatter pebbles over `area` as one instance batch.
pub fn scatter_gravel<R, Z>(
    rng: &mut R,
    params: &GravelParams,
    area: ScatterArea,
    mask: &Z,
    floor_y: f32,
    graph: &mut SceneGraph,
    parent: SceneNodeId,
) -> ScatterReport
where
    R: Rng + ?Sized,
    Z: ExclusionZone + ?Sized,
{
    let mut report = ScatterReport {
        requested: params.count,
        ..Default::default()
    };
    let mut transforms = Vec::with_capacity(params.count);
    let max_attempts = params.count * params.attempts_per_item;
    let y = floor_y + params.lift;

    while transforms.len() < params.count && report.attempts < max_attempts {
        report.attempts += 1;

        let Some(p) = area.draw(rng) else { continue };
        if mask.contains(p) {
            continue;
        }

        let sink = params.sink.sample(rng);
        let tumble = Quat::from_euler(EulerRot::XYZ, rng.range(0.0, PI), rng.range(0.0, PI), rng.range(0.0, PI));
        let scale = params.scale.sample(rng);
        transforms.push(Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            tumble,
            Vec3::new(p.x, y - sink, p.y),
        ));
    }

    report.placed = transforms.len();
    graph.add_child(
        parent,
        "gravel",
        DecorLayer::Gravel,
        NodeContent::Instances {
            shape: InstanceShape::Pebble,
            texture: None,
            transforms,
        },
    );
    report
}

/// A circular patch of seaweed and the share of blades it receives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SeaweedPatch {
    pub center: (f32, f32),
    pub radius: f32,
    pub share: f32,
}

/// Instanced seaweed blades in dense patches plus a sparse remainder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaweedParams {
    /// Blades across all textures.
    pub total: usize,
    pub patches: Vec<SeaweedPatch>,
    /// Radius of the disc that receives the leftover blades.
    pub remainder_radius: f32,
    pub height: Span,
    /// Blade width as a multiple of its height.
    pub width_factor: Span,
    pub roll_jitter: f32,
    /// Size of the unit blade mesh the scales are relative to.
    pub base_width: f32,
    pub base_height: f32,
    pub lift: f32,
    pub attempts_per_item: usize,
}

impl Default for SeaweedParams {
    fn default() -> Self {
        Self {
            total: 10_000,
            patches: vec![
                SeaweedPatch { center: (220.0, 120.0), radius: 160.0, share: 0.35 },
                SeaweedPatch { center: (-260.0, -180.0), radius: 170.0, share: 0.35 },
                SeaweedPatch { center: (380.0, -260.0), radius: 190.0, share: 0.20 },
            ],
            remainder_radius: 950.0,
            height: Span::new(0.35, 60.6),
            width_factor: Span::new(0.16, 0.30),
            roll_jitter: 0.12,
            base_width: 2.2,
            base_height: 6.0,
            lift: 0.08,
            attempts_per_item: 60,
        }
    }
}

/// Scatter seaweed for every texture: one instance batch each, with the total
/// split evenly between textures.
pub fn scatter_seaweed<R, Z>(
    rng: &mut R,
    params: &SeaweedParams,
    variants: &VariantSet,
    mask: &Z,
    floor_y: f32,
    graph: &mut SceneGraph,
    parent: SceneNodeId,
) -> ScatterReport
where
    R: Rng + ?Sized,
    Z: ExclusionZone + ?Sized,
{
    let mut report = ScatterReport::default();
    if variants.is_empty() {
        log::warn!("No seaweed textures available, skipping seaweed field");
        return report;
    }

    let per_texture = params.total / variants.len();
    for &texture in variants.handles() {
        let mut transforms = Vec::with_capacity(per_texture);

        for patch in &params.patches {
            let want = (per_texture as f32 * patch.share).floor() as usize;
            report += scatter_blades(rng, params, patch.center, patch.radius, want, mask, floor_y, &mut transforms);
        }
        let remaining = per_texture.saturating_sub(transforms.len());
        if remaining > 0 {
            report += scatter_blades(
                rng,
                params,
                (0.0, 0.0),
                params.remainder_radius,
                remaining,
                mask,
                floor_y,
                &mut transforms,
            );
        }

        graph.add_child(
            parent,
            "seaweed",
            DecorLayer::Seaweed,
            NodeContent::Instances {
                shape: InstanceShape::Blade,
                texture: Some(texture),
                transforms,
            },
        );
    }
    report
}

fn scatter_blades<R, Z>(
    rng: &mut R,
    params: &SeaweedParams,
    center: (f32, f32),
    radius: f32,
    want: usize,
    mask: &Z,
    floor_y: f32,
    out: &mut Vec<Mat4>,
) -> ScatterReport
where
    R: Rng + ?Sized,
    Z: ExclusionZone + ?Sized,
{
    let mut report = ScatterReport {
        requested: want,
        ..Default::default()
    };
    let center = Vec2::new(center.0, center.1);
    let max_attempts = want * params.attempts_per_item;

    while report.placed < want && report.attempts < max_attempts {
        report.attempts += 1;

        let p = center + rng.point_in_disc(radius);
        if mask.contains(p) {
            continue;
        }

        let h = params.height.sample(rng);
        let w = h * params.width_factor.sample(rng);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            0.0,
            rng.angle(),
            rng.range(-params.roll_jitter, params.roll_jitter),
        );
        out.push(Mat4::from_scale_rotation_translation(
            Vec3::new(w / params.base_width, h / params.base_height, 1.0),
            rotation,
            Vec3::new(p.x, floor_y + params.lift, p.y),
        ));
        report.placed += 1;
    }
    report
}

/// The texture handle of every seaweed batch under `parent`, in order.
pub fn seaweed_batches(graph: &SceneGraph, parent: SceneNodeId) -> Vec<(TextureHandle, usize)> {
    graph
        .children(parent)
        .filter_map(|id| match &graph.get(id)?.content {
            NodeContent::Instances {
                shape: InstanceShape::Blade,
                texture: Some(t),
                transforms,
            } => Some((*t, transforms.len())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded;
    use crate::placement::zones::{FloorMask, NoExclusion};
    use crate::scene::flatten::InstanceKind;
    use crate::scene::layout::AquariumLayout;

    fn variants(n: u32) -> VariantSet {
        VariantSet::new((0..n).map(TextureHandle).collect())
    }

    #[test]
    fn test_tank_reef_stays_inside_tank() {
        let layout = AquariumLayout::default();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let report = scatter_tank_reef(
            &mut seeded(1),
            &TankReefParams::default(),
            &variants(4),
            layout.tank_center(),
            layout.tank_radius,
            layout.sand_y(),
            &mut graph,
            root,
        );
        assert_eq!(report.placed, 9);

        for id in graph.children(root).collect::<Vec<_>>() {
            let node = graph.get(id).unwrap();
            let p = node.local_transform.position;
            let d = Vec2::new(p.x, p.z).distance(layout.tank_center());
            assert!(d <= layout.tank_radius - 2.2 + 1e-3);
        }
    }

    #[test]
    fn test_floor_decals_respect_mask() {
        let layout = AquariumLayout::default();
        let mask = FloorMask::from_layout(&layout);
        let area = ScatterArea::Ring {
            center: Vec2::ZERO,
            radius: Span::new(layout.floor_hole().max + 25.0, 900.0),
        };
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let report = scatter_decals(
            &mut seeded(2),
            &DecoParams::big_floor(),
            &variants(9),
            area,
            &mask,
            layout.big_floor_y,
            &mut graph,
            root,
        );
        assert_eq!(report.placed, 55);
        assert!(report.attempts <= 55 * 40);

        let flat = graph.flatten();
        assert_eq!(flat.iter().filter(|f| f.is_kind(InstanceKind::Decal)).count(), 55);
        assert_eq!(flat.iter().filter(|f| f.is_kind(InstanceKind::Shadow)).count(), 55);
        for f in &flat {
            let p = f.world_matrix().transform_point3(Vec3::ZERO);
            assert!(mask.allows(Vec2::new(p.x, p.z)));
        }
    }

    #[test]
    fn test_tank_decals_skip_dead_zone() {
        let layout = AquariumLayout::default();
        let center = layout.tank_center();
        let area = ScatterArea::Disc {
            center,
            radius: layout.tank_radius - 1.6,
            dead_zone: 2.8,
        };
        let mut graph = SceneGraph::new();
        let root = graph.root();
        scatter_decals(
            &mut seeded(3),
            &DecoParams::tank(),
            &variants(2),
            area,
            &NoExclusion,
            layout.sand_y(),
            &mut graph,
            root,
        );

        for f in graph.flatten() {
            let p = f.world_matrix().transform_point3(Vec3::ZERO);
            let d = Vec2::new(p.x, p.z).distance(center);
            assert!(d >= 2.8 - 1e-3 && d <= layout.tank_radius - 1.6 + 1e-3);
        }
    }

    #[test]
    fn test_gravel_batch() {
        let layout = AquariumLayout::default();
        let mask = FloorMask::from_layout(&layout);
        let area = ScatterArea::Ring {
            center: Vec2::ZERO,
            radius: Span::new(layout.floor_hole().max + 20.0, 950.0),
        };
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let report = scatter_gravel(
            &mut seeded(4),
            &GravelParams::big_floor(),
            area,
            &mask,
            layout.big_floor_y,
            &mut graph,
            root,
        );
        assert_eq!(report.placed, 520);

        let flat = graph.flatten();
        assert_eq!(flat.len(), 520);
        for f in &flat {
            let p = f.world_matrix().transform_point3(Vec3::ZERO);
            assert!(p.y <= layout.big_floor_y + 0.02 - 0.06 + 1e-4);
            assert!(mask.allows(Vec2::new(p.x, p.z)));
        }
    }

    #[test]
    fn test_seaweed_split_per_texture() {
        let layout = AquariumLayout::default();
        let mask = FloorMask::from_layout(&layout);
        let params = SeaweedParams {
            total: 900,
            ..Default::default()
        };
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let report = scatter_seaweed(&mut seeded(5), &params, &variants(3), &mask, layout.big_floor_y, &mut graph, root);

        let batches = seaweed_batches(&graph, root);
        assert_eq!(batches.len(), 3);
        for (_, n) in &batches {
            assert!(*n <= 300);
            assert!(*n > 250, "batch too sparse: {n}");
        }
        assert_eq!(report.placed, batches.iter().map(|(_, n)| n).sum::<usize>());

        let (lo, hi) = (params.height.min, params.height.max);
        for f in graph.flatten() {
            let (scale, _, t) = f.world_matrix().to_scale_rotation_translation();
            let h = scale.y * params.base_height;
            assert!(h >= lo - 1e-3 && h <= hi + 1e-3);
            assert!(mask.allows(Vec2::new(t.x, t.z)));
        }
    }

    #[test]
    fn test_empty_variants_skip() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let report = scatter_seaweed(
            &mut seeded(6),
            &SeaweedParams::default(),
            &VariantSet::default(),
            &NoExclusion,
            0.0,
            &mut graph,
            root,
        );
        assert_eq!(report.placed, 0);
        assert_eq!(graph.node_count(), 1);
    }
}
