//! Decorative clusters built from bouquets.
//!
//! A bouquet is a set of same-texture quads fanned about a shared vertical axis,
//! which reads as a solid coral head or rock from any direction. A cluster puts
//! one to three bouquets around a placement point.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::{TextureHandle, VariantSet};
use crate::math::{ScatterRng, Span};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{DecorLayer, LocalTransform, NodeContent, SceneNodeId};

use super::sampler::PlacementPoint;

/// Ranges a single bouquet is drawn from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BouquetProfile {
    pub scale: Span,
    /// Unscaled quad width.
    pub width: Span,
    /// Unscaled quad height.
    pub height: Span,
    /// How far the bouquet sinks below the floor reference.
    pub sink: Span,
    /// Number of fan planes (rounded).
    pub planes: Span,
    /// Random offset added to each plane's even yaw spacing.
    pub plane_yaw_jitter: f32,
    /// Random pitch and roll per plane.
    pub plane_tilt_jitter: f32,
    /// Random pitch and roll of the whole bouquet.
    pub group_tilt_jitter: f32,
}

impl Default for BouquetProfile {
    fn default() -> Self {
        Self::reef()
    }
}

impl BouquetProfile {
    pub fn reef() -> Self {
        Self {
            scale: Span::new(0.85, 1.85),
            width: Span::new(10.0, 22.0),
            height: Span::new(8.0, 18.0),
            sink: Span::new(2.6, 5.2),
            planes: Span::new(10.0, 14.0),
            plane_yaw_jitter: 0.0,
            plane_tilt_jitter: 0.0,
            group_tilt_jitter: 0.0,
        }
    }

    pub fn rock() -> Self {
        Self {
            scale: Span::new(0.8, 1.2),
            width: Span::new(15.0, 35.0),
            height: Span::new(13.0, 24.0),
            sink: Span::new(2.0, 3.2),
            planes: Span::new(7.0, 11.0),
            plane_yaw_jitter: 0.22,
            plane_tilt_jitter: 0.10,
            group_tilt_jitter: 0.06,
        }
    }

    /// Small coral heads on the tank sand.
    pub fn tank_reef() -> Self {
        Self {
            scale: Span::new(0.9, 1.35),
            width: Span::new(2.6, 4.6),
            height: Span::new(2.4, 4.2),
            sink: Span::new(0.8, 1.6),
            planes: Span::new(8.0, 12.0),
            plane_yaw_jitter: 0.0,
            plane_tilt_jitter: 0.0,
            group_tilt_jitter: 0.0,
        }
    }
}

/// Ground shadow under each element of a cluster.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShadowProfile {
    /// Shadow radius as a fraction of the scaled bouquet width.
    pub size_factor: f32,
    pub opacity: f32,
    /// Height above the floor reference.
    pub lift: f32,
}

impl Default for ShadowProfile {
    fn default() -> Self {
        Self {
            size_factor: 0.45,
            opacity: 0.24,
            lift: 0.01,
        }
    }
}

/// Everything the placer draws a cluster from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterProfile {
    /// Chance of a three-element cluster.
    pub triple_chance: f32,
    /// Chance of two elements, given the cluster is not a triple.
    pub double_chance: f32,
    /// Half-size of the square each element is jittered within.
    pub jitter: f32,
    /// Spin the whole cluster about its anchor.
    pub rotate_cluster: bool,
    pub bouquet: BouquetProfile,
    pub shadow: Option<ShadowProfile>,
}

impl Default for ClusterProfile {
    fn default() -> Self {
        Self::reef()
    }
}

impl ClusterProfile {
    pub fn reef() -> Self {
        Self {
            triple_chance: 0.18,
            double_chance: 0.62,
            jitter: 4.0,
            rotate_cluster: true,
            bouquet: BouquetProfile::reef(),
            shadow: None,
        }
    }

    pub fn rock() -> Self {
        Self {
            triple_chance: 0.12,
            double_chance: 0.55,
            jitter: 8.0,
            rotate_cluster: false,
            bouquet: BouquetProfile::rock(),
            shadow: Some(ShadowProfile::default()),
        }
    }

    /// Weighted draw of the element count: 3, 2 or 1.
    pub fn sample_size<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if rng.chance(self.triple_chance) {
            3
        } else if rng.chance(self.double_chance) {
            2
        } else {
            1
        }
    }
}

/// Orientation of one quad in a bouquet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanPlane {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl FanPlane {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll)
    }
}

/// A fan of quads sharing one texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Bouquet {
    pub variant: TextureHandle,
    pub scale: f32,
    pub width: f32,
    pub height: f32,
    pub sink: f32,
    /// Height of the quad centres.
    pub center_y: f32,
    /// Pitch and roll of the whole fan.
    pub tilt: Vec2,
    pub planes: Vec<FanPlane>,
}

impl Bouquet {
    /// Draw a bouquet resting on `floor_y`.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        profile: &BouquetProfile,
        variant: TextureHandle,
        floor_y: f32,
    ) -> Self {
        let scale = profile.scale.sample(rng);
        let width = profile.width.sample(rng);
        let height = profile.height.sample(rng);
        let sink = profile.sink.sample(rng);
        let count = profile.planes.sample_count(rng);

        let planes = (0..count)
            .map(|i| FanPlane {
                yaw: i as f32 / count as f32 * TAU
                    + rng.range(-profile.plane_yaw_jitter, profile.plane_yaw_jitter),
                pitch: rng.range(-profile.plane_tilt_jitter, profile.plane_tilt_jitter),
                roll: rng.range(-profile.plane_tilt_jitter, profile.plane_tilt_jitter),
            })
            .collect();

        let tilt = Vec2::new(
            rng.range(-profile.group_tilt_jitter, profile.group_tilt_jitter),
            rng.range(-profile.group_tilt_jitter, profile.group_tilt_jitter),
        );

        Self {
            variant,
            scale,
            width,
            height,
            sink,
            center_y: floor_y + height * scale / 2.0 - sink,
            tilt,
            planes,
        }
    }

    /// World size of each quad.
    pub fn quad_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * self.scale
    }

    /// Add the bouquet under `parent` with the given local transform.
    pub fn attach(
        &self,
        graph: &mut SceneGraph,
        parent: SceneNodeId,
        layer: DecorLayer,
        transform: LocalTransform,
    ) -> SceneNodeId {
        let group = graph.add_child_at(parent, "bouquet", layer, NodeContent::Group, transform);
        let content = NodeContent::Billboard {
            texture: self.variant,
            size: self.quad_size(),
        };
        for plane in &self.planes {
            graph.add_child_at(
                group,
                "plane",
                layer,
                content.clone(),
                LocalTransform::from_position(Vec3::new(0.0, self.center_y, 0.0))
                    .with_rotation(plane.rotation()),
            );
        }
        group
    }
}

/// Flat dark disc under an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowDecal {
    pub radius: f32,
    pub opacity: f32,
    pub y: f32,
}

/// One bouquet in a cluster plus its placement relative to the anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorativeElement {
    pub bouquet: Bouquet,
    /// Local (x, z) jitter from the anchor.
    pub offset: Vec2,
    /// Rotation about +Y.
    pub yaw: f32,
    pub shadow: Option<ShadowDecal>,
}

impl DecorativeElement {
    fn transform(&self) -> LocalTransform {
        let b = &self.bouquet;
        LocalTransform::from_position(Vec3::new(self.offset.x, 0.0, self.offset.y))
            .with_rotation(Quat::from_euler(EulerRot::XYZ, b.tilt.x, self.yaw, b.tilt.y))
    }
}

/// An anchor with one to three elements. Never changes once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub anchor: PlacementPoint,
    pub yaw: f32,
    pub elements: Vec<DecorativeElement>,
}

impl Cluster {
    /// Add the cluster's nodes to the graph. Returns the cluster group.
    pub fn attach(&self, graph: &mut SceneGraph, parent: SceneNodeId, layer: DecorLayer) -> SceneNodeId {
        let group = graph.add_child_at(
            parent,
            "cluster",
            layer,
            NodeContent::Group,
            LocalTransform::from_position(self.anchor.world(0.0)).with_yaw(self.yaw),
        );

        for element in &self.elements {
            element.bouquet.attach(graph, group, layer, element.transform());

            if let Some(shadow) = element.shadow {
                graph.add_child_at(
                    group,
                    "shadow",
                    layer,
                    NodeContent::Shadow {
                        radius: shadow.radius,
                        opacity: shadow.opacity,
                    },
                    LocalTransform::from_position(Vec3::new(element.offset.x, shadow.y, element.offset.y)),
                );
            }
        }
        group
    }
}

/// Turns placement points into clusters.
pub struct ClusterPlacer<'a> {
    profile: &'a ClusterProfile,
    variants: &'a VariantSet,
    floor_y: f32,
}

impl<'a> ClusterPlacer<'a> {
    pub fn new(profile: &'a ClusterProfile, variants: &'a VariantSet, floor_y: f32) -> Self {
        Self {
            profile,
            variants,
            floor_y,
        }
    }

    /// Draw a cluster at `anchor`. `None` when there are no variants to pick from.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R, anchor: PlacementPoint) -> Option<Cluster> {
        if self.variants.is_empty() {
            return None;
        }

        let size = self.profile.sample_size(rng);
        let mut elements = Vec::with_capacity(size);
        for _ in 0..size {
            let variant = *rng.pick(self.variants.handles())?;
            let bouquet = Bouquet::sample(rng, &self.profile.bouquet, variant, self.floor_y);
            let yaw = rng.angle();
            let j = self.profile.jitter;
            let offset = Vec2::new(rng.range(-j, j), rng.range(-j, j));
            let shadow = self.profile.shadow.as_ref().map(|s| ShadowDecal {
                radius: bouquet.width * bouquet.scale * s.size_factor,
                opacity: s.opacity,
                y: self.floor_y + s.lift,
            });
            elements.push(DecorativeElement {
                bouquet,
                offset,
                yaw,
                shadow,
            });
        }

        let yaw = if self.profile.rotate_cluster { rng.angle() } else { 0.0 };
        Some(Cluster {
            anchor,
            yaw,
            elements,
        })
    }

    /// Build a cluster and add it to the graph.
    ///
    /// With no variants this logs a warning and changes nothing.
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        anchor: PlacementPoint,
        graph: &mut SceneGraph,
        parent: SceneNodeId,
        layer: DecorLayer,
    ) -> Option<Cluster> {
        let Some(cluster) = self.build(rng, anchor) else {
            log::warn!("No {} textures available, skipping cluster", layer.name());
            return None;
        };
        cluster.attach(graph, parent, layer);
        Some(cluster)
    }

    /// Place a cluster at each point, keeping each with `keep_probability`.
    /// Returns the number of clusters added.
    pub fn place_all<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        points: &[PlacementPoint],
        keep_probability: f32,
        graph: &mut SceneGraph,
        parent: SceneNodeId,
        layer: DecorLayer,
    ) -> usize {
        if self.variants.is_empty() {
            log::warn!(
                "No {} textures available, skipping {} clusters",
                layer.name(),
                points.len()
            );
            return 0;
        }

        let mut placed = 0;
        for &point in points {
            if keep_probability < 1.0 && !rng.chance(keep_probability) {
                continue;
            }
            if self.place(rng, point, graph, parent, layer).is_some() {
                placed += 1;
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded;
    use crate::scene::flatten::InstanceKind;

    fn variants(n: u32) -> VariantSet {
        VariantSet::new((0..n).map(TextureHandle).collect())
    }

    #[test]
    fn test_cluster_size_weights() {
        let profile = ClusterProfile::reef();
        let mut rng = seeded(21);
        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            counts[profile.sample_size(&mut rng)] += 1;
        }
        assert_eq!(counts[0], 0);
        // P(3) = 0.18, P(2) = 0.82 * 0.62 = 0.508, P(1) = 0.312
        assert!((counts[3] as f32 / 10_000.0 - 0.18).abs() < 0.03);
        assert!((counts[2] as f32 / 10_000.0 - 0.508).abs() < 0.03);
        assert!((counts[1] as f32 / 10_000.0 - 0.312).abs() < 0.03);
    }

    #[test]
    fn test_bouquet_within_profile() {
        let profile = BouquetProfile::rock();
        let mut rng = seeded(4);
        for _ in 0..200 {
            let b = Bouquet::sample(&mut rng, &profile, TextureHandle(0), -5.12);
            assert!((7..=11).contains(&b.planes.len()));
            assert!(b.scale >= 0.8 && b.scale <= 1.2);
            assert!(b.sink >= 2.0 && b.sink <= 3.2);
            assert!((b.center_y - (-5.12 + b.height * b.scale / 2.0 - b.sink)).abs() < 1e-4);
            assert!(b.tilt.x.abs() <= 0.06 && b.tilt.y.abs() <= 0.06);
            for p in &b.planes {
                assert!(p.pitch.abs() <= 0.10 && p.roll.abs() <= 0.10);
            }
        }
    }

    #[test]
    fn test_reef_planes_evenly_fanned() {
        let b = Bouquet::sample(&mut seeded(8), &BouquetProfile::reef(), TextureHandle(1), 0.0);
        let n = b.planes.len() as f32;
        for (i, p) in b.planes.iter().enumerate() {
            assert!((p.yaw - i as f32 / n * TAU).abs() < 1e-5);
            assert_eq!((p.pitch, p.roll), (0.0, 0.0));
        }
    }

    #[test]
    fn test_build_uses_variants_and_jitter() {
        let profile = ClusterProfile::rock();
        let set = variants(3);
        let placer = ClusterPlacer::new(&profile, &set, -5.12);
        let mut rng = seeded(13);
        for _ in 0..100 {
            let cluster = placer.build(&mut rng, PlacementPoint::new(300.0, -40.0)).unwrap();
            assert!((1..=3).contains(&cluster.elements.len()));
            assert_eq!(cluster.yaw, 0.0);
            for e in &cluster.elements {
                assert!(e.bouquet.variant.0 < 3);
                assert!(e.offset.x.abs() <= 8.0 && e.offset.y.abs() <= 8.0);
                let shadow = e.shadow.unwrap();
                assert!((shadow.radius - e.bouquet.width * e.bouquet.scale * 0.45).abs() < 1e-4);
                assert!((shadow.y - (-5.11)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_empty_variants_is_noop() {
        let profile = ClusterProfile::reef();
        let set = VariantSet::default();
        let placer = ClusterPlacer::new(&profile, &set, -5.12);
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let placed = placer.place_all(
            &mut seeded(1),
            &[PlacementPoint::new(500.0, 0.0)],
            1.0,
            &mut graph,
            root,
            DecorLayer::Reef,
        );
        assert_eq!(placed, 0);
        assert_eq!(graph.node_count(), 1);
        assert!(placer.build(&mut seeded(1), PlacementPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_attach_emits_planes_and_shadows() {
        let profile = ClusterProfile::rock();
        let set = variants(2);
        let placer = ClusterPlacer::new(&profile, &set, -5.12);
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let cluster = placer
            .place(&mut seeded(2), PlacementPoint::new(400.0, 250.0), &mut graph, root, DecorLayer::Rock)
            .unwrap();

        let expected_planes: usize = cluster.elements.iter().map(|e| e.bouquet.planes.len()).sum();
        let flat = graph.flatten();
        let planes = flat.iter().filter(|f| f.is_kind(InstanceKind::Billboard)).count();
        let shadows = flat.iter().filter(|f| f.is_kind(InstanceKind::Shadow)).count();
        assert_eq!(planes, expected_planes);
        assert_eq!(shadows, cluster.elements.len());

        // Every quad sits near the anchor.
        for f in &flat {
            let p = f.world_matrix().transform_point3(Vec3::ZERO);
            assert!(Vec2::new(p.x - 400.0, p.z - 250.0).length() < 14.0);
        }
    }

    #[test]
    fn test_keep_probability_thins_points() {
        let profile = ClusterProfile::rock();
        let set = variants(1);
        let placer = ClusterPlacer::new(&profile, &set, -5.12);
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let points: Vec<_> = (0..400).map(|i| PlacementPoint::new(i as f32 * 10.0, 900.0)).collect();

        let placed = placer.place_all(&mut seeded(6), &points, 0.6, &mut graph, root, DecorLayer::Rock);
        assert!(placed > 200 && placed < 280, "placed {placed}");
    }
}
