//! Rejection-sampled placement points.
//!
//! Candidates are drawn with uniform area density either from a small centre
//! disc or from the annulus `[outer_min_radius, max_radius]`, then rejected if
//! they land in the forbidden tunnel band, in the protected zone, or too close to
//! a point already accepted. The attempt budget bounds the run; when it runs out
//! the points accepted so far are returned as they are.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{ScatterRng, Span};
use crate::scene::layout::AquariumLayout;

use super::zones::ExclusionZone;

/// An accepted position on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPoint {
    pub x: f32,
    pub z: f32,
}

impl PlacementPoint {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Lift onto the 3D scene at height `y`.
    pub fn world(&self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }

    pub fn radius(&self) -> f32 {
        self.position().length()
    }

    pub fn distance_squared(&self, other: &PlacementPoint) -> f32 {
        self.position().distance_squared(other.position())
    }
}

/// Inputs to one sampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerParams {
    /// Target number of points.
    pub count: usize,
    /// Minimum pairwise distance between accepted points.
    pub min_distance: f32,
    /// Radii where nothing may be placed (open interval).
    pub forbidden: Span,
    /// Inner radius of the main scatter annulus.
    pub outer_min_radius: f32,
    /// Outer radius of the main scatter annulus.
    pub max_radius: f32,
    /// Radius of the optional centre disc.
    pub center_radius: f32,
    /// Chance a candidate is drawn from the centre disc.
    pub center_probability: f32,
    /// Total candidate budget.
    pub max_attempts: u32,
}

impl SamplerParams {
    /// Plain disc sampling with no forbidden band and no centre bias.
    pub fn new(count: usize, min_distance: f32, max_radius: f32) -> Self {
        Self {
            count,
            min_distance,
            forbidden: Span::fixed(0.0),
            outer_min_radius: 0.0,
            max_radius,
            center_radius: 0.0,
            center_probability: 0.0,
            max_attempts: (count as u32).saturating_mul(1000).max(1000),
        }
    }

    /// Forbid a band of radii; the scatter annulus starts at its outer edge.
    pub fn with_forbidden(mut self, band: Span) -> Self {
        self.forbidden = band;
        self.outer_min_radius = band.max;
        self
    }

    pub fn with_outer_min_radius(mut self, radius: f32) -> Self {
        self.outer_min_radius = radius;
        self
    }

    pub fn with_center(mut self, radius: f32, probability: f32) -> Self {
        self.center_radius = radius;
        self.center_probability = probability;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Configured sampling run, expressed relative to the tunnel ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerProfile {
    pub count: usize,
    pub min_distance: f32,
    pub max_radius: f32,
    /// Half-width of the forbidden band around the tunnel ring. Zero disables it.
    pub tunnel_margin: f32,
    pub center_radius: f32,
    pub center_probability: f32,
    pub max_attempts: u32,
    /// Chance each accepted point is actually populated.
    pub keep_probability: f32,
}

impl Default for SamplerProfile {
    fn default() -> Self {
        Self::reef()
    }
}

impl SamplerProfile {
    /// Coral reef clusters: sparse, with a few in the middle of the ring.
    pub fn reef() -> Self {
        Self {
            count: 56,
            min_distance: 105.0,
            max_radius: 1200.0,
            tunnel_margin: 18.0,
            center_radius: 85.0,
            center_probability: 0.20,
            max_attempts: 12_000,
            keep_probability: 1.0,
        }
    }

    /// Rock clusters outside the ring.
    pub fn rock() -> Self {
        Self {
            count: 102,
            min_distance: 70.0,
            max_radius: 1350.0,
            tunnel_margin: 26.0,
            center_radius: 0.0,
            center_probability: 0.0,
            max_attempts: 60_000,
            keep_probability: 1.0,
        }
    }

    /// Second, closer rock pass; only some of its points are used.
    pub fn near_rock() -> Self {
        Self {
            count: 30,
            min_distance: 90.0,
            max_radius: 650.0,
            keep_probability: 0.6,
            ..Self::rock()
        }
    }

    pub fn to_params(&self, layout: &AquariumLayout) -> SamplerParams {
        let mut params = SamplerParams::new(self.count, self.min_distance, self.max_radius)
            .with_center(self.center_radius, self.center_probability)
            .with_max_attempts(self.max_attempts);
        if self.tunnel_margin > 0.0 {
            params = params.with_forbidden(layout.tunnel_band(self.tunnel_margin));
        }
        params
    }
}

/// Result of a sampling run.
#[derive(Clone, Debug, Default)]
pub struct SampleOutcome {
    pub points: Vec<PlacementPoint>,
    /// Candidates drawn, including the accepted ones.
    pub attempts: u32,
}

impl SampleOutcome {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Why a candidate was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    Forbidden,
    Protected,
    Crowded,
}

/// Rejection sampler over the ground plane.
pub struct PointSampler {
    params: SamplerParams,
}

impl PointSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Run the sampler. Never returns more than `count` points and never draws
    /// more than `max_attempts` candidates.
    pub fn sample<R, Z>(&self, rng: &mut R, protected: &Z) -> SampleOutcome
    where
        R: Rng + ?Sized,
        Z: ExclusionZone + ?Sized,
    {
        let p = &self.params;
        let min_dist2 = p.min_distance * p.min_distance;
        let mut points: Vec<PlacementPoint> = Vec::with_capacity(p.count);
        let mut attempts = 0u32;
        let mut rejected = [0u32; 3];

        while points.len() < p.count && attempts < p.max_attempts {
            attempts += 1;

            let candidate = self.draw(rng);
            let rejection = if p.forbidden.strictly_contains(candidate.radius()) {
                Some(Rejection::Forbidden)
            } else if protected.contains(candidate.position()) {
                Some(Rejection::Protected)
            } else if points.iter().any(|q| q.distance_squared(&candidate) < min_dist2) {
                Some(Rejection::Crowded)
            } else {
                None
            };

            match rejection {
                Some(r) => rejected[r as usize] += 1,
                None => points.push(candidate),
            }
        }

        log::debug!(
            "Sampler: {}/{} points in {} attempts (forbidden {}, protected {}, crowded {})",
            points.len(),
            p.count,
            attempts,
            rejected[Rejection::Forbidden as usize],
            rejected[Rejection::Protected as usize],
            rejected[Rejection::Crowded as usize],
        );

        SampleOutcome { points, attempts }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> PlacementPoint {
        let p = &self.params;
        let r = if rng.chance(p.center_probability) {
            rng.disc_radius(p.center_radius)
        } else {
            rng.annulus_radius(p.outer_min_radius, p.max_radius)
        };
        let a = rng.angle();
        PlacementPoint::new(a.cos() * r, a.sin() * r)
    }
}
