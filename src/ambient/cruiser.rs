//! Open-water swimmers: sharks, schooling fish and rays.
//!
//! Every cruiser swims forward along its heading. The heading wanders with a
//! Perlin drift, and once the cruiser is beyond the boundary radius it is
//! blended back toward the origin a fraction per tick.

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::undulation::{BodyWave, SegmentPose};
use crate::math::{normalize_angle, shortest_delta, ScatterRng, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CruiserKind {
    Shark,
    OpenWaterFish,
    Ray,
}

impl CruiserKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shark => "shark",
            Self::OpenWaterFish => "open_water_fish",
            Self::Ray => "ray",
        }
    }
}

/// How the forward speed changes over time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gait {
    /// Constant speed.
    Steady,
    /// Tail-beat bursts; also drives the tail amplitude.
    Pulse,
    /// Slow swell between gliding and flapping.
    Glide,
}

impl Gait {
    /// Returns `(speed factor, body wave gain)` at time `t`.
    pub fn factors(&self, t: f32, index: f32, phase: f32) -> (f32, f32) {
        match self {
            Self::Steady => (1.0, 1.0),
            Self::Pulse => {
                let pulse = ((t + index) * 3.0).sin().max(0.2);
                ((1.2 + pulse * 0.6) * 1.4, 1.0 + pulse * 0.5)
            }
            Self::Glide => ((1.2 + (t * 0.4 + phase).sin() * 1.3).max(0.0), 1.0),
        }
    }
}

/// Weighted size class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    pub weight: f32,
    pub size: Span,
    /// Cruising depth for this class.
    pub height: Span,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CruiserParams {
    pub count: usize,
    pub tiers: Vec<SizeTier>,
    /// Distance per tick.
    pub speed: Span,
    pub gait: Gait,
    /// Spawn inside the square `[-extent, extent]²`.
    pub spawn_extent: f32,
    /// Horizontal radius where the turn-back starts.
    pub boundary: f32,
    /// Fraction of the remaining turn applied per tick past the boundary.
    pub blend: f32,
    /// Peak heading change per tick from drift.
    pub drift_amplitude: f32,
    /// Drift noise sampling rate.
    pub drift_rate: f32,
    pub bob_amplitude: Span,
    pub bob_frequency: Span,
    pub flap_amplitude: Span,
    pub flap_frequency: Span,
    pub roll_amplitude: f32,
    pub wave: BodyWave,
}

/// Missing fields fall back to the shark preset. [`AmbientConfig`](super::AmbientConfig)
/// fills each pool from its own preset instead.
impl Default for CruiserParams {
    fn default() -> Self {
        Self::sharks()
    }
}

impl CruiserParams {
    pub fn sharks() -> Self {
        Self {
            count: 13,
            tiers: vec![
                SizeTier {
                    weight: 0.3,
                    size: Span::new(4.5, 5.7),
                    height: Span::new(15.0, 25.0),
                },
                SizeTier {
                    weight: 0.4,
                    size: Span::new(3.0, 4.0),
                    height: Span::new(30.0, 45.0),
                },
                SizeTier {
                    weight: 0.3,
                    size: Span::new(2.0, 2.8),
                    height: Span::new(45.0, 60.0),
                },
            ],
            speed: Span::fixed(1.8),
            gait: Gait::Steady,
            spawn_extent: 600.0,
            boundary: 1400.0,
            blend: 0.05,
            drift_amplitude: 0.008,
            drift_rate: 0.4,
            bob_amplitude: Span::fixed(0.0),
            bob_frequency: Span::fixed(0.0),
            flap_amplitude: Span::fixed(0.0),
            flap_frequency: Span::fixed(0.0),
            roll_amplitude: 0.0,
            wave: BodyWave::shark(),
        }
    }

    pub fn open_water_fish() -> Self {
        let height = Span::new(20.0, 65.0);
        Self {
            count: 80,
            tiers: vec![
                SizeTier {
                    weight: 0.3,
                    size: Span::new(1.5, 1.9),
                    height,
                },
                SizeTier {
                    weight: 0.4,
                    size: Span::new(2.3, 2.9),
                    height,
                },
                SizeTier {
                    weight: 0.3,
                    size: Span::new(3.2, 3.7),
                    height,
                },
            ],
            speed: Span::new(0.6, 1.0),
            gait: Gait::Pulse,
            spawn_extent: 600.0,
            boundary: 800.0,
            blend: 0.03,
            drift_amplitude: 0.005,
            drift_rate: 0.3,
            bob_amplitude: Span::fixed(0.0),
            bob_frequency: Span::fixed(0.0),
            flap_amplitude: Span::fixed(0.0),
            flap_frequency: Span::fixed(0.0),
            roll_amplitude: 0.0,
            wave: BodyWave::tail(),
        }
    }

    pub fn rays() -> Self {
        let height = Span::new(12.0, 52.0);
        Self {
            count: 12,
            tiers: vec![
                SizeTier {
                    weight: 0.25,
                    size: Span::new(3.5, 4.0),
                    height,
                },
                SizeTier {
                    weight: 0.4,
                    size: Span::new(2.2, 2.6),
                    height,
                },
                SizeTier {
                    weight: 0.35,
                    size: Span::new(1.3, 1.5),
                    height,
                },
            ],
            speed: Span::new(0.12, 0.35),
            gait: Gait::Glide,
            spawn_extent: 160.0,
            boundary: 220.0,
            blend: 0.02,
            drift_amplitude: 0.006,
            drift_rate: 0.25,
            bob_amplitude: Span::new(4.0, 10.0),
            bob_frequency: Span::new(0.3, 0.8),
            flap_amplitude: Span::new(0.15, 0.3),
            flap_frequency: Span::new(0.8, 1.6),
            roll_amplitude: 0.95,
            wave: BodyWave::rigid(),
        }
    }

    /// Weighted tier choice. Falls back to the last tier on rounding.
    fn pick_tier<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SizeTier> {
        let total: f32 = self.tiers.iter().map(|t| t.weight).sum();
        let mut roll = rng.random::<f32>() * total;
        for tier in &self.tiers {
            if roll < tier.weight {
                return Some(tier);
            }
            roll -= tier.weight;
        }
        self.tiers.last()
    }
}

/// Deserialize a possibly partial `CruiserParams` on top of `preset`.
pub(crate) fn overlay<'de, D>(preset: CruiserParams, deserializer: D) -> Result<CruiserParams, D::Error>
where
    D: Deserializer<'de>,
{
    let patch = serde_json::Value::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(&preset).map_err(D::Error::custom)?;
    merge_json(&mut merged, patch);
    serde_json::from_value(merged).map_err(D::Error::custom)
}

fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// One open-water swimmer.
#[derive(Clone, Debug)]
pub struct Cruiser {
    pub position: Vec3,
    /// Heading about +Y; forward is `(sin, 0, cos)`.
    pub heading: f32,
    pub speed: f32,
    pub size: f32,
    pub base_height: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub flap_amplitude: f32,
    pub flap_frequency: f32,
    pub phase: f32,
    /// Whole-body pitch (ray wing beat).
    pub pitch: f32,
    pub roll: f32,
    pub segments: Box<[SegmentPose]>,
}

impl Cruiser {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, params: &CruiserParams) -> Self {
        let (size, height) = match params.pick_tier(rng) {
            Some(tier) => (tier.size.sample(rng), tier.height.sample(rng)),
            None => (1.0, 0.0),
        };
        let extent = params.spawn_extent;
        Self {
            position: Vec3::new(rng.range(-extent, extent), height, rng.range(-extent, extent)),
            heading: normalize_angle(rng.angle()),
            speed: params.speed.sample(rng),
            size,
            base_height: height,
            bob_amplitude: params.bob_amplitude.sample(rng),
            bob_frequency: params.bob_frequency.sample(rng),
            flap_amplitude: params.flap_amplitude.sample(rng),
            flap_frequency: params.flap_frequency.sample(rng),
            phase: rng.angle(),
            pitch: 0.0,
            roll: 0.0,
            segments: vec![SegmentPose::default(); params.wave.segments].into_boxed_slice(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Heading that points from `position` at the origin.
    pub fn origin_heading(&self) -> f32 {
        (-self.position.x).atan2(-self.position.z)
    }

    pub fn horizontal_distance(&self) -> f32 {
        Vec2::new(self.position.x, self.position.z).length()
    }
}

/// A fixed pool of cruisers of one kind.
pub struct CruiserPool {
    kind: CruiserKind,
    params: CruiserParams,
    cruisers: Box<[Cruiser]>,
}

impl CruiserPool {
    pub fn new<R: Rng + ?Sized>(kind: CruiserKind, params: CruiserParams, rng: &mut R) -> Self {
        let cruisers = (0..params.count).map(|_| Cruiser::spawn(rng, &params)).collect();
        Self {
            kind,
            params,
            cruisers,
        }
    }

    /// Advance every cruiser one tick at logical time `t`.
    pub fn update(&mut self, t: f32, noise: &Perlin) {
        let params = &self.params;
        let lane = self.kind as usize as f64 * 97.0;
        for (i, c) in self.cruisers.iter_mut().enumerate() {
            let index = i as f32;
            let (speed_factor, gain) = params.gait.factors(t, index, c.phase);

            let step = c.forward() * c.speed * speed_factor;
            c.position.x += step.x;
            c.position.z += step.z;

            let drift = noise.get([(t * params.drift_rate) as f64, lane + index as f64 * 1.37 + 0.5]) as f32;
            c.heading += drift * params.drift_amplitude;

            if c.horizontal_distance() > params.boundary {
                c.heading += shortest_delta(c.heading, c.origin_heading()) * params.blend;
            }
            c.heading = normalize_angle(c.heading);

            c.position.y = c.base_height + (t * c.bob_frequency + index).sin() * c.bob_amplitude;
            c.pitch = (t * c.flap_frequency + c.phase).sin() * c.flap_amplitude;
            c.roll = (t * 0.6 + index).sin() * params.roll_amplitude;

            params.wave.fill(t, index, gain, &mut c.segments);
        }
    }

    /// Drop every cruiser. Used when the kind has nothing to render.
    pub fn clear(&mut self) {
        self.cruisers = Box::default();
    }

    pub fn kind(&self) -> CruiserKind {
        self.kind
    }

    pub fn params(&self) -> &CruiserParams {
        &self.params
    }

    pub fn cruisers(&self) -> &[Cruiser] {
        &self.cruisers
    }

    pub fn len(&self) -> usize {
        self.cruisers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cruisers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded;

    fn calm(mut params: CruiserParams) -> CruiserParams {
        params.drift_amplitude = 0.0;
        params
    }

    #[test]
    fn test_spawn_respects_tiers() {
        let mut rng = seeded(10);
        let pool = CruiserPool::new(CruiserKind::Shark, CruiserParams::sharks(), &mut rng);
        assert_eq!(pool.len(), 13);
        for c in pool.cruisers() {
            assert!(c.size >= 2.0 && c.size <= 5.7);
            assert!(c.position.y >= 15.0 && c.position.y <= 60.0);
            assert!(c.position.x.abs() <= 600.0 && c.position.z.abs() <= 600.0);
            assert_eq!(c.segments.len(), 15);
        }
    }

    #[test]
    fn test_straight_line_inside_boundary() {
        let mut rng = seeded(11);
        let mut pool = CruiserPool::new(CruiserKind::Shark, calm(CruiserParams::sharks()), &mut rng);
        pool.cruisers[0].position = Vec3::new(0.0, 20.0, 0.0);
        pool.cruisers[0].base_height = 20.0;
        pool.cruisers[0].heading = 0.0;
        let noise = Perlin::new(1);
        pool.update(0.016, &noise);
        let c = &pool.cruisers()[0];
        assert_eq!(c.heading, 0.0);
        assert!((c.position - Vec3::new(0.0, 20.0, 1.8)).length() < 1e-4);
    }

    #[test]
    fn test_turns_back_beyond_boundary() {
        let mut rng = seeded(12);
        let mut pool = CruiserPool::new(CruiserKind::Shark, calm(CruiserParams::sharks()), &mut rng);
        // Heading straight out along +x.
        pool.cruisers[0].position = Vec3::new(1500.0, 20.0, 0.0);
        pool.cruisers[0].heading = std::f32::consts::FRAC_PI_2;
        let noise = Perlin::new(1);

        let start_error = shortest_delta(pool.cruisers[0].heading, pool.cruisers[0].origin_heading()).abs();
        pool.update(0.016, &noise);
        let c = &pool.cruisers()[0];
        let error = shortest_delta(c.heading, c.origin_heading()).abs();
        // Soft blend, not a snap.
        assert!(error < start_error);
        assert!(error > 0.5);

        let mut t = 0.016;
        for _ in 0..400 {
            t += 0.016;
            pool.update(t, &noise);
        }
        assert!(pool.cruisers()[0].horizontal_distance() < 1500.0);
    }

    #[test]
    fn test_drift_is_bounded() {
        let mut rng = seeded(13);
        let mut pool = CruiserPool::new(CruiserKind::OpenWaterFish, CruiserParams::open_water_fish(), &mut rng);
        let noise = Perlin::new(13);
        let mut t = 0.0;
        for _ in 0..50 {
            let before: Vec<f32> = pool.cruisers().iter().map(|c| c.heading).collect();
            t += 0.016;
            pool.update(t, &noise);
            for (c, h) in pool.cruisers().iter().zip(before) {
                if c.horizontal_distance() <= 800.0 {
                    assert!(shortest_delta(h, c.heading).abs() <= 0.005 * 1.5);
                }
            }
        }
    }

    #[test]
    fn test_ray_bob_and_glide() {
        let mut rng = seeded(14);
        let mut pool = CruiserPool::new(CruiserKind::Ray, CruiserParams::rays(), &mut rng);
        let noise = Perlin::new(14);
        let mut t = 0.0;
        for _ in 0..200 {
            t += 0.016;
            pool.update(t, &noise);
            for c in pool.cruisers() {
                assert!((c.position.y - c.base_height).abs() <= c.bob_amplitude + 1e-3);
                assert!(c.pitch.abs() <= c.flap_amplitude + 1e-6);
                assert!(c.roll.abs() <= 0.95 + 1e-6);
            }
        }
        assert!(pool.cruisers().iter().all(|c| c.segments.is_empty()));
    }

    #[test]
    fn test_gait_factors() {
        assert_eq!(Gait::Steady.factors(3.0, 1.0, 0.0), (1.0, 1.0));
        let (speed, gain) = Gait::Pulse.factors(0.0, 0.0, 0.0);
        assert!((speed - (1.2 + 0.2 * 0.6) * 1.4).abs() < 1e-5);
        assert!((gain - 1.1).abs() < 1e-5);
        for i in 0..100 {
            assert!(Gait::Glide.factors(i as f32 * 0.3, 0.0, 1.0).0 >= 0.0);
        }
    }
}
