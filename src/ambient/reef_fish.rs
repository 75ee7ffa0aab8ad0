//! Small fish circling the tank reef.
//!
//! Each fish orbits the tank axis. Its radius and height oscillate around base
//! values, and its heading is computed from the orbit tangent, so the nose
//! always points along the direction of travel.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{ScatterRng, Span};
use crate::scene::layout::AquariumLayout;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReefFishParams {
    pub count: usize,
    /// Lowest base orbit radius.
    pub min_radius: f32,
    /// Radius never drops below this, keeping fish out of the reef.
    pub safe_radius: f32,
    pub wall_clearance: f32,
    pub floor_clearance: f32,
    pub ceiling_clearance: f32,
    /// Angular speed, radians per tick.
    pub speed: Span,
    pub radius_amplitude: Span,
    pub radius_frequency: Span,
    pub height_amplitude: Span,
    pub height_frequency: Span,
    pub scale: Span,
    pub max_pitch: f32,
    pub pitch_gain: f32,
}

impl Default for ReefFishParams {
    fn default() -> Self {
        Self {
            count: 30,
            min_radius: 5.9,
            safe_radius: 5.8,
            wall_clearance: 2.2,
            floor_clearance: 1.6,
            ceiling_clearance: 2.2,
            speed: Span::new(0.0045, 0.0105),
            radius_amplitude: Span::new(0.2, 0.75),
            radius_frequency: Span::new(0.45, 1.1),
            height_amplitude: Span::new(0.08, 0.28),
            height_frequency: Span::new(0.55, 1.35),
            scale: Span::new(1.55, 1.85),
            max_pitch: 0.18,
            pitch_gain: 0.015,
        }
    }
}

/// Orbit state of one fish.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReefFish {
    /// Current orbit angle.
    pub angle: f32,
    /// +1 counter-clockwise, -1 clockwise.
    pub direction: f32,
    pub speed: f32,
    pub base_radius: f32,
    pub radius_amplitude: f32,
    pub radius_frequency: f32,
    pub base_height: f32,
    pub height_amplitude: f32,
    pub height_frequency: f32,
    pub phase: f32,
    pub scale: f32,
}

/// Where a fish is and which way it faces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FishPose {
    /// Offset from the orbit centre, with absolute height in `y`.
    pub position: Vec3,
    /// Heading about +Y; forward is `(sin, 0, cos)`.
    pub heading: f32,
    /// Nose-up pitch from the vertical velocity.
    pub pitch: f32,
}

/// Safety bands applied to every orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitBands {
    pub radius: Span,
    pub height: Span,
    pub max_pitch: f32,
    pub pitch_gain: f32,
}

impl ReefFish {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, params: &ReefFishParams, bands: &OrbitBands) -> Self {
        Self {
            angle: rng.angle(),
            direction: rng.sign(),
            speed: params.speed.sample(rng),
            base_radius: rng.range(params.min_radius, bands.radius.max),
            radius_amplitude: params.radius_amplitude.sample(rng),
            radius_frequency: params.radius_frequency.sample(rng),
            base_height: bands.height.sample(rng),
            height_amplitude: params.height_amplitude.sample(rng),
            height_frequency: params.height_frequency.sample(rng),
            phase: rng.angle(),
            scale: params.scale.sample(rng),
        }
    }

    /// Advance the orbit angle by one tick.
    pub fn advance(&mut self) {
        self.angle += self.direction * self.speed;
    }

    /// Pose at logical time `t` for the current orbit angle.
    pub fn pose(&self, t: f32, bands: &OrbitBands) -> FishPose {
        let r = bands
            .radius
            .clamp(self.base_radius + (t * self.radius_frequency + self.phase).sin() * self.radius_amplitude);
        let height_arg = t * self.height_frequency + self.phase * 1.3;
        let y = bands
            .height
            .clamp(self.base_height + height_arg.sin() * self.height_amplitude);

        let (sin, cos) = self.angle.sin_cos();
        let tangent = Vec2::new(-sin * self.direction, cos * self.direction);
        let vy = height_arg.cos() * self.height_amplitude * self.height_frequency * bands.pitch_gain;

        FishPose {
            position: Vec3::new(cos * r, y, sin * r),
            heading: tangent.x.atan2(tangent.y),
            pitch: vy.clamp(-bands.max_pitch, bands.max_pitch),
        }
    }
}

/// The tank's reef fish pool.
pub struct ReefSchool {
    center: Vec2,
    bands: OrbitBands,
    fish: Box<[ReefFish]>,
    poses: Box<[FishPose]>,
}

impl ReefSchool {
    pub fn new<R: Rng + ?Sized>(params: &ReefFishParams, layout: &AquariumLayout, rng: &mut R) -> Self {
        let bands = OrbitBands {
            radius: Span::new(params.safe_radius, layout.tank_radius - params.wall_clearance),
            height: Span::new(
                layout.sand_y() + params.floor_clearance,
                layout.lobby_ceiling_y() - params.ceiling_clearance,
            ),
            max_pitch: params.max_pitch,
            pitch_gain: params.pitch_gain,
        };
        let fish: Vec<ReefFish> = (0..params.count)
            .map(|_| ReefFish::spawn(rng, params, &bands))
            .collect();
        Self::from_fish(layout.tank_center(), bands, fish)
    }

    /// School with explicit orbits.
    pub fn from_fish(center: Vec2, bands: OrbitBands, fish: Vec<ReefFish>) -> Self {
        let poses = fish.iter().map(|f| f.pose(0.0, &bands)).collect();
        Self {
            center,
            bands,
            fish: fish.into_boxed_slice(),
            poses,
        }
    }

    pub fn update(&mut self, t: f32) {
        for (fish, pose) in self.fish.iter_mut().zip(self.poses.iter_mut()) {
            fish.advance();
            *pose = fish.pose(t, &self.bands);
        }
    }

    pub fn clear(&mut self) {
        self.fish = Box::default();
        self.poses = Box::default();
    }

    /// Local poses, relative to [`center`](Self::center).
    pub fn poses(&self) -> &[FishPose] {
        &self.poses
    }

    pub fn fish(&self) -> &[ReefFish] {
        &self.fish
    }

    /// World position of fish `i`.
    pub fn world_position(&self, i: usize) -> Option<Vec3> {
        self.poses
            .get(i)
            .map(|p| p.position + Vec3::new(self.center.x, 0.0, self.center.y))
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn bands(&self) -> &OrbitBands {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded;

    fn circular(direction: f32) -> (ReefFish, OrbitBands) {
        let fish = ReefFish {
            angle: 0.3,
            direction,
            speed: 0.01,
            base_radius: 50.0,
            radius_amplitude: 0.0,
            radius_frequency: 0.8,
            base_height: 2.0,
            height_amplitude: 0.0,
            height_frequency: 0.9,
            phase: 1.1,
            scale: 1.0,
        };
        let bands = OrbitBands {
            radius: Span::new(0.0, 100.0),
            height: Span::new(-10.0, 10.0),
            max_pitch: 0.18,
            pitch_gain: 0.015,
        };
        (fish, bands)
    }

    #[test]
    fn test_zero_amplitude_orbit_is_circular() {
        for direction in [1.0, -1.0] {
            let (mut fish, bands) = circular(direction);
            let mut t = 0.0;
            let mut prev = fish.pose(t, &bands);
            for _ in 0..500 {
                t += 0.016;
                fish.advance();
                let pose = fish.pose(t, &bands);

                let horizontal = Vec2::new(pose.position.x, pose.position.z);
                assert!((horizontal.length() - 50.0).abs() < 1e-3);
                assert_eq!(pose.position.y, 2.0);
                assert_eq!(pose.pitch, 0.0);

                // Heading matches the analytic tangent.
                let (sin, cos) = fish.angle.sin_cos();
                let tangent = Vec2::new(-sin, cos) * direction;
                let facing = Vec2::new(pose.heading.sin(), pose.heading.cos());
                assert!((facing - tangent).length() < 1e-4);

                // And points the way the fish actually moved.
                let step = Vec2::new(
                    pose.position.x - prev.position.x,
                    pose.position.z - prev.position.z,
                )
                .normalize();
                assert!(step.dot(facing) > 0.999);
                prev = pose;
            }
        }
    }

    #[test]
    fn test_orbit_clamped_to_bands() {
        let (mut fish, mut bands) = circular(1.0);
        fish.radius_amplitude = 30.0;
        fish.height_amplitude = 30.0;
        bands.radius = Span::new(45.0, 55.0);
        bands.height = Span::new(0.0, 4.0);
        let mut t = 0.0;
        for _ in 0..400 {
            t += 0.016;
            fish.advance();
            let pose = fish.pose(t, &bands);
            let r = Vec2::new(pose.position.x, pose.position.z).length();
            assert!(r >= 45.0 - 1e-3 && r <= 55.0 + 1e-3);
            assert!(pose.position.y >= 0.0 && pose.position.y <= 4.0);
            assert!(pose.pitch.abs() <= 0.18);
        }
    }

    #[test]
    fn test_school_stays_in_tank() {
        let layout = AquariumLayout::default();
        let mut rng = seeded(8);
        let mut school = ReefSchool::new(&ReefFishParams::default(), &layout, &mut rng);
        assert_eq!(school.len(), 30);
        let mut t = 0.0;
        for _ in 0..300 {
            t += 0.016;
            school.update(t);
        }
        for i in 0..school.len() {
            let p = school.world_position(i).unwrap();
            let r = Vec2::new(p.x, p.z).distance(layout.tank_center());
            assert!(r >= 5.8 - 1e-3 && r <= 10.3 + 1e-3);
            assert!(p.y >= -2.6 - 1e-3 && p.y <= 7.8 + 1e-3);
        }
    }
}
