//! Drifting plankton specks inside the tank.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tank::TankBounds;
use crate::math::{ScatterRng, Span};
use crate::scene::layout::AquariumLayout;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanktonParams {
    pub count: usize,
    pub floor_clearance: f32,
    pub surface_clearance: f32,
    pub wall_clearance: f32,
    /// Per-tick horizontal drift, per axis.
    pub drift: Span,
    /// Per-tick upward drift.
    pub rise: Span,
    pub recycle_jitter: f32,
    pub sway: f32,
    pub sway_rate: f32,
}

impl Default for PlanktonParams {
    fn default() -> Self {
        Self {
            count: 700,
            floor_clearance: 0.35,
            surface_clearance: 0.25,
            wall_clearance: 2.05,
            drift: Span::new(-0.0022, 0.0022),
            rise: Span::new(0.0003, 0.002),
            recycle_jitter: 0.4,
            sway: 0.0008,
            sway_rate: 0.6,
        }
    }
}

/// Fixed pool of plankton with persistent per-slot velocities.
pub struct PlanktonField {
    params: PlanktonParams,
    bounds: TankBounds,
    positions: Box<[Vec3]>,
    velocities: Box<[Vec3]>,
    phases: Box<[f32]>,
}

impl PlanktonField {
    pub fn new<R: Rng + ?Sized>(params: PlanktonParams, layout: &AquariumLayout, rng: &mut R) -> Self {
        let bounds = TankBounds::from_layout(
            layout,
            params.floor_clearance,
            params.surface_clearance,
            params.wall_clearance,
        );
        let heights = Span::new(bounds.y_min, bounds.y_max);

        let mut positions = Vec::with_capacity(params.count);
        let mut velocities = Vec::with_capacity(params.count);
        let mut phases = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            let offset = bounds.random_offset(rng);
            positions.push(bounds.world(offset, heights.sample(rng)));
            velocities.push(Vec3::new(
                params.drift.sample(rng),
                params.rise.sample(rng),
                params.drift.sample(rng),
            ));
            phases.push(rng.angle());
        }

        Self {
            params,
            bounds,
            positions: positions.into_boxed_slice(),
            velocities: velocities.into_boxed_slice(),
            phases: phases.into_boxed_slice(),
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, t: f32, rng: &mut R) {
        let sway = self.params.sway;
        for i in 0..self.positions.len() {
            let v = self.velocities[i];
            let ph = self.phases[i] + t * self.params.sway_rate;
            let mut p = self.positions[i] + v;
            p.x += ph.sin() * sway;
            p.z += ph.cos() * sway;

            if p.y > self.bounds.y_max {
                let y = self.bounds.y_min + rng.random::<f32>() * self.params.recycle_jitter;
                let offset = self.bounds.random_offset(rng);
                p = self.bounds.world(offset, y);
                self.phases[i] = rng.angle();
            }

            self.positions[i] = self.bounds.clamp_radial(p);
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn bounds(&self) -> &TankBounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
