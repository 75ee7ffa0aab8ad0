//! Rising bubble column inside the tank.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tank::TankBounds;
use crate::math::{ScatterRng, Span};
use crate::scene::layout::AquariumLayout;

/// Bubble pool settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleParams {
    pub count: usize,
    /// Lowest height above the sand.
    pub floor_clearance: f32,
    /// Distance below the water surface where bubbles pop.
    pub surface_clearance: f32,
    /// Distance kept from the tank glass.
    pub wall_clearance: f32,
    /// Rise per tick.
    pub speed: Span,
    /// Recycled bubbles restart in `[y_min, y_min + recycle_jitter]`.
    pub recycle_jitter: f32,
    pub sway: f32,
    pub sway_rate: f32,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            count: 140,
            floor_clearance: 0.6,
            surface_clearance: 0.35,
            wall_clearance: 2.0,
            speed: Span::new(0.015, 0.05),
            recycle_jitter: 0.7,
            sway: 0.0015,
            sway_rate: 0.9,
        }
    }
}

/// Fixed pool of bubbles, one slot per particle.
pub struct BubbleField {
    params: BubbleParams,
    bounds: TankBounds,
    positions: Box<[Vec3]>,
    speeds: Box<[f32]>,
    phases: Box<[f32]>,
}

impl BubbleField {
    pub fn new<R: Rng + ?Sized>(params: BubbleParams, layout: &AquariumLayout, rng: &mut R) -> Self {
        let bounds = TankBounds::from_layout(
            layout,
            params.floor_clearance,
            params.surface_clearance,
            params.wall_clearance,
        );
        let heights = Span::new(bounds.y_min, bounds.y_max);

        let positions = (0..params.count)
            .map(|_| {
                let offset = bounds.random_offset(rng);
                bounds.world(offset, heights.sample(rng))
            })
            .collect();
        let speeds = (0..params.count).map(|_| params.speed.sample(rng)).collect();
        let phases = (0..params.count).map(|_| rng.angle()).collect();

        Self {
            params,
            bounds,
            positions,
            speeds,
            phases,
        }
    }

    /// Advance every bubble one tick at logical time `t`.
    pub fn update<R: Rng + ?Sized>(&mut self, t: f32, rng: &mut R) {
        let sway = self.params.sway;
        for i in 0..self.positions.len() {
            let mut p = self.positions[i];
            p.y += self.speeds[i];

            let ph = self.phases[i] + t * self.params.sway_rate;
            p.x += ph.sin() * sway;
            p.z += ph.cos() * sway;

            if p.y > self.bounds.y_max {
                let offset = self.bounds.random_offset(rng);
                let y = self.bounds.y_min + rng.random::<f32>() * self.params.recycle_jitter;
                p = self.bounds.world(offset, y);
                self.speeds[i] = self.params.speed.sample(rng);
                self.phases[i] = rng.angle();
            }

            self.positions[i] = p;
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as a tightly packed `xyz` byte buffer.
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
