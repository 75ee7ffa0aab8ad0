//! Swimmable volume inside the lobby tank.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::math::ScatterRng;
use crate::scene::layout::AquariumLayout;

/// Vertical cylinder that tank particles and reef fish stay inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankBounds {
    /// Ground-plane axis of the tank.
    pub center: Vec2,
    pub y_min: f32,
    pub y_max: f32,
    pub r_max: f32,
}

impl TankBounds {
    /// Bounds shrunk from the sand, the water surface and the glass by the
    /// given clearances.
    pub fn from_layout(layout: &AquariumLayout, floor: f32, surface: f32, wall: f32) -> Self {
        Self {
            center: layout.tank_center(),
            y_min: layout.sand_y() + floor,
            y_max: layout.water_top_y() - surface,
            r_max: layout.tank_radius - wall,
        }
    }

    /// Horizontal offset of `p` from the tank axis.
    pub fn radial(&self, p: Vec3) -> Vec2 {
        Vec2::new(p.x - self.center.x, p.z - self.center.y)
    }

    /// World position from a tank-local horizontal offset and a height.
    pub fn world(&self, offset: Vec2, y: f32) -> Vec3 {
        Vec3::new(self.center.x + offset.x, y, self.center.y + offset.y)
    }

    /// Uniform-area offset inside the radial bound.
    pub fn random_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        rng.point_in_disc(self.r_max)
    }

    /// Projects `p` back onto the boundary circle if it drifted past it.
    pub fn clamp_radial(&self, p: Vec3) -> Vec3 {
        let offset = self.radial(p);
        let r = offset.length();
        if r <= self.r_max {
            return p;
        }
        let n = offset / (r + 1e-6);
        self.world(n * self.r_max, p.y)
    }

    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        self.radial(p).length() <= self.r_max + tolerance
            && p.y >= self.y_min - tolerance
            && p.y <= self.y_max + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_layout() {
        let layout = AquariumLayout::default();
        let bounds = TankBounds::from_layout(&layout, 0.6, 0.35, 2.0);
        assert_eq!(bounds.center, Vec2::new(78.0, 0.0));
        assert!((bounds.y_min - (-3.6)).abs() < 1e-4);
        assert!((bounds.y_max - 9.355).abs() < 1e-4);
        assert!((bounds.r_max - 10.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_radial_projects_onto_circle() {
        let bounds = TankBounds::from_layout(&AquariumLayout::default(), 0.0, 0.0, 2.0);
        let outside = bounds.world(Vec2::new(20.0, 0.0), 1.0);
        let clamped = bounds.clamp_radial(outside);
        assert!((bounds.radial(clamped).length() - bounds.r_max).abs() < 1e-3);
        assert_eq!(clamped.y, 1.0);

        let inside = bounds.world(Vec2::new(1.0, 2.0), 0.0);
        assert_eq!(bounds.clamp_radial(inside), inside);
    }
}
