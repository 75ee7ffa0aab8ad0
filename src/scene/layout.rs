//! Aquarium geometry.
//!
//! The scene is a ring tunnel around the origin, a round lobby that opens onto the
//! ring through a short hallway, a cylindrical tank inside the lobby, and an exit
//! door at the far end of the hallway. Everything else (collision volumes, the
//! protected placement zone, particle bounds) is derived from these parameters.
//!
//! ```text
//!            z
//!            ^        tunnel ring (r = 150)
//!            |    .-~~~~~~~~~~-.
//!            |  /                \
//!   lobby ---+-(o tank)==hall==>[door]--> x
//!            |  \                /
//!            |    '-~~~~~~~~~~-'
//! ```

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::Span;

/// Base dimensions of the aquarium.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AquariumLayout {
    /// Radius of the tunnel ring centreline.
    pub tunnel_radius: f32,
    /// Radius of the glass tube around the centreline.
    pub tunnel_tube_radius: f32,
    /// Extra clearance cut from the sand floor around the tube.
    pub tunnel_hole_margin: f32,
    /// Height of the tube centreline.
    pub tunnel_center_y: f32,
    /// Walkable radius inside the tube.
    pub tunnel_walk_radius: f32,
    /// Inset from the walkable radius before the glass blocks.
    pub tunnel_wall_buffer: f32,
    /// Angular slack added to the entrance gap on each side (radians).
    pub tunnel_gap_slack: f32,
    /// Width of the lobby opening and hallway.
    pub lobby_width: f32,
    pub lobby_radius: f32,
    pub lobby_height: f32,
    pub lobby_floor_y: f32,
    /// Length of the hallway between lobby and tunnel.
    pub connector_len: f32,
    /// Shift of the lobby group along x relative to its nominal position.
    pub lobby_shift: f32,
    /// Offset of the round lobby interior relative to the lobby group.
    pub lobby_round_offset: f32,
    pub tank_radius: f32,
    pub tank_base_height: f32,
    pub tank_buffer: f32,
    pub door_block_radius: f32,
    pub door_block_buffer: f32,
    /// Distance from the tunnel exit to the door, measured inward along x.
    pub door_inset: f32,
    /// Keep-out distance from the lobby and hallway walls.
    pub wall_buffer: f32,
    /// How far past the hallway end the walker may go.
    pub hall_end_margin: f32,
    /// Sand floor height outside the tunnel.
    pub big_floor_y: f32,
    /// Outer radius of the sand floor.
    pub big_floor_radius: f32,
    /// Eye height of the walker.
    pub eye_height: f32,
}

impl Default for AquariumLayout {
    fn default() -> Self {
        Self {
            tunnel_radius: 150.0,
            tunnel_tube_radius: 5.2,
            tunnel_hole_margin: 0.9,
            tunnel_center_y: -5.0,
            tunnel_walk_radius: 4.0,
            tunnel_wall_buffer: 0.10,
            tunnel_gap_slack: 0.03,
            lobby_width: 38.0,
            lobby_radius: 60.0,
            lobby_height: 15.0,
            lobby_floor_y: -5.0,
            connector_len: 40.0,
            lobby_shift: 20.0,
            lobby_round_offset: 4.0,
            tank_radius: 12.5,
            tank_base_height: 0.75,
            tank_buffer: 0.35,
            door_block_radius: 6.2,
            door_block_buffer: 1.0,
            door_inset: 320.0,
            wall_buffer: 2.0,
            hall_end_margin: 15.0,
            big_floor_y: -5.12,
            big_floor_radius: 4500.0,
            eye_height: -3.5,
        }
    }
}

impl AquariumLayout {
    /// Angular width of the lobby opening on the tunnel ring.
    pub fn gap_angle(&self) -> f32 {
        self.lobby_width / self.tunnel_radius
    }

    /// Half-angle of the walkable entrance span around theta = 0.
    pub fn gap_half_angle(&self) -> f32 {
        self.gap_angle() / 2.0 + self.tunnel_gap_slack
    }

    /// Nominal lobby x before the shift; also where the walker spawns.
    pub fn lobby_anchor_x(&self) -> f32 {
        self.tunnel_radius - self.lobby_radius - self.connector_len
    }

    /// World x of the lobby group.
    pub fn lobby_origin_x(&self) -> f32 {
        self.lobby_anchor_x() + self.lobby_shift
    }

    /// Centre used for the lobby wall test.
    pub fn lobby_wall_center(&self) -> Vec2 {
        Vec2::new(self.lobby_origin_x() + 3.0, 0.0)
    }

    /// Centre of the cylindrical tank and everything that lives in it.
    pub fn tank_center(&self) -> Vec2 {
        Vec2::new(self.lobby_origin_x() + 2.0 * self.lobby_round_offset, 0.0)
    }

    pub fn lobby_ceiling_y(&self) -> f32 {
        self.lobby_floor_y + self.lobby_height
    }

    /// Sand height inside the tank.
    pub fn sand_y(&self) -> f32 {
        self.lobby_floor_y + self.tank_base_height + 0.05
    }

    /// Water surface height inside the tank.
    pub fn water_top_y(&self) -> f32 {
        let tank_height = self.lobby_height - 0.02;
        let tank_y = (self.lobby_floor_y + self.lobby_ceiling_y()) / 2.0;
        let water_height = tank_height - 0.45;
        let water_y = tank_y + 0.02;
        water_y + water_height / 2.0 - 0.08
    }

    /// Hallway start along x (walker side).
    pub fn hall_x_min(&self) -> f32 {
        self.lobby_origin_x() + self.lobby_radius - 5.0
    }

    pub fn hall_x_max(&self) -> f32 {
        self.hall_x_min() + self.connector_len
    }

    /// Furthest x the walker may reach.
    pub fn hall_end_limit(&self) -> f32 {
        self.hall_x_max() + self.hall_end_margin
    }

    /// Lateral bound inside the hallway.
    pub fn hall_half_width(&self) -> f32 {
        self.lobby_width / 2.0 - self.wall_buffer
    }

    /// X range of the doorway hole cut into the hallway side walls.
    pub fn hall_hole(&self) -> Span {
        let start = self.lobby_radius + self.lobby_origin_x();
        Span::new(start + 10.0, start + 30.0)
    }

    /// Ground-plane centre of the exit door.
    pub fn door_center(&self) -> Vec2 {
        // Exit sits at theta = PI; the door is pushed inward along +x.
        Vec2::new(-self.tunnel_radius + self.door_inset, 0.0)
    }

    /// Radius of the sand floor cut-out around the tube, inner and outer.
    pub fn floor_hole(&self) -> Span {
        let half = self.tunnel_tube_radius + self.tunnel_hole_margin;
        Span::new(self.tunnel_radius - half, self.tunnel_radius + half)
    }

    /// Tunnel band widened by `margin` on each side of the ring.
    pub fn tunnel_band(&self, margin: f32) -> Span {
        Span::new(self.tunnel_radius - margin, self.tunnel_radius + margin)
    }

    /// Where the walker starts.
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::new(self.lobby_anchor_x(), self.eye_height, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_positions() {
        let layout = AquariumLayout::default();
        assert_eq!(layout.lobby_anchor_x(), 50.0);
        assert_eq!(layout.lobby_origin_x(), 70.0);
        assert_eq!(layout.tank_center(), Vec2::new(78.0, 0.0));
        assert_eq!(layout.lobby_wall_center(), Vec2::new(73.0, 0.0));
        assert_eq!(layout.door_center(), Vec2::new(170.0, 0.0));
    }

    #[test]
    fn test_hallway_bounds() {
        let layout = AquariumLayout::default();
        assert_eq!(layout.hall_x_min(), 125.0);
        assert_eq!(layout.hall_x_max(), 165.0);
        assert_eq!(layout.hall_end_limit(), 180.0);
        assert_eq!(layout.hall_half_width(), 17.0);
        assert_eq!(layout.hall_hole(), Span::new(140.0, 160.0));
    }

    #[test]
    fn test_heights() {
        let layout = AquariumLayout::default();
        assert!((layout.sand_y() - (-4.2)).abs() < 1e-5);
        assert!((layout.water_top_y() - 9.705).abs() < 1e-3);
        assert!(layout.water_top_y() < layout.lobby_ceiling_y());
    }

    #[test]
    fn test_floor_hole() {
        let hole = AquariumLayout::default().floor_hole();
        assert!((hole.min - 143.9).abs() < 1e-4);
        assert!((hole.max - 156.1).abs() < 1e-4);
    }
}
