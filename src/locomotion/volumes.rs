//! Static collision volumes the walker is tested against.
//!
//! Each volume is a pure predicate on a candidate eye position; `blocks`
//! returning true means the move must not be committed.

use glam::{Vec2, Vec3};

use crate::math::{normalize_angle, Span};

/// Glass tube bent into a ring around the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelTube {
    /// Ring radius of the tube centreline.
    pub ring_radius: f32,
    /// Height of the tube centreline.
    pub center_y: f32,
    /// Largest walkable distance from the centreline.
    pub clearance: f32,
    /// The glass is only tested within this distance of the centreline.
    pub check_radius: f32,
    /// Walkers closer than this are inside the tube.
    pub reach: f32,
    /// Half-angle of the entrance gap around theta = 0.
    pub gap_half_angle: f32,
}

impl TunnelTube {
    /// Distance from `p` to the tube centreline circle.
    pub fn centerline_distance(&self, p: Vec3) -> f32 {
        let r = Vec2::new(p.x, p.z).length();
        let dy = p.y - self.center_y;
        ((r - self.ring_radius).powi(2) + dy * dy).sqrt()
    }

    /// True inside the angular span where the lobby joins the ring.
    pub fn in_gap(&self, p: Vec3) -> bool {
        normalize_angle(p.z.atan2(p.x)).abs() <= self.gap_half_angle
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.centerline_distance(p) < self.reach
    }

    fn blocks(&self, p: Vec3) -> bool {
        let d = self.centerline_distance(p);
        d < self.check_radius && !self.in_gap(p) && d > self.clearance
    }
}

/// Round lobby plus the straight hallway leading to the exit door.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LobbyCorridor {
    pub lobby_center: Vec2,
    /// Walkable radius of the lobby disc.
    pub lobby_radius: f32,
    /// Hallway rules apply from here on.
    pub hall_x_min: f32,
    pub hall_half_width: f32,
    /// Side-wall cut-out; lateral movement through it is bounded by the
    /// tunnel entrance span.
    pub hole: Span,
    /// Furthest reachable x.
    pub end_x: f32,
    /// The corridor walls do not apply inside the tunnel.
    pub tunnel: TunnelTube,
}

impl LobbyCorridor {
    fn blocks(&self, p: Vec3) -> bool {
        if self.tunnel.contains(p) {
            return false;
        }
        if p.x < self.hall_x_min {
            return Vec2::new(p.x, p.z).distance(self.lobby_center) > self.lobby_radius;
        }
        // Past the side walls only the doorway hole is open, and only as far
        // out as the tunnel entrance span.
        let through_hole = self.hole.strictly_contains(p.x) && self.tunnel.in_gap(p);
        let outside_band = p.z.abs() > self.hall_half_width && !through_hole;
        outside_band || p.x > self.end_x
    }
}

/// A named static obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionVolume {
    /// Vertical cylinder; blocks within `radius + buffer` of the axis.
    Cylinder {
        name: &'static str,
        center: Vec2,
        radius: f32,
        buffer: f32,
    },
    TunnelGlass(TunnelTube),
    Corridor(LobbyCorridor),
}

impl CollisionVolume {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cylinder { name, .. } => *name,
            Self::TunnelGlass(_) => "tunnel_glass",
            Self::Corridor(_) => "lobby_corridor",
        }
    }

    /// True if standing at `p` is not allowed.
    pub fn blocks(&self, p: Vec3) -> bool {
        match self {
            Self::Cylinder {
                center,
                radius,
                buffer,
                ..
            } => Vec2::new(p.x, p.z).distance(*center) < radius + buffer,
            Self::TunnelGlass(tube) => tube.blocks(p),
            Self::Corridor(corridor) => corridor.blocks(p),
        }
    }
}
