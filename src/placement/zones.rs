//! Ground-plane exclusion zones.
//!
//! All tests are on the (x, z) plane. A zone `contains` a point when placement
//! there must be rejected.

use glam::Vec2;

use crate::math::Span;
use crate::scene::layout::AquariumLayout;

/// A region of the ground plane where nothing may be placed.
pub trait ExclusionZone {
    fn contains(&self, p: Vec2) -> bool;
}

/// Excludes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExclusion;

impl ExclusionZone for NoExclusion {
    fn contains(&self, _p: Vec2) -> bool {
        false
    }
}

/// Open disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

impl ExclusionZone for Disc {
    fn contains(&self, p: Vec2) -> bool {
        p.distance(self.center) < self.radius
    }
}

/// Ring around the origin, open on both edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annulus {
    pub band: Span,
}

impl Annulus {
    pub fn new(inner: f32, outer: f32) -> Self {
        Self { band: Span::new(inner, outer) }
    }
}

impl ExclusionZone for Annulus {
    fn contains(&self, p: Vec2) -> bool {
        self.band.strictly_contains(p.length())
    }
}

/// Strip along x, symmetric about z = 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XBand {
    pub x: Span,
    pub half_width: f32,
}

impl ExclusionZone for XBand {
    fn contains(&self, p: Vec2) -> bool {
        self.x.strictly_contains(p.x) && p.y.abs() < self.half_width
    }
}

/// Clearances around the lobby and hallway kept free of decoration.
#[derive(Clone, Copy, Debug)]
pub struct ProtectedMargins {
    /// Added to the lobby radius.
    pub lobby: f32,
    /// Band starts this far before the hallway.
    pub hall_start: f32,
    /// Band ends this far past the hallway.
    pub hall_end: f32,
    /// Added to the hallway half-width.
    pub lateral: f32,
}

impl Default for ProtectedMargins {
    fn default() -> Self {
        Self {
            lobby: 35.0,
            hall_start: 25.0,
            hall_end: 55.0,
            lateral: 45.0,
        }
    }
}

/// The lobby disc plus the hallway band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LobbyHallZone {
    pub lobby: Disc,
    pub hall: XBand,
}

impl LobbyHallZone {
    pub fn from_layout(layout: &AquariumLayout, margins: ProtectedMargins) -> Self {
        let lobby_x = layout.lobby_origin_x();
        let hall_start = lobby_x + layout.lobby_radius;
        Self {
            lobby: Disc {
                center: Vec2::new(lobby_x + layout.lobby_round_offset, 0.0),
                radius: layout.lobby_radius + margins.lobby,
            },
            hall: XBand {
                x: Span::new(
                    hall_start - margins.hall_start,
                    hall_start + layout.connector_len + margins.hall_end,
                ),
                half_width: layout.lobby_width / 2.0 + margins.lateral,
            },
        }
    }
}

impl ExclusionZone for LobbyHallZone {
    fn contains(&self, p: Vec2) -> bool {
        self.lobby.contains(p) || self.hall.contains(p)
    }
}

/// Everywhere the big sand floor must stay clear: the protected zone and a band
/// around the tunnel ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorMask {
    pub protected: LobbyHallZone,
    pub tunnel: Annulus,
}

/// Half-width of the tunnel band kept clear by the floor mask.
pub const FLOOR_TUNNEL_MARGIN: f32 = 26.0;

impl FloorMask {
    pub fn from_layout(layout: &AquariumLayout) -> Self {
        Self {
            protected: LobbyHallZone::from_layout(layout, ProtectedMargins::default()),
            tunnel: Annulus {
                band: layout.tunnel_band(FLOOR_TUNNEL_MARGIN),
            },
        }
    }

    /// True where loose floor decoration may go.
    pub fn allows(&self, p: Vec2) -> bool {
        !self.contains(p)
    }
}

impl ExclusionZone for FloorMask {
    fn contains(&self, p: Vec2) -> bool {
        self.protected.contains(p) || self.tunnel.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected() -> LobbyHallZone {
        LobbyHallZone::from_layout(&AquariumLayout::default(), ProtectedMargins::default())
    }

    #[test]
    fn test_protected_zone_geometry() {
        let zone = protected();
        assert_eq!(zone.lobby.center, Vec2::new(74.0, 0.0));
        assert_eq!(zone.lobby.radius, 95.0);
        assert_eq!(zone.hall.x, Span::new(105.0, 225.0));
        assert_eq!(zone.hall.half_width, 64.0);
    }

    #[test]
    fn test_protected_zone_membership() {
        let zone = protected();
        assert!(zone.contains(Vec2::new(74.0, 90.0)));
        assert!(!zone.contains(Vec2::new(74.0, 96.0)));
        // Hallway band reaches past the lobby disc.
        assert!(zone.contains(Vec2::new(220.0, -60.0)));
        assert!(!zone.contains(Vec2::new(226.0, 0.0)));
        assert!(!zone.contains(Vec2::new(-200.0, 0.0)));
    }

    #[test]
    fn test_floor_mask() {
        let mask = FloorMask::from_layout(&AquariumLayout::default());
        assert!(!mask.allows(Vec2::new(0.0, 150.0)));
        assert!(!mask.allows(Vec2::new(-125.0, 0.0)));
        assert!(mask.allows(Vec2::new(-124.0, 0.0)));
        assert!(mask.allows(Vec2::new(0.0, -400.0)));
        assert!(!mask.allows(Vec2::new(150.0, 40.0)));
    }

    #[test]
    fn test_annulus_is_open() {
        let ring = Annulus::new(40.0, 60.0);
        assert!(!ring.contains(Vec2::new(40.0, 0.0)));
        assert!(ring.contains(Vec2::new(0.0, 50.0)));
        assert!(!ring.contains(Vec2::new(60.0, 0.0)));
        assert!(!NoExclusion.contains(Vec2::ZERO));
    }
}
