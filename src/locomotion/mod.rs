//! First-person locomotion
//!
//! Each tick the controller turns the held direction keys into a proposed eye
//! position, runs it through an ordered list of [`CollisionVolume`]s and either
//! commits it or falls back to the prior position. The first failing volume
//! decides; later volumes are not consulted.

pub mod volumes;

pub use volumes::{CollisionVolume, LobbyCorridor, TunnelTube};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::input::MoveInput;
use crate::core::viewpoint::Viewpoint;
use crate::scene::layout::AquariumLayout;

/// What happens to a proposal that hits a volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevertPolicy {
    /// Discard the whole move.
    #[default]
    WholeMove,
    /// Retry the x component alone, then the z component alone.
    PerAxis,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Distance moved per tick along each held direction.
    pub step: f32,
    /// Scale diagonal input down to a single step.
    pub normalize_diagonal: bool,
    pub revert: RevertPolicy,
    /// Walkers this close to the tube centreline are inside the tunnel.
    pub tunnel_reach: f32,
    /// The tunnel glass is only tested within this distance.
    pub tunnel_check_radius: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            step: 0.4,
            normalize_diagonal: true,
            revert: RevertPolicy::WholeMove,
            tunnel_reach: 6.8,
            tunnel_check_radius: 12.0,
        }
    }
}

/// Result of one locomotion tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No direction held.
    Idle,
    /// Proposal accepted as-is.
    Committed,
    /// Only one axis of the proposal was kept.
    Slid { blocked_by: &'static str },
    /// Viewpoint left at the prior position.
    Blocked { by: &'static str },
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Committed | Self::Slid { .. })
    }
}

/// Validates and commits walker movement against the aquarium's volumes.
pub struct LocomotionController {
    config: LocomotionConfig,
    eye_height: f32,
    volumes: Vec<CollisionVolume>,
}

impl LocomotionController {
    /// Volumes in test order: tank, door, tunnel glass, lobby/hallway.
    pub fn from_layout(layout: &AquariumLayout, config: LocomotionConfig) -> Self {
        let tunnel = TunnelTube {
            ring_radius: layout.tunnel_radius,
            center_y: layout.tunnel_center_y,
            clearance: layout.tunnel_walk_radius - layout.tunnel_wall_buffer,
            check_radius: config.tunnel_check_radius,
            reach: config.tunnel_reach,
            gap_half_angle: layout.gap_half_angle(),
        };
        let volumes = vec![
            CollisionVolume::Cylinder {
                name: "tank",
                center: layout.tank_center(),
                radius: layout.tank_radius,
                buffer: layout.tank_buffer,
            },
            CollisionVolume::Cylinder {
                name: "exit_door",
                center: layout.door_center(),
                radius: layout.door_block_radius,
                buffer: -layout.door_block_buffer,
            },
            CollisionVolume::TunnelGlass(tunnel),
            CollisionVolume::Corridor(LobbyCorridor {
                lobby_center: layout.lobby_wall_center(),
                lobby_radius: layout.lobby_radius - layout.wall_buffer,
                hall_x_min: layout.hall_x_min(),
                hall_half_width: layout.hall_half_width(),
                hole: layout.hall_hole(),
                end_x: layout.hall_end_limit(),
                tunnel,
            }),
        ];
        Self::new(config, layout.eye_height, volumes)
    }

    pub fn new(config: LocomotionConfig, eye_height: f32, volumes: Vec<CollisionVolume>) -> Self {
        Self {
            config,
            eye_height,
            volumes,
        }
    }

    /// Ground-plane displacement requested by `input` for the current look.
    pub fn displacement(&self, view: &Viewpoint, input: &MoveInput) -> Vec3 {
        let forward = view.ground_forward();
        let left = view.ground_left();

        let mut dir = Vec3::ZERO;
        if input.forward {
            dir += forward;
        }
        if input.back {
            dir -= forward;
        }
        if input.left {
            dir += left;
        }
        if input.right {
            dir -= left;
        }

        if self.config.normalize_diagonal {
            dir = dir.normalize_or_zero();
        }
        dir * self.config.step
    }

    /// Candidate eye position before validation.
    pub fn propose(&self, view: &Viewpoint, input: &MoveInput) -> Vec3 {
        view.position + self.displacement(view, input)
    }

    /// First volume that rejects `candidate`, in test order.
    pub fn first_violation(&self, candidate: Vec3) -> Option<&CollisionVolume> {
        self.volumes.iter().find(|v| v.blocks(candidate))
    }

    /// Apply look, propose, validate and commit or revert.
    pub fn step(&self, view: &mut Viewpoint, input: &MoveInput) -> MoveOutcome {
        view.look(input.look_delta);
        view.position.y = self.eye_height;
        let prior = view.position;

        if !input.wants_move() {
            return MoveOutcome::Idle;
        }

        let delta = self.displacement(view, input);
        let candidate = prior + delta;
        let outcome = match self.first_violation(candidate) {
            None => {
                view.position = candidate;
                MoveOutcome::Committed
            }
            Some(volume) => {
                let by = volume.name();
                match self.config.revert {
                    RevertPolicy::WholeMove => MoveOutcome::Blocked { by },
                    RevertPolicy::PerAxis => match self.slide(prior, delta) {
                        Some(pos) => {
                            view.position = pos;
                            MoveOutcome::Slid { blocked_by: by }
                        }
                        None => MoveOutcome::Blocked { by },
                    },
                }
            }
        };

        view.position.y = self.eye_height;
        if let MoveOutcome::Blocked { by } = outcome {
            log::trace!("Move blocked by {by} at ({:.2}, {:.2})", prior.x, prior.z);
        }
        outcome
    }

    fn slide(&self, prior: Vec3, delta: Vec3) -> Option<Vec3> {
        [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.z)]
            .into_iter()
            .filter(|d| *d != Vec2::ZERO)
            .map(|d| prior + Vec3::new(d.x, 0.0, d.y))
            .find(|p| self.first_violation(*p).is_none())
    }

    pub fn volumes(&self) -> &[CollisionVolume] {
        &self.volumes
    }

    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{seeded, ScatterRng};
    use std::f32::consts::FRAC_PI_2;

    fn controller(revert: RevertPolicy) -> LocomotionController {
        let config = LocomotionConfig {
            revert,
            ..LocomotionConfig::default()
        };
        LocomotionController::from_layout(&AquariumLayout::default(), config)
    }

    fn facing_x(x: f32, z: f32) -> Viewpoint {
        Viewpoint::facing(Vec3::new(x, -3.5, z), -FRAC_PI_2)
    }

    #[test]
    fn test_volume_order() {
        let names: Vec<_> = controller(RevertPolicy::WholeMove)
            .volumes()
            .iter()
            .map(|v| v.name())
            .collect();
        assert_eq!(names, ["tank", "exit_door", "tunnel_glass", "lobby_corridor"]);
    }

    #[test]
    fn test_move_into_tank_fully_reverts() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(65.0, 0.0);
        let prior = view.position;

        let outcome = ctl.step(&mut view, &MoveInput::forward());

        assert_eq!(outcome, MoveOutcome::Blocked { by: "tank" });
        assert_eq!(view.position, prior);
    }

    #[test]
    fn test_walk_from_spawn_stops_at_tank() {
        let layout = AquariumLayout::default();
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = Viewpoint::facing(layout.spawn_point(), -FRAC_PI_2);
        for _ in 0..100 {
            ctl.step(&mut view, &MoveInput::forward());
        }
        assert!(view.position.x > 64.0 && view.position.x < 65.15);
        assert!(view.position.z.abs() < 1e-4);
    }

    #[test]
    fn test_eye_height_always_pinned() {
        let ctl = controller(RevertPolicy::PerAxis);
        let mut rng = seeded(21);
        let mut view = Viewpoint::new(Vec3::new(40.0, 12.0, 10.0));
        for _ in 0..2000 {
            let input = MoveInput {
                forward: rng.chance(0.6),
                back: rng.chance(0.2),
                left: rng.chance(0.3),
                right: rng.chance(0.3),
                look_delta: Vec2::new(rng.range(-40.0, 40.0), rng.range(-40.0, 40.0)),
            };
            ctl.step(&mut view, &input);
            assert_eq!(view.position.y, -3.5);
        }
    }

    #[test]
    fn test_idle_keeps_position() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(50.0, 0.0);
        assert_eq!(ctl.step(&mut view, &MoveInput::IDLE), MoveOutcome::Idle);
        assert_eq!(view.position, Vec3::new(50.0, -3.5, 0.0));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let ctl = controller(RevertPolicy::WholeMove);
        let view = facing_x(40.0, 0.0);
        let input = MoveInput {
            forward: true,
            left: true,
            ..MoveInput::IDLE
        };
        assert!((ctl.displacement(&view, &input).length() - 0.4).abs() < 1e-5);

        let raw = LocomotionController::from_layout(
            &AquariumLayout::default(),
            LocomotionConfig {
                normalize_diagonal: false,
                ..LocomotionConfig::default()
            },
        );
        assert!((raw.displacement(&view, &input).length() - 0.4 * 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_tunnel_gap_lets_walker_through() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(150.0, 0.0);
        for _ in 0..10 {
            assert_eq!(ctl.step(&mut view, &MoveInput::forward()), MoveOutcome::Committed);
        }
        assert!((view.position.x - 154.0).abs() < 1e-3);
    }

    #[test]
    fn test_tunnel_glass_blocks_outside_gap() {
        let ctl = controller(RevertPolicy::WholeMove);
        // Far side of the ring, walking outward toward the glass.
        let mut view = Viewpoint::facing(Vec3::new(-153.5, -3.5, 0.0), FRAC_PI_2);
        assert_eq!(
            ctl.step(&mut view, &MoveInput::forward()),
            MoveOutcome::Blocked { by: "tunnel_glass" }
        );
        assert_eq!(view.position.x, -153.5);
    }

    #[test]
    fn test_hallway_side_wall() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(130.0, 16.8);
        let right = MoveInput {
            right: true,
            ..MoveInput::IDLE
        };
        assert_eq!(ctl.step(&mut view, &right), MoveOutcome::Blocked { by: "lobby_corridor" });
        assert_eq!(view.position.z, 16.8);
    }

    #[test]
    fn test_doorway_hole_opens_side_wall() {
        let ctl = controller(RevertPolicy::WholeMove);
        let right = MoveInput {
            right: true,
            ..MoveInput::IDLE
        };

        // Inside the tube reach.
        let mut view = facing_x(150.0, 16.8);
        assert_eq!(ctl.step(&mut view, &right), MoveOutcome::Committed);
        assert!((view.position.z - 17.2).abs() < 1e-4);

        // Outside the tube reach, so only the hole lets the walker past the wall.
        let mut view = facing_x(142.0, 16.8);
        assert_eq!(ctl.step(&mut view, &right), MoveOutcome::Committed);

        // Same step before the hole hits the side wall.
        let mut view = facing_x(130.0, 16.8);
        assert_eq!(ctl.step(&mut view, &right), MoveOutcome::Blocked { by: "lobby_corridor" });
    }

    #[test]
    fn test_doorway_hole_bounded_by_entrance_span() {
        let ctl = controller(RevertPolicy::WholeMove);
        let right = MoveInput {
            right: true,
            ..MoveInput::IDLE
        };
        // Last step out of the entrance span, beyond the glass check radius.
        let mut view = facing_x(159.9, 25.2);
        assert_eq!(ctl.step(&mut view, &right), MoveOutcome::Blocked { by: "lobby_corridor" });
        assert_eq!(view.position.z, 25.2);

        // Walking out along +z from the hole never leaves the hallway region.
        let mut view = facing_x(159.9, 16.8);
        for _ in 0..200 {
            ctl.step(&mut view, &right);
        }
        assert!(view.position.z < 25.65);
    }

    #[test]
    fn test_hallway_end() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(179.8, 10.0);
        assert_eq!(
            ctl.step(&mut view, &MoveInput::forward()),
            MoveOutcome::Blocked { by: "lobby_corridor" }
        );
    }

    #[test]
    fn test_exit_door_blocks() {
        let ctl = controller(RevertPolicy::WholeMove);
        let mut view = facing_x(164.6, 0.0);
        assert_eq!(
            ctl.step(&mut view, &MoveInput::forward()),
            MoveOutcome::Blocked { by: "exit_door" }
        );
        assert_eq!(view.position.x, 164.6);
    }

    #[test]
    fn test_lobby_wall() {
        let ctl = controller(RevertPolicy::WholeMove);
        // 57.8 from the lobby centre, walking away from it.
        let mut view = Viewpoint::facing(Vec3::new(15.2, -3.5, 0.0), FRAC_PI_2);
        assert_eq!(
            ctl.step(&mut view, &MoveInput::forward()),
            MoveOutcome::Blocked { by: "lobby_corridor" }
        );
    }

    #[test]
    fn test_per_axis_slides_along_wall() {
        let ctl = controller(RevertPolicy::PerAxis);
        let mut view = facing_x(130.0, 16.9);
        let input = MoveInput {
            forward: true,
            right: true,
            ..MoveInput::IDLE
        };
        let outcome = ctl.step(&mut view, &input);
        assert_eq!(outcome, MoveOutcome::Slid { blocked_by: "lobby_corridor" });
        assert!(view.position.x > 130.0);
        assert_eq!(view.position.z, 16.9);
        assert!(outcome.moved());
    }
}
