//! Travelling-wave body animation for open-water swimmers.
//!
//! Purely cosmetic. Segment 0 is the head; amplitude grows toward the tail.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyWave {
    /// Number of body segments (stacked layers or tail pieces).
    pub segments: usize,
    /// Wave speed, radians per second.
    pub rate: f32,
    /// Phase lag between neighbouring segments.
    pub spacing: f32,
    /// Strength falls off as `((idx + 1) / segments)^exponent`.
    pub exponent: f32,
    pub yaw_amplitude: f32,
    pub roll_amplitude: f32,
}

impl BodyWave {
    /// Layered shark body.
    pub fn shark() -> Self {
        Self {
            segments: 15,
            rate: 5.0,
            spacing: 0.7,
            exponent: 1.6,
            yaw_amplitude: 0.35,
            roll_amplitude: 0.1,
        }
    }

    /// Single tail fin.
    pub fn tail() -> Self {
        Self {
            segments: 1,
            rate: 6.0,
            spacing: 0.0,
            exponent: 1.0,
            yaw_amplitude: 0.3,
            roll_amplitude: 0.05,
        }
    }

    /// No body segments.
    pub fn rigid() -> Self {
        Self {
            segments: 0,
            rate: 0.0,
            spacing: 0.0,
            exponent: 1.0,
            yaw_amplitude: 0.0,
            roll_amplitude: 0.0,
        }
    }

    fn strength(&self, idx: usize) -> f32 {
        ((idx + 1) as f32 / self.segments as f32).powf(self.exponent)
    }

    /// Offset of segment `idx` at time `t`. `phase` separates individuals and
    /// `gain` scales the amplitude.
    pub fn segment(&self, t: f32, phase: f32, idx: usize, gain: f32) -> SegmentPose {
        let wave = (t * self.rate + phase - idx as f32 * self.spacing).sin() * self.strength(idx) * gain;
        SegmentPose {
            yaw: wave * self.yaw_amplitude,
            roll: wave * self.roll_amplitude,
        }
    }

    /// Write every segment pose into `out`.
    pub fn fill(&self, t: f32, phase: f32, gain: f32, out: &mut [SegmentPose]) {
        for (idx, pose) in out.iter_mut().enumerate() {
            *pose = self.segment(t, phase, idx, gain);
        }
    }
}

/// Rotation offset of one body segment relative to the body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SegmentPose {
    pub yaw: f32,
    pub roll: f32,
}
