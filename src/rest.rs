use serde::{Deserialize, Serialize};

use crate::{simulate::Trajectory, types::Float};

pub const DEFAULT_ANGLE_THRESHOLD: Float = 0.01; // rad
pub const DEFAULT_OMEGA_THRESHOLD: Float = 0.01; // rad/s

/// What counts as "at rest": |θ| and |ω| both strictly below these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestThresholds {
    pub angle: Float,
    pub omega: Float,
}

impl Default for RestThresholds {
    fn default() -> Self {
        RestThresholds {
            angle: DEFAULT_ANGLE_THRESHOLD,
            omega: DEFAULT_OMEGA_THRESHOLD,
        }
    }
}

impl RestThresholds {
    pub fn new(angle: Float, omega: Float) -> Self {
        RestThresholds { angle, omega }
    }

    pub fn is_at_rest(&self, theta: Float, omega: Float) -> bool {
        theta.abs() < self.angle && omega.abs() < self.omega
    }
}

/// Index of the first sample at which the pendulum is at rest.
///
/// - No sample at rest: the last index, so playback runs to the grid end.
/// - First rest at index 0 while the initial angle exceeds the angle
///   threshold: treated as spurious, also the last index.
/// - First rest at index 0 with the initial angle within threshold: 0.
///
/// Only the first crossing counts; the state is not required to stay
/// below the thresholds afterwards. The index 0 override compares the
/// signed initial angle, so a sample 0 that passes the rest check never
/// triggers it.
pub fn detect_stop(trajectory: &Trajectory, thresholds: &RestThresholds) -> usize {
    let last = trajectory.last_index();
    let first_rest = trajectory
        .samples()
        .find(|s| thresholds.is_at_rest(s.theta, s.omega))
        .map(|s| s.index);

    match first_rest {
        None => last,
        Some(0) if trajectory.theta(0) > thresholds.angle => last,
        Some(i) => i,
    }
}
