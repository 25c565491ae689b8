use na::Vector2;

use crate::{params::SimulationParameters, types::Float};

/// Pendulum state (θ, ω): angular displacement and angular velocity.
pub type PendulumState = Vector2<Float>;

/// Damped simple pendulum written as a first-order system
///     θdot = ω
///     ωdot = -b ω - (g / L) sin θ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedPendulum {
    damping: Float,
    g_over_l: Float,
}

impl DampedPendulum {
    pub fn new(params: &SimulationParameters) -> Self {
        DampedPendulum {
            damping: params.damping(),
            g_over_l: params.gravity() / params.length(),
        }
    }

    pub fn initial_state(params: &SimulationParameters) -> PendulumState {
        Vector2::new(params.initial_angle(), 0.)
    }

    /// Time derivative of the state
    pub fn dynamics(&self, state: &PendulumState) -> PendulumState {
        let theta = state[0];
        let omega = state[1];
        Vector2::new(omega, -self.damping * omega - self.g_over_l * theta.sin())
    }
}
