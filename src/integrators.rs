use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::{
    dynamics::{DampedPendulum, PendulumState},
    error::{IntegrationFailure, ParameterError},
    types::Float,
};

pub const DEFAULT_SUBSTEPS: usize = 10;
pub const DEFAULT_RTOL: Float = 1e-9;
pub const DEFAULT_ATOL: Float = 1e-10;
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Numerical scheme used to advance the pendulum between grid times.
/// Both schemes land exactly on every grid time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Integrator {
    /// Classic RK4 with `substeps` equal steps per grid interval
    RungeKutta4 { substeps: usize },
    /// Dormand-Prince 5(4) with adaptive step size. `max_steps` bounds the
    /// number of attempted steps over a whole run.
    DormandPrince45 {
        rtol: Float,
        atol: Float,
        max_steps: usize,
    },
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::DormandPrince45 {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl Integrator {
    pub fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            Integrator::RungeKutta4 { substeps } => {
                if substeps == 0 {
                    return Err(ParameterError::InvalidIntegrator(
                        "RK4 needs at least one substep".to_string(),
                    ));
                }
            }
            Integrator::DormandPrince45 {
                rtol,
                atol,
                max_steps,
            } => {
                if !(rtol.is_finite() && rtol > 0.) || !(atol.is_finite() && atol > 0.) {
                    return Err(ParameterError::InvalidIntegrator(format!(
                        "tolerances must be positive, got rtol = {}, atol = {}",
                        rtol, atol
                    )));
                }
                if max_steps == 0 {
                    return Err(ParameterError::InvalidIntegrator(
                        "step budget must be positive".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Carries the integrator's running state (adaptive step size, step
/// counts) from one grid interval to the next within a single run.
pub struct Stepper<'a> {
    integrator: &'a Integrator,
    pendulum: &'a DampedPendulum,
    h: Option<Float>,
    pub steps: usize,
    pub rejected: usize,
}

impl<'a> Stepper<'a> {
    pub fn new(integrator: &'a Integrator, pendulum: &'a DampedPendulum) -> Self {
        Stepper {
            integrator,
            pendulum,
            h: None,
            steps: 0,
            rejected: 0,
        }
    }

    /// Advance `state` from time t0 to exactly t1.
    pub fn advance(
        &mut self,
        state: &PendulumState,
        t0: Float,
        t1: Float,
    ) -> Result<PendulumState, IntegrationFailure> {
        let next = match *self.integrator {
            Integrator::RungeKutta4 { substeps } => {
                let dt = (t1 - t0) / substeps as Float;
                let mut s = *state;
                for _ in 0..substeps {
                    s = runge_kutta_4(self.pendulum, &s, dt);
                }
                self.steps += substeps;
                s
            }
            Integrator::DormandPrince45 {
                rtol,
                atol,
                max_steps,
            } => self.adaptive(state, t0, t1, rtol, atol, max_steps)?,
        };

        if next.iter().all(|x| x.is_finite()) {
            Ok(next)
        } else {
            Err(IntegrationFailure::NonFiniteState { time: t1 })
        }
    }

    fn adaptive(
        &mut self,
        state: &PendulumState,
        t0: Float,
        t1: Float,
        rtol: Float,
        atol: Float,
        max_steps: usize,
    ) -> Result<PendulumState, IntegrationFailure> {
        const SAFETY: Float = 0.9;
        const MIN_FACTOR: Float = 0.2;
        const MAX_FACTOR: Float = 5.0;
        // a step within this factor of t1 is stretched to land on it
        const STRETCH: Float = 1.01;

        let span = t1 - t0;
        if span <= 0. {
            return Ok(*state);
        }

        let mut h = self.h.unwrap_or(span);
        let mut t = t0;
        let mut s = *state;
        loop {
            if self.steps >= max_steps {
                return Err(IntegrationFailure::StepBudgetExhausted { time: t, max_steps });
            }

            let remaining = t1 - t;
            let last = h * STRETCH >= remaining;
            let step = if last { remaining } else { h };
            if step <= 16. * Float::EPSILON * t.abs().max(1.0) {
                return Err(IntegrationFailure::StepSizeUnderflow { time: t, step });
            }

            let (next, error) = dormand_prince_45(self.pendulum, &s, step);
            self.steps += 1;

            let err_norm = izip!(s.iter(), next.iter(), error.iter())
                .map(|(a, b, e)| e.abs() / (atol + rtol * a.abs().max(b.abs())))
                .fold(0., Float::max);

            if !err_norm.is_finite() {
                self.rejected += 1;
                h = step * MIN_FACTOR;
                continue;
            }

            let factor = (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR);
            if err_norm <= 1. {
                s = next;
                if last {
                    // a step shortened to hit t1 says little about the size the
                    // next interval can take
                    self.h = Some(h.max(step * factor));
                    return Ok(s);
                }
                t += step;
                h = step * factor;
            } else {
                self.rejected += 1;
                h = step * factor.min(1.0);
            }
        }
    }
}

/// Classic fourth-order Runge-Kutta step
pub fn runge_kutta_4(pendulum: &DampedPendulum, s: &PendulumState, dt: Float) -> PendulumState {
    let k1 = pendulum.dynamics(s);
    let k2 = pendulum.dynamics(&(s + k1 * (dt / 2.0)));
    let k3 = pendulum.dynamics(&(s + k2 * (dt / 2.0)));
    let k4 = pendulum.dynamics(&(s + k3 * dt));

    s + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

/// Dormand-Prince 5(4) step. Returns the fifth-order solution and the
/// difference to the embedded fourth-order one as the local error estimate.
///
/// Ref: Hairer, Nørsett & Wanner, Solving Ordinary Differential Equations I,
/// Table 5.2
#[rustfmt::skip]
pub fn dormand_prince_45(
    pendulum: &DampedPendulum,
    s: &PendulumState,
    dt: Float,
) -> (PendulumState, PendulumState) {
    let k1 = pendulum.dynamics(s);
    let k2 = pendulum.dynamics(&(s + dt * (k1 * (1. / 5.))));
    let k3 = pendulum.dynamics(&(s + dt * (k1 * (3. / 40.) + k2 * (9. / 40.))));
    let k4 = pendulum.dynamics(&(s + dt * (k1 * (44. / 45.) - k2 * (56. / 15.) + k3 * (32. / 9.))));
    let k5 = pendulum.dynamics(&(s + dt * (k1 * (19372. / 6561.) - k2 * (25360. / 2187.)
        + k3 * (64448. / 6561.) - k4 * (212. / 729.))));
    let k6 = pendulum.dynamics(&(s + dt * (k1 * (9017. / 3168.) - k2 * (355. / 33.)
        + k3 * (46732. / 5247.) + k4 * (49. / 176.) - k5 * (5103. / 18656.))));

    let next = s + dt * (k1 * (35. / 384.) + k3 * (500. / 1113.) + k4 * (125. / 192.)
        - k5 * (2187. / 6784.) + k6 * (11. / 84.));
    let k7 = pendulum.dynamics(&next);

    let error = dt * (k1 * (71. / 57600.) - k3 * (71. / 16695.) + k4 * (71. / 1920.)
        - k5 * (17253. / 339200.) + k6 * (22. / 525.) - k7 * (1. / 40.));

    (next, error)
}
