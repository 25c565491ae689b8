use itertools::izip;
use log::{debug, warn};

use crate::{
    dynamics::{DampedPendulum, PendulumState},
    error::SimulationError,
    grid::TimeGrid,
    integrators::{Integrator, Stepper},
    params::SimulationParameters,
    types::Float,
};

/// One trajectory sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub time: Float,
    pub theta: Float,
    pub omega: Float,
}

/// Solved pendulum states, one per grid time. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    grid: TimeGrid,
    states: Vec<PendulumState>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.states.len() - 1
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn time(&self, i: usize) -> Float {
        self.grid[i]
    }

    pub fn state(&self, i: usize) -> &PendulumState {
        &self.states[i]
    }

    pub fn theta(&self, i: usize) -> Float {
        self.states[i][0]
    }

    pub fn omega(&self, i: usize) -> Float {
        self.states[i][1]
    }

    pub fn sample(&self, i: usize) -> Sample {
        Sample {
            index: i,
            time: self.time(i),
            theta: self.theta(i),
            omega: self.omega(i),
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        izip!(self.grid.iter(), self.states.iter())
            .enumerate()
            .map(|(index, (time, s))| Sample {
                index,
                time: *time,
                theta: s[0],
                omega: s[1],
            })
    }
}

/// Integrate the damped pendulum from (θ0, 0) over every time of the grid.
///
/// Fails before integrating if the integrator settings are invalid, and
/// with an [`IntegrationFailure`](crate::error::IntegrationFailure) rather
/// than a partial trajectory if the integrator gives up.
pub fn solve(
    params: &SimulationParameters,
    grid: &TimeGrid,
    integrator: &Integrator,
) -> Result<Trajectory, SimulationError> {
    integrator.validate()?;

    debug!(
        "solving L = {}, g = {}, theta0 = {} rad, b = {} over {} samples with {:?}",
        params.length(),
        params.gravity(),
        params.initial_angle(),
        params.damping(),
        grid.len(),
        integrator
    );

    let pendulum = DampedPendulum::new(params);
    let mut stepper = Stepper::new(integrator, &pendulum);

    let mut states = Vec::with_capacity(grid.len());
    let mut s = DampedPendulum::initial_state(params);
    states.push(s);
    for (t0, t1) in grid.iter().zip(grid.iter().skip(1)) {
        s = stepper.advance(&s, *t0, *t1).map_err(|e| {
            warn!("integration failed: {}", e);
            e
        })?;
        states.push(s);
    }

    debug!(
        "solved in {} steps ({} rejected)",
        stepper.steps, stepper.rejected
    );

    Ok(Trajectory {
        grid: grid.clone(),
        states,
    })
}

#[cfg(test)]
mod simulate_tests {
    use crate::{
        energy::pendulum_energy,
        error::{IntegrationFailure, ParameterError},
        integrators::{DEFAULT_MAX_STEPS, DEFAULT_SUBSTEPS},
        GRAVITY, PI,
    };

    use super::*;

    #[test]
    fn trajectory_is_aligned_with_grid() {
        // Arrange
        let params = SimulationParameters::new(1.0, GRAVITY, PI / 4.0, 0.1).unwrap();
        let grid = TimeGrid::default();

        // Act
        let trajectory = solve(&params, &grid, &Integrator::default()).unwrap();

        // Assert
        assert_eq!(trajectory.len(), grid.len());
        assert_eq!(trajectory.theta(0), PI / 4.0);
        assert_eq!(trajectory.omega(0), 0.0);
        for sample in trajectory.samples() {
            assert_eq!(sample.time, grid[sample.index]);
            assert!(sample.theta.is_finite() && sample.omega.is_finite());
        }
    }

    #[test]
    fn deterministic() {
        // Arrange
        let params = SimulationParameters::new(1.3, 7.0, 2.0, 0.25).unwrap();
        let grid = TimeGrid::default();

        // Act
        let a = solve(&params, &grid, &Integrator::default()).unwrap();
        let b = solve(&params, &grid, &Integrator::default()).unwrap();

        // Assert
        let max_diff = a
            .samples()
            .zip(b.samples())
            .map(|(x, y)| (x.theta - y.theta).abs().max((x.omega - y.omega).abs()))
            .fold(0., Float::max);
        assert!(max_diff < 1e-6, "max difference: {}", max_diff);
    }

    #[test]
    fn integrators_agree() {
        // Arrange
        let params = SimulationParameters::new(1.0, GRAVITY, PI / 4.0, 0.1).unwrap();
        let grid = TimeGrid::linspace(20.0, 201).unwrap();
        let rk4 = Integrator::RungeKutta4 {
            substeps: DEFAULT_SUBSTEPS,
        };

        // Act
        let a = solve(&params, &grid, &rk4).unwrap();
        let b = solve(&params, &grid, &Integrator::default()).unwrap();

        // Assert
        for (x, y) in a.samples().zip(b.samples()) {
            assert!(
                (x.theta - y.theta).abs() < 1e-5,
                "t = {}: {} vs {}",
                x.time,
                x.theta,
                y.theta
            );
        }
    }

    /// Without damping the pendulum energy should stay put
    #[test]
    fn undamped_conserves_energy() {
        // Arrange
        let params = SimulationParameters::new(0.5, GRAVITY, 2.5, 0.).unwrap();
        let grid = TimeGrid::default();

        // Act
        let trajectory = solve(&params, &grid, &Integrator::default()).unwrap();

        // Assert
        let initial_energy = pendulum_energy(&params, trajectory.state(0));
        let final_energy = pendulum_energy(&params, trajectory.state(trajectory.last_index()));
        assert!(
            (final_energy - initial_energy).abs() < 1e-4 * initial_energy,
            "{} vs {}",
            final_energy,
            initial_energy
        );
    }

    #[test]
    fn invalid_integrator_fails_before_integration() {
        let params = SimulationParameters::new(1.0, GRAVITY, 1.0, 0.1).unwrap();
        let result = solve(
            &params,
            &TimeGrid::default(),
            &Integrator::RungeKutta4 { substeps: 0 },
        );
        assert!(matches!(
            result,
            Err(SimulationError::Parameter(ParameterError::InvalidIntegrator(_)))
        ));
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        // Arrange
        let params = SimulationParameters::new(1.0, GRAVITY, 1.0, 0.1).unwrap();
        let integrator = Integrator::DormandPrince45 {
            rtol: 1e-9,
            atol: 1e-10,
            max_steps: 100,
        };

        // Act
        let result = solve(&params, &TimeGrid::default(), &integrator);

        // Assert
        assert!(matches!(
            result,
            Err(SimulationError::Integration(
                IntegrationFailure::StepBudgetExhausted { .. }
            ))
        ));
    }

    #[test]
    fn diverging_state_is_an_error() {
        // Arrange
        let params = SimulationParameters::new(1.0, GRAVITY, 1.0, 0.1).unwrap();
        let grid = TimeGrid::linspace(1e6, 2).unwrap();
        let integrator = Integrator::RungeKutta4 { substeps: 100 };

        // Act
        let result = solve(&params, &grid, &integrator);

        // Assert
        assert!(matches!(
            result,
            Err(SimulationError::Integration(
                IntegrationFailure::NonFiniteState { .. }
            ))
        ));
    }

    #[test]
    fn unreachable_tolerance_underflows() {
        // Arrange
        let params = SimulationParameters::new(1.0, GRAVITY, 1.0, 0.1).unwrap();
        let integrator = Integrator::DormandPrince45 {
            rtol: 1e-300,
            atol: 1e-300,
            max_steps: DEFAULT_MAX_STEPS,
        };

        // Act
        let result = solve(&params, &TimeGrid::default(), &integrator);

        // Assert
        assert!(matches!(
            result,
            Err(SimulationError::Integration(
                IntegrationFailure::StepSizeUnderflow { .. }
            ))
        ));
    }
}
