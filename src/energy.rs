use crate::{
    dynamics::PendulumState, params::SimulationParameters, simulate::Trajectory, types::Float,
};

/// Mechanical energy of the pendulum per unit bob mass, zero when hanging
/// at rest: ½ L² ω² + g L (1 - cos θ)
pub fn pendulum_energy(params: &SimulationParameters, state: &PendulumState) -> Float {
    let l = params.length();
    let theta = state[0];
    let omega = state[1];

    let KE = 0.5 * l * l * omega * omega;
    let PE = params.gravity() * l * (1. - theta.cos());
    KE + PE
}

/// |θ| at every turning point of the swing, in time order.
///
/// A turning point is where ω changes sign between two adjacent samples;
/// the peak is the larger |θ| of the two.
pub fn swing_peaks(trajectory: &Trajectory) -> Vec<Float> {
    let samples: Vec<_> = trajectory.samples().collect();
    samples
        .windows(2)
        .filter(|w| w[0].omega * w[1].omega < 0.)
        .map(|w| w[0].theta.abs().max(w[1].theta.abs()))
        .collect()
}

#[cfg(test)]
mod energy_tests {
    use crate::{
        grid::TimeGrid, integrators::Integrator, params::ParameterInputs, simulate::solve, GRAVITY,
        PI,
    };

    use super::*;

    #[test]
    fn energy_at_extremes() {
        // Arrange
        let params = SimulationParameters::new(2.0, GRAVITY, 0.3, 0.).unwrap();

        // Act
        let hanging = pendulum_energy(&params, &PendulumState::new(0., 0.));
        let horizontal = pendulum_energy(&params, &PendulumState::new(PI / 2.0, 0.));
        let swinging = pendulum_energy(&params, &PendulumState::new(0., 3.0));

        // Assert
        assert_eq!(hanging, 0.);
        crate::assert_close!(horizontal, GRAVITY * 2.0, 1e-12);
        crate::assert_close!(swinging, 0.5 * 4.0 * 9.0, 1e-12);
    }

    #[test]
    fn damped_peaks_never_grow() {
        for damping in [0.05, 0.1, 0.5] {
            // Arrange
            let params = ParameterInputs::new(1.0, GRAVITY, 45.0, damping)
                .validate()
                .unwrap();

            // Act
            let trajectory = solve(&params, &TimeGrid::default(), &Integrator::default()).unwrap();
            let peaks = swing_peaks(&trajectory);

            // Assert
            assert!(peaks.len() > 10, "only {} peaks", peaks.len());
            assert!(peaks[0] <= params.initial_angle());
            for (i, w) in peaks.windows(2).enumerate() {
                assert!(
                    w[1] <= w[0] + 1e-9,
                    "b = {}: peak {} grew from {} to {}",
                    damping,
                    i + 1,
                    w[0],
                    w[1]
                );
            }
            assert!(peaks[peaks.len() - 1] < 0.02 * peaks[0]);
        }
    }

    #[test]
    fn damped_energy_never_grows() {
        // Arrange
        let params = ParameterInputs::new(3.0, 4.0, 120.0, 0.3)
            .validate()
            .unwrap();

        // Act
        let trajectory = solve(&params, &TimeGrid::default(), &Integrator::default()).unwrap();

        // Assert
        let energies: Vec<Float> = (0..trajectory.len())
            .map(|i| pendulum_energy(&params, trajectory.state(i)))
            .collect();
        for w in energies.windows(2) {
            assert!(w[1] <= w[0] * (1. + 1e-7) + 1e-12, "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn undamped_peaks_hold() {
        // Arrange
        let params = ParameterInputs::new(1.0, GRAVITY, 45.0, 0.)
            .validate()
            .unwrap();

        // Act
        let trajectory = solve(&params, &TimeGrid::default(), &Integrator::default()).unwrap();
        let peaks = swing_peaks(&trajectory);

        // Assert
        let theta0 = params.initial_angle();
        for peak in peaks {
            // sampling can miss the true turning point by a little
            assert!(peak <= theta0 + 1e-6 && peak > 0.95 * theta0, "{}", peak);
        }
    }
}
