use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ParameterError},
    grid::{TimeGrid, DEFAULT_FINAL_TIME, DEFAULT_SAMPLES},
    integrators::Integrator,
    rest::RestThresholds,
    types::Float,
};

/// Interval between played back frames
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub t_max: Float,
    pub samples: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            t_max: DEFAULT_FINAL_TIME,
            samples: DEFAULT_SAMPLES,
        }
    }
}

/// Everything about a run that is policy rather than physics.
///
/// ```toml
/// frame_interval_ms = 20
///
/// [grid]
/// t_max = 200.0
/// samples = 2000
///
/// [rest]
/// angle = 0.01
/// omega = 0.01
///
/// [integrator]
/// method = "runge_kutta4"
/// substeps = 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub rest: RestThresholds,
    pub integrator: Integrator,
    pub frame_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid: GridConfig::default(),
            rest: RestThresholds::default(),
            integrator: Integrator::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.time_grid()?;
        self.integrator.validate()?;

        let RestThresholds { angle, omega } = self.rest;
        for (name, value) in [("rest angle threshold", angle), ("rest omega threshold", omega)] {
            if !(value.is_finite() && value > 0.) {
                return Err(ParameterError::OutOfDomain {
                    name,
                    value,
                    domain: "(0, inf)",
                });
            }
        }
        Ok(())
    }

    pub fn time_grid(&self) -> Result<TimeGrid, ParameterError> {
        TimeGrid::linspace(self.grid.t_max, self.grid.samples)
    }
}
