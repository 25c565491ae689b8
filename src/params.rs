use serde::{Deserialize, Serialize};

use crate::{error::ParameterError, types::Float, GRAVITY, PI};

/// Physical parameters of one damped pendulum run.
///
/// Only constructible through [`SimulationParameters::new`], so a value of
/// this type always describes a solvable system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    length: Float,
    gravity: Float,
    initial_angle: Float, // rad
    damping: Float,
}

impl SimulationParameters {
    pub fn new(
        length: Float,
        gravity: Float,
        initial_angle: Float,
        damping: Float,
    ) -> Result<Self, ParameterError> {
        check_finite("length", length)?;
        check_finite("gravity", gravity)?;
        check_finite("initial angle", initial_angle)?;
        check_finite("damping", damping)?;

        if length <= 0. {
            return Err(ParameterError::NonPositiveLength(length));
        }
        if gravity <= 0. {
            return Err(ParameterError::NonPositiveGravity(gravity));
        }
        if damping < 0. {
            return Err(ParameterError::NegativeDamping(damping));
        }
        if initial_angle.abs() >= PI {
            return Err(ParameterError::InitialAngleOutOfRange(initial_angle));
        }

        Ok(SimulationParameters {
            length,
            gravity,
            initial_angle,
            damping,
        })
    }

    pub fn length(&self) -> Float {
        self.length
    }

    pub fn gravity(&self) -> Float {
        self.gravity
    }

    /// Initial angular displacement in radians
    pub fn initial_angle(&self) -> Float {
        self.initial_angle
    }

    pub fn initial_angle_degrees(&self) -> Float {
        self.initial_angle.to_degrees()
    }

    pub fn damping(&self) -> Float {
        self.damping
    }
}

fn check_finite(name: &'static str, value: Float) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFinite { name, value })
    }
}

/// Raw values as they come from the configuration/UI layer, with the
/// initial angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterInputs {
    pub length: Float,
    pub gravity: Float,
    pub angle_degrees: Float,
    pub damping: Float,
}

impl Default for ParameterInputs {
    fn default() -> Self {
        ParameterInputs {
            length: 1.0,
            gravity: GRAVITY,
            angle_degrees: 45.0,
            damping: 0.1,
        }
    }
}

impl ParameterInputs {
    pub fn new(length: Float, gravity: Float, angle_degrees: Float, damping: Float) -> Self {
        ParameterInputs {
            length,
            gravity,
            angle_degrees,
            damping,
        }
    }

    /// Check every input against its accepted domain and convert the angle
    /// to radians.
    ///
    /// Domains: length (0.1, 5.0] m, gravity [1, 25] m/s², angle [1, 179]
    /// degrees, damping [0, 1].
    pub fn validate(&self) -> Result<SimulationParameters, ParameterError> {
        check_finite("length", self.length)?;
        check_finite("gravity", self.gravity)?;
        check_finite("initial angle", self.angle_degrees)?;
        check_finite("damping", self.damping)?;

        if !(self.length > 0.1 && self.length <= 5.0) {
            return Err(ParameterError::OutOfDomain {
                name: "length",
                value: self.length,
                domain: "(0.1, 5.0]",
            });
        }
        if !(1.0..=25.0).contains(&self.gravity) {
            return Err(ParameterError::OutOfDomain {
                name: "gravity",
                value: self.gravity,
                domain: "[1.0, 25.0]",
            });
        }
        if !(1.0..=179.0).contains(&self.angle_degrees) {
            return Err(ParameterError::OutOfDomain {
                name: "initial angle",
                value: self.angle_degrees,
                domain: "[1, 179] degrees",
            });
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ParameterError::OutOfDomain {
                name: "damping",
                value: self.damping,
                domain: "[0.0, 1.0]",
            });
        }

        SimulationParameters::new(
            self.length,
            self.gravity,
            self.angle_degrees.to_radians(),
            self.damping,
        )
    }
}
