use crate::types::Float;

/// Invalid physical parameters, input values outside the accepted domain,
/// or a malformed time grid / integrator setup. Raised before any
/// integration starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("pendulum length must be positive, got {0}")]
    NonPositiveLength(Float),

    #[error("gravity must be positive, got {0}")]
    NonPositiveGravity(Float),

    #[error("damping coefficient must be non-negative, got {0}")]
    NegativeDamping(Float),

    #[error("initial angle must lie strictly between -pi and pi, got {0} rad")]
    InitialAngleOutOfRange(Float),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: Float },

    #[error("{name} = {value} is outside the accepted domain {domain}")]
    OutOfDomain {
        name: &'static str,
        value: Float,
        domain: &'static str,
    },

    #[error("invalid time grid: {0}")]
    InvalidGrid(String),

    #[error("invalid integrator settings: {0}")]
    InvalidIntegrator(String),
}

/// The numerical integration could not produce a trajectory. Never
/// accompanied by a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrationFailure {
    #[error("step budget of {max_steps} steps exhausted at t = {time}")]
    StepBudgetExhausted { time: Float, max_steps: usize },

    #[error("step size {step} underflowed at t = {time}")]
    StepSizeUnderflow { time: Float, step: Float },

    #[error("state became non-finite at t = {time}")]
    NonFiniteState { time: Float },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Integration(#[from] IntegrationFailure),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ParameterError),
}

#[derive(Debug, thiserror::Error)]
#[error("plotting failed: {0}")]
pub struct PlotError(pub String);
