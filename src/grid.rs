use std::{ops::Index, sync::Arc};

use crate::{error::ParameterError, types::Float};

pub const DEFAULT_FINAL_TIME: Float = 200.0;
pub const DEFAULT_SAMPLES: usize = 2000;

/// Evenly spaced sample times over [0, t_max], both ends included.
///
/// Cloning is cheap: the times are shared read-only between the grid and
/// every trajectory solved on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Arc<[Float]>,
}

impl TimeGrid {
    pub fn linspace(t_max: Float, samples: usize) -> Result<Self, ParameterError> {
        if !t_max.is_finite() || t_max <= 0. {
            return Err(ParameterError::InvalidGrid(format!(
                "final time must be positive and finite, got {}",
                t_max
            )));
        }
        if samples < 2 {
            return Err(ParameterError::InvalidGrid(format!(
                "need at least 2 samples, got {}",
                samples
            )));
        }

        Ok(TimeGrid {
            times: evenly_spaced(t_max, samples),
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.times.len() - 1
    }

    pub fn final_time(&self) -> Float {
        self.times[self.last_index()]
    }

    pub fn as_slice(&self) -> &[Float] {
        &self.times
    }

    pub fn iter(&self) -> impl Iterator<Item = &Float> {
        self.times.iter()
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        TimeGrid {
            times: evenly_spaced(DEFAULT_FINAL_TIME, DEFAULT_SAMPLES),
        }
    }
}

/// Last sample is pinned to t_max so no rounding drift can move the grid end.
fn evenly_spaced(t_max: Float, samples: usize) -> Arc<[Float]> {
    let dt = t_max / (samples - 1) as Float;
    (0..samples)
        .map(|i| {
            if i == samples - 1 {
                t_max
            } else {
                i as Float * dt
            }
        })
        .collect()
}

impl Index<usize> for TimeGrid {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.times[i]
    }
}
