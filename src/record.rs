use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{params::SimulationParameters, types::Float};

/// Summary row written once per run, when playback reaches the stop index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub length: Float,
    pub gravity: Float,
    pub initial_angle_degrees: Float,
    pub damping: Float,
    pub final_time: Float,
}

impl RunRecord {
    pub const COLUMNS: [&'static str; 5] = [
        "Length (L)",
        "Gravity (g)",
        "Initial Angle (θ₀)",
        "Damping (b)",
        "Final Time (s)",
    ];

    pub fn new(params: &SimulationParameters, final_time: Float) -> Self {
        RunRecord {
            length: params.length(),
            gravity: params.gravity(),
            initial_angle_degrees: params.initial_angle_degrees(),
            damping: params.damping(),
            final_time,
        }
    }
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}\t{:.2}\t{:.1}\t{:.2}\t{:.2}",
            self.length, self.gravity, self.initial_angle_degrees, self.damping, self.final_time
        )
    }
}

/// Append-only log of run records, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLog {
    records: Vec<RunRecord>,
}

impl RunLog {
    pub fn new() -> Self {
        RunLog::default()
    }

    pub fn append(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&RunRecord> {
        self.records.last()
    }

    pub fn as_slice(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod record_tests {
    use crate::{params::ParameterInputs, GRAVITY};

    use super::*;

    #[test]
    fn record_from_parameters() {
        // Arrange
        let params = ParameterInputs::new(1.0, GRAVITY, 45.0, 0.1)
            .validate()
            .unwrap();

        // Act
        let record = RunRecord::new(&params, 123.456);

        // Assert
        crate::assert_close!(record.initial_angle_degrees, 45.0, 1e-12);
        assert_eq!(record.final_time, 123.456);
        assert_eq!(record.to_string(), "1.00\t9.81\t45.0\t0.10\t123.46");
    }

    #[test]
    fn log_keeps_insertion_order() {
        // Arrange
        let mut log = RunLog::new();
        let a = ParameterInputs::new(1.0, GRAVITY, 30.0, 0.1).validate().unwrap();
        let b = ParameterInputs::new(2.0, GRAVITY, 60.0, 0.2).validate().unwrap();

        // Act
        log.append(RunRecord::new(&b, 2.0));
        log.append(RunRecord::new(&a, 1.0));

        // Assert
        assert_eq!(log.len(), 2);
        let times: Vec<Float> = log.iter().map(|r| r.final_time).collect();
        assert_eq!(times, vec![2.0, 1.0]);
        assert_eq!(log.last().map(|r| r.length), Some(1.0));
    }
}
