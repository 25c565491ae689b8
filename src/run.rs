use std::sync::{Arc, PoisonError, RwLock};

use flume::{Receiver, Sender};
use log::{debug, info, warn};
use na::Vector2;

use crate::{
    config::SimulationConfig,
    error::{ParameterError, SimulationError},
    grid::TimeGrid,
    params::{ParameterInputs, SimulationParameters},
    record::{RunLog, RunRecord},
    rest::{detect_stop, RestThresholds},
    simulate::{solve, Trajectory},
    types::Float,
};

/// Bob position (x, y) for a rod of length L hanging from the origin at
/// angle θ from the downward vertical.
pub fn bob_position(length: Float, theta: Float) -> Vector2<Float> {
    Vector2::new(length * theta.sin(), -length * theta.cos())
}

/// Render input for a single playback step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub time: Float,
    pub theta: Float,
    pub omega: Float,
    pub bob: Vector2<Float>,
}

/// Everything one run produced. Immutable; replaced as a whole on restart.
#[derive(Debug)]
pub struct RunContext {
    pub params: SimulationParameters,
    pub trajectory: Trajectory,
    pub stop_index: usize,
}

impl RunContext {
    pub fn new(
        params: SimulationParameters,
        trajectory: Trajectory,
        thresholds: &RestThresholds,
    ) -> Self {
        let stop_index = detect_stop(&trajectory, thresholds);
        RunContext {
            params,
            trajectory,
            stop_index,
        }
    }

    pub fn final_time(&self) -> Float {
        self.trajectory.time(self.stop_index)
    }

    pub fn frame(&self, i: usize) -> Frame {
        let sample = self.trajectory.sample(i);
        Frame {
            index: i,
            time: sample.time,
            theta: sample.theta,
            omega: sample.omega,
            bob: bob_position(self.params.length(), sample.theta),
        }
    }

    pub fn record(&self) -> RunRecord {
        RunRecord::new(&self.params, self.final_time())
    }
}

/// The installed run and the generation that playback must match to keep
/// going. Bumping the generation cancels every playback handed out before.
#[derive(Debug, Default)]
struct Installed {
    generation: u64,
    context: Option<Arc<RunContext>>,
}

/// Owns the current run, restarts it on request and collects the records of
/// completed playbacks.
pub struct PendulumSimulator {
    config: SimulationConfig,
    grid: TimeGrid,
    installed: Arc<RwLock<Installed>>,
    sender: Sender<RunRecord>,
    receiver: Receiver<RunRecord>,
    log: RunLog,
}

impl PendulumSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        let grid = config.time_grid()?;
        let (sender, receiver) = flume::unbounded();

        Ok(PendulumSimulator {
            config,
            grid,
            installed: Arc::new(RwLock::new(Installed::default())),
            sender,
            receiver,
            log: RunLog::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The installed run, if any run has succeeded yet
    pub fn current(&self) -> Option<Arc<RunContext>> {
        self.installed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .context
            .clone()
    }

    /// Stop any in-flight playback. Waits for a playback step in progress to
    /// finish, so that step's record, if any, is already sent on return.
    pub fn cancel(&self) {
        let mut installed = self.installed.write().unwrap_or_else(PoisonError::into_inner);
        installed.generation += 1;
        debug!("playback generation {} cancelled", installed.generation - 1);
    }

    /// Start a new run.
    ///
    /// Invalid inputs are rejected before anything else happens, leaving the
    /// in-flight playback running. Otherwise the in-flight playback is
    /// cancelled, the new trajectory is solved, and the new run is installed
    /// as a unit. If solving fails the previous run stays installed.
    pub fn restart(&mut self, inputs: &ParameterInputs) -> Result<Playback, SimulationError> {
        let params = inputs.validate()?;

        self.cancel();

        let trajectory = solve(&params, &self.grid, &self.config.integrator).map_err(|e| {
            warn!("restart failed, keeping previous run: {}", e);
            e
        })?;
        let context = Arc::new(RunContext::new(params, trajectory, &self.config.rest));

        let generation = {
            let mut installed = self.installed.write().unwrap_or_else(PoisonError::into_inner);
            installed.generation += 1;
            installed.context = Some(context.clone());
            installed.generation
        };

        info!(
            "run {} installed: stop index {} at t = {:.2}s",
            generation,
            context.stop_index,
            context.final_time()
        );

        Ok(Playback {
            context,
            generation,
            installed: self.installed.clone(),
            sender: self.sender.clone(),
            next: 0,
        })
    }

    /// Records of all completed playbacks, in completion order
    pub fn run_log(&mut self) -> &RunLog {
        for record in self.receiver.try_iter() {
            self.log.append(record);
        }
        &self.log
    }
}

/// Step sequence over frames 0..=stop_index of one run.
///
/// Yields nothing once cancelled by a restart. Yielding the frame at the
/// stop index emits the run's record, exactly once.
pub struct Playback {
    context: Arc<RunContext>,
    generation: u64,
    installed: Arc<RwLock<Installed>>,
    sender: Sender<RunRecord>,
    next: usize,
}

impl Playback {
    pub fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    pub fn stop_index(&self) -> usize {
        self.context.stop_index
    }

    pub fn is_cancelled(&self) -> bool {
        self.installed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            != self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.next > self.context.stop_index
    }
}

impl Iterator for Playback {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.is_finished() {
            return None;
        }

        // Held for the whole step so a restart cannot slip in between the
        // generation check and the record.
        let installed = self.installed.read().unwrap_or_else(PoisonError::into_inner);
        if installed.generation != self.generation {
            self.next = self.context.stop_index + 1;
            return None;
        }

        let frame = self.context.frame(self.next);
        if self.next == self.context.stop_index {
            // receiver lives in the simulator; nothing to record into once it is gone
            let _ = self.sender.send(self.context.record());
        }
        self.next += 1;

        Some(frame)
    }
}
