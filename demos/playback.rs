use std::time::Duration;

use log::info;
use pendulum_rest::{
    config::SimulationConfig, params::ParameterInputs, record::RunRecord, run::PendulumSimulator,
    GRAVITY,
};

/// Drive playback from a timer the way a UI would, and restart halfway
/// through the first run. Only the second run reaches rest and is recorded.
#[tokio::main]
async fn main() {
    env_logger::init();

    let config = SimulationConfig {
        frame_interval_ms: 2,
        ..SimulationConfig::default()
    };
    let mut sim = PendulumSimulator::new(config).expect("Invalid config");
    let mut interval = tokio::time::interval(Duration::from_millis(config.frame_interval_ms));

    let mut playback = sim
        .restart(&ParameterInputs::default())
        .expect("Simulation failed");
    let restart_at = playback.stop_index() / 2;
    let mut restarted = false;

    loop {
        interval.tick().await;
        let Some(frame) = playback.next() else {
            break;
        };
        if frame.index % 100 == 0 {
            info!(
                "t = {:.2}s, bob at ({:.3}, {:.3})",
                frame.time, frame.bob.x, frame.bob.y
            );
        }

        if !restarted && frame.index == restart_at {
            info!("restarting at frame {}", frame.index);
            playback = sim
                .restart(&ParameterInputs::new(2.0, GRAVITY, 90.0, 0.8))
                .expect("Simulation failed");
            restarted = true;
        }
    }

    println!("{}", RunRecord::COLUMNS.join("\t"));
    for record in sim.run_log().iter() {
        println!("{}", record);
    }
}
