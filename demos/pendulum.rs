use std::{env, fs};

use log::info;
use pendulum_rest::{
    config::SimulationConfig, params::ParameterInputs, plot::plot_trajectory, record::RunRecord,
    run::PendulumSimulator,
};

/// Play a few runs to rest, print the run table and plot the first run.
/// An optional TOML config path may be given as the first argument.
pub fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let s = fs::read_to_string(&path).expect("Unable to read config file");
            SimulationConfig::from_toml_str(&s).expect("Invalid config file")
        }
        None => SimulationConfig::default(),
    };
    let mut sim = PendulumSimulator::new(config).expect("Invalid config");

    let reference = ParameterInputs::default();
    let runs = [
        reference,
        ParameterInputs {
            damping: 0.0,
            ..reference
        },
        ParameterInputs::new(2.5, 3.7, 120.0, 0.5),
    ];

    let mut first = None;
    for inputs in &runs {
        let playback = sim.restart(inputs).expect("Simulation failed");
        let context = playback.context().clone();
        let frames = playback.count();
        info!("played {} frames of {:?}", frames, inputs);
        first.get_or_insert(context);
    }

    println!("{}", RunRecord::COLUMNS.join("\t"));
    for record in sim.run_log().iter() {
        println!("{}", record);
    }

    if let Some(context) = first {
        plot_trajectory("plot.png", &context.trajectory, context.stop_index)
            .expect("Unable to plot trajectory");
    }
}
