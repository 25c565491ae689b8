use wasm_bindgen::prelude::*;
use web_sys::js_sys::Float32Array;

use crate::{
    config::SimulationConfig,
    params::ParameterInputs,
    run::{PendulumSimulator, Playback},
    toJsFloat32Array,
    types::Float,
};

pub mod util;

/// Number of values per row returned by `records`
pub const RECORD_WIDTH: usize = 5;

/// WebAssembly interface to the pendulum simulator. The page owns the
/// animation loop and calls `step` once per frame.
#[wasm_bindgen]
pub struct InterfacePendulumSimulator {
    inner: PendulumSimulator,
    playback: Option<Playback>,
}

#[wasm_bindgen]
impl InterfacePendulumSimulator {
    /// Cancel the current animation and start a new run. Angle in degrees.
    pub fn restart(
        &mut self,
        length: Float,
        gravity: Float,
        angle_degrees: Float,
        damping: Float,
    ) -> Result<(), JsValue> {
        let inputs = ParameterInputs::new(length, gravity, angle_degrees, damping);
        let playback = self
            .inner
            .restart(&inputs)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.playback = Some(playback);
        Ok(())
    }

    /// Next frame as [time, x, y], or undefined once the run is at rest
    pub fn step(&mut self) -> Option<Float32Array> {
        let frame = self.playback.as_mut()?.next()?;
        Some(toJsFloat32Array!([frame.time, frame.bob.x, frame.bob.y]))
    }

    #[wasm_bindgen(js_name = stopIndex)]
    pub fn stop_index(&self) -> Option<u32> {
        self.playback.as_ref().map(|p| p.stop_index() as u32)
    }

    #[wasm_bindgen(js_name = frameIntervalMs)]
    pub fn frame_interval_ms(&self) -> u32 {
        self.inner.config().frame_interval_ms as u32
    }

    /// All run records so far, flattened row by row as
    /// [L, g, θ0 (deg), b, final time, ...]
    pub fn records(&mut self) -> Float32Array {
        let rows: Vec<Float> = self
            .inner
            .run_log()
            .iter()
            .flat_map(|r| {
                [
                    r.length,
                    r.gravity,
                    r.initial_angle_degrees,
                    r.damping,
                    r.final_time,
                ]
            })
            .collect();
        toJsFloat32Array!(rows)
    }
}

#[wasm_bindgen]
pub fn createPendulumSimulator() -> Result<InterfacePendulumSimulator, JsValue> {
    console_error_panic_hook::set_once();

    let inner = PendulumSimulator::new(SimulationConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(InterfacePendulumSimulator {
        inner,
        playback: None,
    })
}
