#![allow(non_snake_case)]

use types::Float;
pub extern crate nalgebra as na;

pub mod config;
pub mod dynamics;
pub mod energy;
pub mod error;
pub mod grid;
pub mod integrators;
pub mod params;
pub mod plot;
pub mod record;
pub mod rest;
pub mod run;
pub mod simulate;
pub mod types;
pub mod util;

// Wasm bindings
pub mod interface;

pub const GRAVITY: Float = 9.81;

pub const PI: Float = std::f64::consts::PI;

pub const TWO_PI: Float = 2. * PI;
