//! SKYSHIELD command-line runner.
//!
//! This crate wires the simulation engine to a headless or wall-clock paced
//! loop, an operator console, and a run summary.

pub mod console;
pub mod game_loop;
pub mod state;

pub use skyshield_core as core;
