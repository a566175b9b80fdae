//! Core types and definitions for the SKYSHIELD simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, configuration, events, snapshots and
//! constants. It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
