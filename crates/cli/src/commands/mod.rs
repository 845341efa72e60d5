//! CLI commands

pub mod sample;
