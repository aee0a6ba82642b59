//! dotchart - Reusable animated dot charts
//!
//! A configurable scatter/bubble chart with enter/update/exit transitions,
//! plus CSV ingestion, SVG/PNG export, a command line and an egui viewer.

pub mod charts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod gui;
pub mod playback;

pub use charts::{ChartTarget, DotChart, Point, Scene, Transition};
pub use config::{ChartSettings, ConfigError};

/// Process exit code for bad input, settings or I/O failures.
pub const EXIT_ERROR: i32 = 2;
