//! Render spectral-analysis tables as figures.
//!
//! Two pipelines share one driver ([`pipeline::run`]):
//!
//! ```text
//!  input table ─► load ─► transform ─► render ─► persist ─► (viewer)
//!
//!  groups      5 cols   rad→Hz, dB     PDF, 2 panels   groups.pdf
//!  spectral    3 cols   filter, rad→Hz PNG scatter     <input>.png
//! ```

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod ui;

pub use config::RenderConfig;
pub use error::{PipelineError, Result};
