//! `fps-graphs` library crate.
//!
//! The binary (`fpsplot`) is a thin wrapper around this library so that:
//!
//! - loading, fitting and rendering are testable without spawning processes
//! - each plotting command is a plain function (`app::pipeline`)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
