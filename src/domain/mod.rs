//! Domain types used throughout the pipelines.
//!
//! This module defines:
//!
//! - input rows (`MeanRow`)
//! - fit outputs (`InverseFit`, `NormalFit`, `Histogram`)
//! - plotting configuration (`Invocation`, `PlotConfig`, `FrameAxis`, `ImageSize`)

pub mod types;

pub use types::*;
