//! Statistical fitting.
//!
//! - Levenberg–Marquardt fit of the inverse FPS-decay model (`fitter`)
//! - maximum-likelihood normal fit of FPS samples (`normal`)

pub mod fitter;
pub mod normal;

pub use fitter::*;
pub use normal::*;
