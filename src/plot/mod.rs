//! Chart rendering to PNG files.

pub mod charts;

pub use charts::*;
