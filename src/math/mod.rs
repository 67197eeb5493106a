//! Mathematical utilities: least squares solvers and descriptive statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
