//! Reporting utilities: formatted terminal output and chart labels.

pub mod format;

pub use format::*;
