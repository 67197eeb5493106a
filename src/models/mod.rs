//! FPS model implementations.
//!
//! Models are implemented as small, pure functions so that fitting and plotting
//! code can share them.

pub mod model;

pub use model::*;
