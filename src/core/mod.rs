//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod random;
pub mod color;

pub use types::*;
pub use error::Error;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use color::Rgb;
