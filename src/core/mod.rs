//! Core module tree: the Titan engine plus its error type and debug logger.

#[macro_use]
pub mod debug; // gated debug logging (TITAN_DEBUG=1) provides debug_log! macro
pub mod error;
pub mod titan;

pub use error::{Result, TitanError};
