// Library surface for the Titan engine and the `titan` command line front end.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;

pub use crate::core::titan;
