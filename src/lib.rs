//! envcast: typed configuration value resolver
//!
//! A library for reading named values from the environment and `.env`
//! files, casting them to typed values with composable cast functions,
//! and reporting failures through a small error taxonomy.

pub mod cast;
pub mod config;
pub mod source;
