//! Shared foundation for the Pawtrack workspace: error taxonomy,
//! configuration, and the enums used across the store and service layers.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
