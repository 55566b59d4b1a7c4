//! # wadrive-core
//!
//! Core types, the `Device` trait, configuration, and error handling for wadrive.

pub mod config;
pub mod error;
pub mod geometry;
pub mod locator;
pub mod text;
pub mod traits;
