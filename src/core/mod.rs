//! Core module for Alice
//!
//! This module contains configuration, error types and the capability
//! context shared by all commands.

pub mod config;
pub mod context;
pub mod error;

pub use config::Config;
pub use context::Context;
pub use error::{AliceError, AliceResult};
