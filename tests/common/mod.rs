//! Common test utilities for Housekeeper CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated home, config and state directories
//! - `IsolatedEnvExt`: points a `Command` at those directories

#![allow(dead_code)]

pub mod env;

pub use env::*;
