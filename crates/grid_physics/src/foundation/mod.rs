//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Change tracking for sampled values
//! - Fixed-tick timing
//! - Logging utilities

pub mod math;
pub mod delta;
pub mod time;
pub mod logging;
