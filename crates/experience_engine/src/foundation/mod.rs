//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Frame time management
//! - Logging utilities

pub mod logging;
pub mod math;
pub mod time;
