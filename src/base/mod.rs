//! Core components, types, and utilities for the bot library.
//!
//! This module contains fundamental building blocks used throughout the crate:
//! - Configuration handling and environment variables.
//! - Typed library errors and the diagnostic sink they are reported to.
//! - Common result aliases.

pub mod config;
pub mod error;
pub mod sink;
pub mod types;
