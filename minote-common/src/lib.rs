//! # MiNote Common Library
//!
//! Shared code for the MiNote mood journal including:
//! - Mood record models (local and externally sourced)
//! - Configuration loading and atomic config writes
//! - Fixed-format timestamp helpers
//! - Tag catalog (default mood/activity labels, colors, icons)
//! - Human-readable duration display

pub mod config;
pub mod error;
pub mod human_time;
pub mod models;
pub mod tags;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{ExternalMoodRecord, MoodRecord};
pub use tags::TagCatalog;
