//! # TutorTrack Common Library
//!
//! Shared code for TutorTrack services including:
//! - Event types (IngestEvent enum) and the EventBus
//! - Configuration loading and root folder resolution
//! - Common error types
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
