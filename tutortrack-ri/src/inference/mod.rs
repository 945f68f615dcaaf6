//! Week inference
//!
//! Turns extracted evidence into a single program week per recording.
//! The cascade runs ordered tiers over a shared read-only context and
//! always produces an answer, tagged with confidence and method.

pub mod cascade;
pub mod context;
pub mod history;
pub mod relative;
pub mod stats;
pub mod tiers;

pub use cascade::WeekInferenceEngine;
pub use context::{ConfidenceLadder, InferenceContext, SiblingSession};
pub use history::MemoryWeekHistory;
pub use stats::MethodTally;
