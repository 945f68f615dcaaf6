//! Identity matching
//!
//! Decides which recordings in one corpus are the same sessions as
//! recordings in another. An index over the target corpus is built
//! first; queries then run a fixed cascade from exact ids down to
//! weighted similarity.

pub mod index;
pub mod matcher;
pub mod similarity;

pub use index::RecordingIndex;
pub use matcher::match_recording;
