//! Evidence extractors
//!
//! Pure text scanners that pull structured signals out of recording
//! metadata: week markers, timestamps and date stamps, and participant
//! name pairs. Extractors never consult context or state; the inference
//! cascade decides what the signals mean.

pub mod dates;
pub mod names;
pub mod week_patterns;
