//! Per-method inference counts
//!
//! Tallies are plain values built up during a pass and returned with the
//! results, so concurrent passes never share state.

use serde::{Deserialize, Serialize};

use crate::types::InferenceMethod;

/// How many recordings each inference method decided
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTally {
    pub explicit_metadata: u32,
    pub timestamp_arithmetic: u32,
    pub historical_lookup: u32,
    pub interpolation: u32,
    pub extrapolation: u32,
    pub folder_name: u32,
    pub sequential_fallback: u32,
    pub program_default: u32,
    pub pattern_fallback: u32,
    pub default_fallback: u32,
}

impl MethodTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one decided recording
    pub fn record(&mut self, method: InferenceMethod) {
        match method {
            InferenceMethod::ExplicitMetadata => self.explicit_metadata += 1,
            InferenceMethod::TimestampArithmetic => self.timestamp_arithmetic += 1,
            InferenceMethod::HistoricalLookup => self.historical_lookup += 1,
            InferenceMethod::Interpolation => self.interpolation += 1,
            InferenceMethod::Extrapolation => self.extrapolation += 1,
            InferenceMethod::FolderName => self.folder_name += 1,
            InferenceMethod::SequentialFallback => self.sequential_fallback += 1,
            InferenceMethod::ProgramDefault => self.program_default += 1,
            InferenceMethod::PatternFallback => self.pattern_fallback += 1,
            InferenceMethod::DefaultFallback => self.default_fallback += 1,
        }
    }

    /// Total recordings tallied
    pub fn total(&self) -> u32 {
        self.explicit_metadata
            + self.timestamp_arithmetic
            + self.historical_lookup
            + self.interpolation
            + self.extrapolation
            + self.folder_name
            + self.sequential_fallback
            + self.program_default
            + self.pattern_fallback
            + self.default_fallback
    }

    /// One-line summary of the non-zero counts, for logs
    pub fn display_string(&self) -> String {
        let pairs = [
            ("explicit_metadata", self.explicit_metadata),
            ("timestamp_arithmetic", self.timestamp_arithmetic),
            ("historical_lookup", self.historical_lookup),
            ("interpolation", self.interpolation),
            ("extrapolation", self.extrapolation),
            ("folder_name", self.folder_name),
            ("sequential_fallback", self.sequential_fallback),
            ("program_default", self.program_default),
            ("pattern_fallback", self.pattern_fallback),
            ("default_fallback", self.default_fallback),
        ];

        let parts: Vec<String> = pairs
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| format!("{}={}", name, count))
            .collect();

        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" ")
        }
    }
}
