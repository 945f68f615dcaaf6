//! Reconciliation
//!
//! Cross-checks one corpus of recordings against another and reports
//! what matched, what probably matched, and what is missing.

pub mod report;

pub use report::{build_report, ReconciliationReport, ReportRow};
