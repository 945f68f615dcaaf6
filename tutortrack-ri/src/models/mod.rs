//! Data models for the resolution service

pub mod ledger;
pub mod resolve;

pub use ledger::LedgerEntry;
pub use resolve::{
    ReconcileRequest, ReconcileResponse, RecordingDto, ResolveContextDto, ResolveRequest,
    ResolveResponse, ResolvedRecording, SiblingDto,
};
