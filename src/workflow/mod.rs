//! Fund-request ("pengajuan") approval workflow.

pub mod gate;
pub mod service;

pub use gate::{DenialReason, FundStatus, Gate, GateDecision, Transition};
pub use service::{ActionError, FundRequestService, Notice, NoticeKind, RequestBoard};
