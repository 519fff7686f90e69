//! Fund-request state machine and the gate in front of it.
//!
//! The gate only answers "may this caller attempt this transition now".
//! State itself changes on the backend; a record's status here is whatever
//! the last fetch returned.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;

/// Status of a fund request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundStatus {
    Submitted,
    Checking,
    Approved,
    Rejected,
    Done,
}

impl FundStatus {
    pub const ALL: [FundStatus; 5] = [
        FundStatus::Submitted,
        FundStatus::Checking,
        FundStatus::Approved,
        FundStatus::Rejected,
        FundStatus::Done,
    ];

    /// No transition leaves this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, FundStatus::Done | FundStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundStatus::Submitted => "submitted",
            FundStatus::Checking => "checking",
            FundStatus::Approved => "approved",
            FundStatus::Rejected => "rejected",
            FundStatus::Done => "done",
        }
    }

    /// Title-cased badge text
    pub fn label(&self) -> &'static str {
        match self {
            FundStatus::Submitted => "Submitted",
            FundStatus::Checking => "Checking",
            FundStatus::Approved => "Approved",
            FundStatus::Rejected => "Rejected",
            FundStatus::Done => "Done",
        }
    }
}

impl std::fmt::Display for FundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(FundStatus::Submitted),
            "checking" => Ok(FundStatus::Checking),
            "approved" => Ok(FundStatus::Approved),
            "rejected" => Ok(FundStatus::Rejected),
            "done" => Ok(FundStatus::Done),
            _ => Err(format!("Unknown fund request status: {}", s)),
        }
    }
}

/// Requested move through the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Create a request (no prior state)
    Submit,
    /// submitted -> checking
    SendToApproval,
    /// checking -> approved
    Approve,
    /// checking -> rejected
    Reject,
    /// approved -> done
    MarkDone,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::Submit,
        Transition::SendToApproval,
        Transition::Approve,
        Transition::Reject,
        Transition::MarkDone,
    ];

    /// Status the record must currently have (`None` for creation)
    pub fn source(&self) -> Option<FundStatus> {
        match self {
            Transition::Submit => None,
            Transition::SendToApproval => Some(FundStatus::Submitted),
            Transition::Approve | Transition::Reject => Some(FundStatus::Checking),
            Transition::MarkDone => Some(FundStatus::Approved),
        }
    }

    pub fn target(&self) -> FundStatus {
        match self {
            Transition::Submit => FundStatus::Submitted,
            Transition::SendToApproval => FundStatus::Checking,
            Transition::Approve => FundStatus::Approved,
            Transition::Reject => FundStatus::Rejected,
            Transition::MarkDone => FundStatus::Done,
        }
    }

    /// The only capability allowed to trigger this transition
    pub fn required_capability(&self) -> Capability {
        match self {
            Transition::Submit => Capability::Maker,
            Transition::SendToApproval => Capability::Checker,
            Transition::Approve | Transition::Reject => Capability::Approver,
            Transition::MarkDone => Capability::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::SendToApproval => "send",
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::MarkDone => "done",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the gate refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The record is done or rejected
    Terminal(FundStatus),
    /// The transition does not start from the record's status
    WrongState {
        current: Option<FundStatus>,
        expected: Option<FundStatus>,
    },
    /// The caller's capability is not the one the transition needs
    MissingCapability {
        required: Capability,
        actual: Capability,
    },
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::Terminal(status) => {
                write!(f, "request is already {} and cannot change", status)
            }
            DenialReason::WrongState { current, expected } => {
                let show = |s: &Option<FundStatus>| match s {
                    Some(s) => s.as_str(),
                    None => "new",
                };
                write!(
                    f,
                    "request is {} but this action needs it to be {}",
                    show(current),
                    show(expected)
                )
            }
            DenialReason::MissingCapability { required, actual } => {
                write!(f, "action requires {} (caller is {})", required, actual)
            }
        }
    }
}

/// Gate verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Denied(DenialReason),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Decides which workflow transitions a caller may attempt
pub struct Gate;

impl Gate {
    /// Check one transition.
    ///
    /// Total and pure: state is checked before capability, so a terminal or
    /// out-of-order record is reported as such regardless of who asks.
    pub fn check(
        current: Option<FundStatus>,
        capability: Capability,
        transition: Transition,
    ) -> GateDecision {
        if let Some(status) = current {
            if status.is_terminal() {
                return GateDecision::Denied(DenialReason::Terminal(status));
            }
        }

        let expected = transition.source();
        if current != expected {
            return GateDecision::Denied(DenialReason::WrongState { current, expected });
        }

        let required = transition.required_capability();
        if capability != required {
            return GateDecision::Denied(DenialReason::MissingCapability {
                required,
                actual: capability,
            });
        }

        GateDecision::Allowed
    }

    /// Transitions the caller may attempt on a record in `status`
    pub fn available(status: FundStatus, capability: Capability) -> Vec<Transition> {
        Transition::ALL
            .into_iter()
            .filter(|t| Self::check(Some(status), capability, *t).is_allowed())
            .collect()
    }
}
