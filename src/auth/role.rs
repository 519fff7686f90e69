//! Role resolution and capability tags.
//!
//! The backend hands out organizational titles ("ketua divisi", "bendahara", ...)
//! as role strings. Every title is an alias of one capability class, and all
//! permission decisions downstream are made on the capability only.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::session::Session;

/// Normalized capability classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Full visibility, marks approved requests as done
    Admin,
    /// Originates fund requests
    Maker,
    /// Sends submitted requests on to approval
    Checker,
    /// Approves or rejects checked requests
    Approver,
    /// Not logged in, public report views only
    Guest,
    /// Logged in with a role string nobody recognizes
    Unknown,
}

/// Raw role string to capability. Keys are lower-case.
pub const ROLE_ALIASES: &[(&str, Capability)] = &[
    ("admin", Capability::Admin),
    ("maker", Capability::Maker),
    ("ketua divisi", Capability::Maker),
    ("checker", Capability::Checker),
    ("wakil", Capability::Checker),
    ("approver", Capability::Approver),
    ("pengurus rt", Capability::Approver),
    ("pengurus rw", Capability::Approver),
    ("bendahara", Capability::Approver),
    ("ketua panitia", Capability::Approver),
];

lazy_static! {
    static ref ROLE_TABLE: HashMap<&'static str, Capability> =
        ROLE_ALIASES.iter().copied().collect();
}

/// Map a raw role string to its capability.
///
/// Matching ignores surrounding whitespace and case. Anything outside the
/// alias table is `Unknown`.
pub fn resolve_role(raw: &str) -> Capability {
    let key = raw.trim().to_lowercase();
    ROLE_TABLE
        .get(key.as_str())
        .copied()
        .unwrap_or(Capability::Unknown)
}

impl Capability {
    /// Capability of whoever holds this session
    pub fn for_session(session: &Session) -> Self {
        if !session.is_authenticated() {
            return Capability::Guest;
        }
        session
            .role
            .as_deref()
            .map(resolve_role)
            .unwrap_or(Capability::Unknown)
    }

    /// One of the four organizational classes (not Guest/Unknown)
    pub fn is_member(&self) -> bool {
        match self {
            Capability::Admin
            | Capability::Maker
            | Capability::Checker
            | Capability::Approver => true,
            Capability::Guest | Capability::Unknown => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Admin => "admin",
            Capability::Maker => "maker",
            Capability::Checker => "checker",
            Capability::Approver => "approver",
            Capability::Guest => "guest",
            Capability::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
