//! Authorization: role strings to capabilities.

pub mod role;

pub use role::{resolve_role, Capability, ROLE_ALIASES};
