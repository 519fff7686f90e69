pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod engine;
pub mod media;
pub mod report;
pub mod router;
pub mod session;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use auth::Capability;
pub use config::Config;
pub use router::{resolve_route, RouteDecision, View};
pub use session::{Session, SessionStore};
pub use workflow::{Gate, GateDecision, Transition};
