//! The Desert Nomad authentication bridge.

pub mod decision;
pub mod service;

pub use decision::{AbstainReason, Decision, Rejection};
pub use service::AuthBridge;
