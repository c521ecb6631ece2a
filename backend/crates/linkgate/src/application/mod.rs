//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations and the per-attempt state machine.

pub mod config;
pub mod credentials;
pub mod eligibility;
pub mod notifier;
pub mod orchestrator;
pub mod poller;
pub mod token;
