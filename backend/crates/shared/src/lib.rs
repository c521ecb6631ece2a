//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the gate
//! and its host front-ends:
//! - The host decision codes ([`outcome::HostCode`])
//! - Common error types and result aliases
//! - Typed identifiers used to correlate diagnostics
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
pub mod outcome;
