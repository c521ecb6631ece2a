//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (process-wide CSPRNG, SHA-256 fingerprints)
//! - Redacted, zeroized secret strings
//! - Outbound HTTP client construction

pub mod crypto;
pub mod http;
pub mod secret;
