//! Infrastructure Layer - Port implementations
//!
//! - `directory` - local account and group files
//! - `credential_file` - per-user credential records on disk
//! - `telegram` - Telegram Bot API message channel
//! - `verification` - HTTP verification service client
//! - `diagnostics` - diagnostic sinks

pub mod credential_file;
pub mod diagnostics;
pub mod directory;
pub mod telegram;
pub mod verification;
