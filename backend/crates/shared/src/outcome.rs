//! Host Outcome - the decision handed back to the authentication framework
//!
//! The surrounding framework only understands three answers. Everything the
//! gate does is eventually folded into one of them.

use serde::Serialize;
use std::fmt;

/// Decision code returned to the host framework
///
/// ## Examples
/// ```rust
/// use kernel::outcome::HostCode;
///
/// assert!(HostCode::Success.is_success());
/// assert_eq!(HostCode::AuthError.exit_code(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostCode {
    /// The login may proceed
    Success,
    /// The login must be refused for this attempt
    AuthError,
    /// The gate itself is unusable (broken configuration, host failure)
    PermanentError,
}

impl HostCode {
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, HostCode::Success)
    }

    /// Process exit code used by helper binaries that the host executes
    #[inline]
    pub const fn exit_code(&self) -> u8 {
        match self {
            HostCode::Success => 0,
            HostCode::AuthError => 1,
            HostCode::PermanentError => 2,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HostCode::Success => "success",
            HostCode::AuthError => "auth_error",
            HostCode::PermanentError => "permanent_error",
        }
    }
}

impl fmt::Display for HostCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
