//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps every failure onto a host decision.

use serde::Serialize;

use crate::outcome::HostCode;

/// Failure classification
///
/// Each variant maps to exactly one [`HostCode`]. Variants describe what the
/// user experienced, not which component failed, so the host-facing message
/// never depends on internals.
///
/// ## Notes
/// * `non_exhaustive` - new kinds may be added later
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
/// use kernel::outcome::HostCode;
///
/// let kind = ErrorKind::DeliveryFailed;
/// assert_eq!(kind.host_code(), HostCode::AuthError);
/// assert_eq!(kind.as_str(), "Delivery Failed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// The challenge could not be prepared for this user
    ChallengeUnavailable,
    /// The confirmation link could not be delivered
    DeliveryFailed,
    /// No confirmation arrived in time
    ConfirmationMissing,
    /// The user explicitly rejected the login
    Rejected,
    /// The gate configuration is unusable
    Misconfigured,
    /// Anything else that prevents the gate from running
    Internal,
}

impl ErrorKind {
    /// Host decision for this kind
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// use kernel::outcome::HostCode;
    /// assert_eq!(ErrorKind::Rejected.host_code(), HostCode::AuthError);
    /// assert_eq!(ErrorKind::Internal.host_code(), HostCode::PermanentError);
    /// ```
    #[inline]
    pub const fn host_code(&self) -> HostCode {
        match self {
            ErrorKind::ChallengeUnavailable
            | ErrorKind::DeliveryFailed
            | ErrorKind::ConfirmationMissing
            | ErrorKind::Rejected => HostCode::AuthError,
            ErrorKind::Misconfigured | ErrorKind::Internal => HostCode::PermanentError,
        }
    }

    /// Short human-readable label
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ChallengeUnavailable => "Challenge Unavailable",
            ErrorKind::DeliveryFailed => "Delivery Failed",
            ErrorKind::ConfirmationMissing => "Confirmation Missing",
            ErrorKind::Rejected => "Rejected",
            ErrorKind::Misconfigured => "Misconfigured",
            ErrorKind::Internal => "Internal",
        }
    }

    /// Whether this failure is a property of the installation rather than of
    /// the attempt. These should be logged at error level.
    #[inline]
    pub const fn is_permanent(&self) -> bool {
        matches!(self.host_code(), HostCode::PermanentError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_codes() {
        assert_eq!(ErrorKind::ChallengeUnavailable.host_code(), HostCode::AuthError);
        assert_eq!(ErrorKind::DeliveryFailed.host_code(), HostCode::AuthError);
        assert_eq!(ErrorKind::ConfirmationMissing.host_code(), HostCode::AuthError);
        assert_eq!(ErrorKind::Rejected.host_code(), HostCode::AuthError);
        assert_eq!(ErrorKind::Misconfigured.host_code(), HostCode::PermanentError);
        assert_eq!(ErrorKind::Internal.host_code(), HostCode::PermanentError);
    }

    #[test]
    fn test_is_permanent() {
        assert!(!ErrorKind::DeliveryFailed.is_permanent());
        assert!(!ErrorKind::ConfirmationMissing.is_permanent());
        assert!(ErrorKind::Misconfigured.is_permanent());
        assert!(ErrorKind::Internal.is_permanent());
    }
}
