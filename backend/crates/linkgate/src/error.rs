//! Gate Error Types
//!
//! Gate-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Variant payloads are for logs only; the
//! text shown at the login prompt comes from the `AppError` conversion.

use std::time::Duration;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::ChallengeState;

/// Gate result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Key is not a recognised setting
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Module argument is not of the form `key=value`
    #[error("Malformed argument (expected key=value): {0}")]
    MalformedArgument(String),

    /// Value cannot be used for the key
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Group or user directory could not answer
    #[error("Identity lookup failed: {0}")]
    IdentityLookup(String),

    /// Per-user delivery record missing or malformed
    #[error("Credential resolution failed: {0}")]
    CredentialResolution(String),

    /// The messaging channel did not accept the confirmation link
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    /// A single status query could not be completed
    #[error("Verification query failed: {0}")]
    Verification(String),

    /// Polling ended without a confirmation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The user rejected the login through the verification service
    #[error("Challenge denied by user")]
    Denied,

    /// The whole attempt exceeded its deadline
    #[error("Attempt exceeded overall deadline of {0:?}")]
    Timeout(Duration),

    /// Illegal challenge state change
    #[error("Invalid challenge transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ChallengeState,
        to: ChallengeState,
    },

    /// Host did not supply a usable username
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::IdentityLookup(_) | GateError::CredentialResolution(_) => {
                ErrorKind::ChallengeUnavailable
            }
            GateError::Dispatch(_) => ErrorKind::DeliveryFailed,
            GateError::Verification(_) | GateError::Validation(_) | GateError::Timeout(_) => {
                ErrorKind::ConfirmationMissing
            }
            GateError::Denied => ErrorKind::Rejected,
            GateError::Config(_) => ErrorKind::Misconfigured,
            GateError::InvalidTransition { .. }
            | GateError::InvalidUsername(_)
            | GateError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            GateError::Config(e) => {
                tracing::error!(error = %e, "Gate configuration error");
            }
            GateError::Internal(msg) => {
                tracing::error!(message = %msg, "Gate internal error");
            }
            GateError::InvalidTransition { from, to } => {
                tracing::error!(?from, ?to, "Gate state machine violation");
            }
            GateError::CredentialResolution(msg) => {
                tracing::warn!(reason = %msg, "Failed to load chat target and bot credential");
            }
            GateError::Dispatch(msg) => {
                tracing::warn!(reason = %msg, "Failed to send authentication link");
            }
            _ => {
                tracing::info!(error = %self, "Second factor not completed");
            }
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        let kind = err.kind();
        let app = match kind {
            ErrorKind::ChallengeUnavailable => {
                AppError::challenge_unavailable("Two-factor authentication could not be started.")
                    .with_action("Contact your administrator. Login denied.")
            }
            ErrorKind::DeliveryFailed => {
                AppError::delivery_failed("Error: Failed to send authentication link.")
                    .with_action("Please try again. Login denied.")
            }
            ErrorKind::ConfirmationMissing => {
                AppError::confirmation_missing("Token validation failed.")
                    .with_action("Login denied.")
            }
            ErrorKind::Rejected => {
                AppError::rejected("Login was rejected from the confirmation link.")
                    .with_action("Login denied.")
            }
            ErrorKind::Misconfigured => {
                AppError::misconfigured("Two-factor authentication is misconfigured.")
                    .with_action("Contact your administrator.")
            }
            _ => AppError::internal("Two-factor authentication failed unexpectedly."),
        };
        app.with_source(err)
    }
}
