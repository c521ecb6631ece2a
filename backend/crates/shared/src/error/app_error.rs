//! Application Error - Unified error type handed to host front-ends
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;
use crate::outcome::HostCode;

/// Unified gate error
///
/// Carries only what may be shown to the user at the login prompt. The
/// underlying cause is kept in `source` for logging and is never part of the
/// `Display` output.
///
/// ## Fields
/// * `kind` - failure classification (maps to a [`HostCode`])
/// * `message` - user-facing message
/// * `action` - what the user should do next (optional)
/// * `source` - original error (optional, diagnostics only)
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::DeliveryFailed, "Failed to send authentication link")
///     .with_action("Please try logging in again");
/// assert_eq!(err.action(), Some("Please try logging in again"));
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// Result alias for `Result<T, AppError>`
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::{AppError, AppResult};
///
/// fn load_module_args(args: &[&str]) -> AppResult<usize> {
///     if args.is_empty() {
///         return Err(AppError::misconfigured("No module arguments"));
///     }
///     Ok(args.len())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    #[inline]
    pub fn challenge_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ChallengeUnavailable, message)
    }

    #[inline]
    pub fn delivery_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::DeliveryFailed, message)
    }

    #[inline]
    pub fn confirmation_missing(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ConfirmationMissing, message)
    }

    #[inline]
    pub fn rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    #[inline]
    pub fn misconfigured(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Misconfigured, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Attach a next step for the user
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attach the underlying cause (diagnostics only)
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_record() -> AppResult<String> {
    ///     std::fs::read_to_string("/nonexistent/credentials")
    ///         .map_err(|e| AppError::challenge_unavailable("No credentials").with_source(e))
    /// }
    /// assert!(read_record().is_err());
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Host decision for this error
    #[inline]
    pub fn host_code(&self) -> HostCode {
        self.kind.host_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Message and action joined for a single-line prompt
    pub fn user_message(&self) -> String {
        match &self.action {
            Some(action) => format!("{} {}", self.message, action),
            None => self.message.to_string(),
        }
    }

    #[inline]
    pub fn is_permanent(&self) -> bool {
        self.kind.is_permanent()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::DeliveryFailed, "Could not send");
        assert_eq!(err.kind(), ErrorKind::DeliveryFailed);
        assert_eq!(err.host_code(), HostCode::AuthError);
        assert_eq!(err.message(), "Could not send");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::challenge_unavailable("t").host_code(), HostCode::AuthError);
        assert_eq!(AppError::delivery_failed("t").host_code(), HostCode::AuthError);
        assert_eq!(AppError::confirmation_missing("t").host_code(), HostCode::AuthError);
        assert_eq!(AppError::rejected("t").host_code(), HostCode::AuthError);
        assert_eq!(AppError::misconfigured("t").host_code(), HostCode::PermanentError);
        assert_eq!(AppError::internal("t").host_code(), HostCode::PermanentError);
    }

    #[test]
    fn test_user_message_joins_action() {
        let err = AppError::delivery_failed("Could not send.").with_action("Try again.");
        assert_eq!(err.user_message(), "Could not send. Try again.");
        assert_eq!(AppError::rejected("No.").user_message(), "No.");
    }

    #[test]
    fn test_source_is_not_displayed() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "/home/alice/secret");
        let err = AppError::challenge_unavailable("Unavailable").with_source(io_err);
        assert!(err.source().is_some());
        assert!(!err.to_string().contains("/home/alice"));
        assert!(!err.user_message().contains("/home/alice"));
    }

    #[test]
    fn test_display() {
        let err = AppError::rejected("Login was rejected");
        assert_eq!(err.to_string(), "[Rejected] Login was rejected");
    }
}
