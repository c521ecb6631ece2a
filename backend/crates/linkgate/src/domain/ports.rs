//! Port Traits
//!
//! Interfaces to the gate's collaborators. Implementations are in the
//! infrastructure layer; tests substitute in-memory fakes.

use std::fmt;

use kernel::id::AttemptId;

use crate::domain::value_objects::{
    ChallengeToken, DeliveryCredentials, GroupEntry, TokenSpec, UserEntry, Username,
    VerificationStatus,
};
use crate::error::GateResult;

/// System account directory
///
/// `Ok(None)` means the entry does not exist; `Err` means the directory
/// could not be consulted.
#[trait_variant::make(IdentityDirectory: Send)]
pub trait LocalIdentityDirectory {
    /// Find a group by name
    async fn find_group(&self, name: &str) -> GateResult<Option<GroupEntry>>;

    /// Find a user by name
    async fn find_user(&self, username: &Username) -> GateResult<Option<UserEntry>>;
}

/// Per-user delivery record store
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Load the raw record text for a user, `Ok(None)` if there is none
    async fn load(&self, username: &Username) -> GateResult<Option<String>>;
}

/// Outbound messaging channel
#[trait_variant::make(MessageChannel: Send)]
pub trait LocalMessageChannel {
    /// Deliver an HTML message; `Ok` means the channel accepted it
    async fn send_html(&self, delivery: &DeliveryCredentials, html: &str) -> GateResult<()>;
}

/// Remote verification service
#[trait_variant::make(VerificationService: Send)]
pub trait LocalVerificationService {
    /// Query the current status of a token once
    async fn status(&self, token: &ChallengeToken) -> GateResult<VerificationStatus>;
}

/// Source of one-time tokens
pub trait TokenSource: Send + Sync {
    fn generate(&self, spec: &TokenSpec) -> GateResult<ChallengeToken>;
}

/// Host messaging callback
///
/// Text passed here is shown at the login prompt, so it must never contain
/// internal details.
pub trait Conversation: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// What happened during an attempt, as recorded in the diagnostic log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    SuperuserExempt,
    NotInGroup,
    LookupFailed,
    CredentialsUnavailable,
    LinkSent,
    DispatchFailed,
    Confirmed,
    Denied,
    ValidationFailed,
    TimedOut,
    Aborted,
}

impl DiagnosticKind {
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::SuperuserExempt => "Superuser login. Skipping 2FA.",
            DiagnosticKind::NotInGroup => "User not in 2FA group. Skipping 2FA.",
            DiagnosticKind::LookupFailed => "User or group not found. Skipping 2FA.",
            DiagnosticKind::CredentialsUnavailable => "Failed to load botkey and chatid.",
            DiagnosticKind::LinkSent => "Authentication link sent. Waiting for user validation.",
            DiagnosticKind::DispatchFailed => "Failed to send authentication link.",
            DiagnosticKind::Confirmed => "Authentication successful.",
            DiagnosticKind::Denied => "Authentication rejected by user.",
            DiagnosticKind::ValidationFailed => {
                "Token validation failed. Aborting authentication process."
            }
            DiagnosticKind::TimedOut => "Attempt exceeded its deadline. Login denied.",
            DiagnosticKind::Aborted => "Second factor aborted by an internal error.",
        }
    }
}

/// One diagnostic log line
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub attempt: AttemptId,
    pub username: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempt={} user={} {}",
            self.attempt,
            self.username.escape_debug(),
            self.kind.message()
        )
    }
}

/// Best-effort diagnostic sink; must never block on failure or panic
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &DiagnosticEvent);
}
