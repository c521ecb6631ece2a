//! Domain Value Objects
//!
//! Immutable value types for the gate domain.

use std::fmt;
use std::str::FromStr;

use platform::crypto::fingerprint;
use platform::secret::SecretString;
use serde::Serialize;

use crate::error::{ConfigError, GateError};

// ============================================================================
// Username
// ============================================================================

/// Principal under authentication, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Accepts any non-empty name without control characters. Whether the
    /// name is safe to use in a filesystem path is checked separately.
    pub fn new(raw: impl Into<String>) -> Result<Self, GateError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(GateError::InvalidUsername("empty username".to_string()));
        }
        if raw.chars().any(char::is_control) {
            return Err(GateError::InvalidUsername(
                "username contains control characters".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name can be substituted into a path template
    pub fn is_path_safe(&self) -> bool {
        self.0 != "." && self.0 != ".." && !self.0.contains('/') && !self.0.contains('\\')
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Token
// ============================================================================

/// Character set tokens are drawn from
///
/// Both sets are unreserved in URL paths and carry no meaning in HTML, so a
/// token never needs escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenAlphabet {
    /// `A-Z`
    #[default]
    Uppercase,
    /// `A-Z a-z 0-9`
    Alphanumeric,
}

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

impl TokenAlphabet {
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            TokenAlphabet::Uppercase => UPPERCASE,
            TokenAlphabet::Alphanumeric => ALPHANUMERIC,
        }
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols().contains(&(c as u8))
    }
}

impl FromStr for TokenAlphabet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uppercase" | "upper" => Ok(TokenAlphabet::Uppercase),
            "alphanumeric" | "alnum" => Ok(TokenAlphabet::Alphanumeric),
            other => Err(ConfigError::invalid(
                "token_alphabet",
                format!("unknown alphabet {other:?}"),
            )),
        }
    }
}

/// Shape of generated tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpec {
    pub alphabet: TokenAlphabet,
    pub length: usize,
}

impl TokenSpec {
    pub const MIN_LENGTH: usize = 8;
    pub const MAX_LENGTH: usize = 128;
    pub const DEFAULT_LENGTH: usize = 31;

    pub fn new(alphabet: TokenAlphabet, length: usize) -> Result<Self, ConfigError> {
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(ConfigError::invalid(
                "token_length",
                format!(
                    "must be between {} and {}",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }
        Ok(Self { alphabet, length })
    }

    /// Whether `candidate` has exactly this shape
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.len() == self.length && candidate.chars().all(|c| self.alphabet.contains(c))
    }
}

impl Default for TokenSpec {
    fn default() -> Self {
        Self {
            alphabet: TokenAlphabet::Uppercase,
            length: Self::DEFAULT_LENGTH,
        }
    }
}

/// One-time challenge token
///
/// Doubles as the polling key and the confirmation link path segment. Debug
/// output shows a fingerprint, never the token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    /// Wrap a value produced by a token source, checking it is transport safe
    pub fn new(value: String) -> Result<Self, GateError> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(GateError::Internal(
                "token contains characters outside the URL-safe set".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-reversible label for logs
    pub fn fingerprint(&self) -> String {
        fingerprint(self.0.as_bytes())
    }
}

impl fmt::Debug for ChallengeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeToken(fp={})", self.fingerprint())
    }
}

// ============================================================================
// Delivery parameters
// ============================================================================

/// Resolved delivery parameters for one user
///
/// Both fields are required and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCredentials {
    chat_target: String,
    bot_credential: SecretString,
}

impl DeliveryCredentials {
    pub fn new(chat_target: String, bot_credential: SecretString) -> Option<Self> {
        if chat_target.is_empty() || bot_credential.is_empty() {
            return None;
        }
        Some(Self {
            chat_target,
            bot_credential,
        })
    }

    pub fn chat_target(&self) -> &str {
        &self.chat_target
    }

    pub fn bot_credential(&self) -> &SecretString {
        &self.bot_credential
    }
}

// ============================================================================
// Directory entries
// ============================================================================

/// Group entry as reported by the identity directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub gid: u32,
    pub members: Vec<String>,
}

/// User entry as reported by the identity directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    pub primary_gid: u32,
}

// ============================================================================
// Challenge state and poll results
// ============================================================================

/// Lifecycle of an [`AuthChallenge`](crate::domain::entities::AuthChallenge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    Created,
    Dispatched,
    AwaitingConfirmation,
    Confirmed,
    Denied,
    DispatchFailed,
    ValidationFailed,
}

impl ChallengeState {
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChallengeState::Confirmed
                | ChallengeState::Denied
                | ChallengeState::DispatchFailed
                | ChallengeState::ValidationFailed
        )
    }

    /// Edges of the challenge DAG
    pub const fn can_transition_to(&self, next: ChallengeState) -> bool {
        use ChallengeState::*;
        matches!(
            (self, next),
            (Created, Dispatched)
                | (Created, DispatchFailed)
                | (Dispatched, AwaitingConfirmation)
                | (AwaitingConfirmation, Confirmed)
                | (AwaitingConfirmation, Denied)
                | (AwaitingConfirmation, ValidationFailed)
        )
    }
}

/// Answer to a single status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Confirmed,
    Denied,
    /// Not confirmed yet; carries the HTTP status that was returned
    Pending(u16),
}

/// Why polling gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Too many status queries failed at the transport level
    Transport { errors: u32 },
    /// No confirmation before the polling deadline
    DeadlineExceeded {
        attempts: u32,
        last_status: Option<u16>,
    },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Transport { errors } => {
                write!(f, "{errors} status queries failed at the transport level")
            }
            ValidationFailure::DeadlineExceeded {
                attempts,
                last_status: Some(status),
            } => write!(f, "not confirmed after {attempts} queries (last status {status})"),
            ValidationFailure::DeadlineExceeded {
                attempts,
                last_status: None,
            } => write!(f, "not confirmed after {attempts} queries"),
        }
    }
}

/// Result of polling for one challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Confirmed,
    Denied,
    ValidationFailed(ValidationFailure),
}
