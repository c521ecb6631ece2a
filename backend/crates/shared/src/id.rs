//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type ChallengeId = Id<markers::Challenge>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: uuid::Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for authentication challenge IDs
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Challenge;

    /// Marker for login attempt IDs (one attempt may end without a challenge)
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attempt;
}

/// Type aliases for common IDs
pub type ChallengeId = Id<markers::Challenge>;
pub type AttemptId = Id<markers::Attempt>;
