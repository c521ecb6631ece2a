//! Secret Strings
//!
//! ## Security
//! - Zeroized on drop
//! - Debug and Display output is redacted
//! - The value is only reachable through an explicit `expose()` call, which
//!   makes every place a secret leaves its wrapper easy to grep for

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque secret string (bot tokens, API keys)
///
/// ## Examples
/// ```rust
/// use platform::secret::SecretString;
///
/// let key = SecretString::new("123456:ABC-DEF".to_string());
/// assert_eq!(format!("{key:?}"), "SecretString(\"[REDACTED]\")");
/// assert_eq!(key.expose(), "123456:ABC-DEF");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Access the raw value
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString")
            .field(&"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
