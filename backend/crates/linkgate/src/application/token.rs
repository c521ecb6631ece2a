//! Token Generator
//!
//! Draws tokens from the process-wide CSPRNG in `platform::crypto`. There is
//! no per-call seeding, so tokens issued back to back are independent.

use platform::crypto::random_string;

use crate::domain::ports::TokenSource;
use crate::domain::value_objects::{ChallengeToken, TokenSpec};
use crate::error::GateResult;

/// Default [`TokenSource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenSource for TokenGenerator {
    fn generate(&self, spec: &TokenSpec) -> GateResult<ChallengeToken> {
        ChallengeToken::new(random_string(spec.alphabet.symbols(), spec.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TokenAlphabet;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_unique_and_well_formed() {
        let generator = TokenGenerator::new();
        let spec = TokenSpec::default();
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            let token = generator.generate(&spec).unwrap();
            assert!(spec.matches(token.as_str()), "bad token {:?}", token.as_str());
            assert!(seen.insert(token.as_str().to_string()), "duplicate token");
        }
    }

    #[test]
    fn test_alphanumeric_tokens() {
        let generator = TokenGenerator::new();
        let spec = TokenSpec::new(TokenAlphabet::Alphanumeric, 64).unwrap();
        for _ in 0..100 {
            let token = generator.generate(&spec).unwrap();
            assert!(spec.matches(token.as_str()));
        }
    }

    #[test]
    fn test_tokens_are_transport_safe() {
        let token = TokenGenerator::new().generate(&TokenSpec::default()).unwrap();
        // nothing that a URL path or HTML text would need to escape
        assert!(token
            .as_str()
            .chars()
            .all(|c| !matches!(c, '/' | '?' | '#' | '%' | '&' | '<' | '>' | '"' | '\'' | ' ')));
    }
}
