//! Domain Entities
//!
//! Core business entities for the gate domain.

use chrono::{DateTime, Utc};
use kernel::id::ChallengeId;

use crate::domain::value_objects::{
    ChallengeState, ChallengeToken, DeliveryCredentials, PollOutcome, Username,
};
use crate::error::{GateError, GateResult};

/// AuthChallenge entity - one run of the confirmation protocol
///
/// Lives only in memory for the duration of a login attempt. The token and
/// delivery parameters are fixed at construction; only `state` changes, and
/// only along the edges allowed by [`ChallengeState::can_transition_to`].
#[derive(Debug)]
pub struct AuthChallenge {
    id: ChallengeId,
    username: Username,
    token: ChallengeToken,
    delivery: DeliveryCredentials,
    state: ChallengeState,
    created_at: DateTime<Utc>,
}

impl AuthChallenge {
    /// Create a new challenge in the `Created` state
    pub fn new(username: Username, delivery: DeliveryCredentials, token: ChallengeToken) -> Self {
        Self {
            id: ChallengeId::new(),
            username,
            token,
            delivery,
            state: ChallengeState::Created,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn token(&self) -> &ChallengeToken {
        &self.token
    }

    pub fn delivery(&self) -> &DeliveryCredentials {
        &self.delivery
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_settled(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to `next`, refusing any edge outside the challenge DAG
    pub fn transition(&mut self, next: ChallengeState) -> GateResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(GateError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(
            challenge_id = %self.id,
            from = ?self.state,
            to = ?next,
            "Challenge state change"
        );
        self.state = next;
        Ok(())
    }

    /// Apply the poller's verdict
    pub fn settle(&mut self, outcome: &PollOutcome) -> GateResult<()> {
        let next = match outcome {
            PollOutcome::Confirmed => ChallengeState::Confirmed,
            PollOutcome::Denied => ChallengeState::Denied,
            PollOutcome::ValidationFailed(_) => ChallengeState::ValidationFailed,
        };
        self.transition(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ValidationFailure;
    use platform::secret::SecretString;

    fn challenge() -> AuthChallenge {
        AuthChallenge::new(
            Username::new("alice").unwrap(),
            DeliveryCredentials::new("42".into(), SecretString::new("key".into())).unwrap(),
            ChallengeToken::new("ABCDEFGHIJ".into()).unwrap(),
        )
    }

    #[test]
    fn test_new_challenge_is_created() {
        let c = challenge();
        assert_eq!(c.state(), ChallengeState::Created);
        assert!(!c.is_settled());
        assert_eq!(c.username().as_str(), "alice");
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut c = challenge();
        c.transition(ChallengeState::Dispatched).unwrap();
        c.transition(ChallengeState::AwaitingConfirmation).unwrap();
        c.settle(&PollOutcome::Confirmed).unwrap();
        assert_eq!(c.state(), ChallengeState::Confirmed);
        assert!(c.is_settled());
    }

    #[test]
    fn test_cannot_leave_terminal_state() {
        let mut c = challenge();
        c.transition(ChallengeState::DispatchFailed).unwrap();
        let err = c.transition(ChallengeState::Dispatched).unwrap_err();
        assert!(matches!(err, GateError::InvalidTransition { .. }));
        assert_eq!(c.state(), ChallengeState::DispatchFailed);
    }

    #[test]
    fn test_cannot_skip_dispatch() {
        let mut c = challenge();
        assert!(c.settle(&PollOutcome::Confirmed).is_err());
        assert_eq!(c.state(), ChallengeState::Created);
    }

    #[test]
    fn test_settle_maps_outcomes() {
        for (outcome, expected) in [
            (PollOutcome::Denied, ChallengeState::Denied),
            (
                PollOutcome::ValidationFailed(ValidationFailure::Transport { errors: 1 }),
                ChallengeState::ValidationFailed,
            ),
        ] {
            let mut c = challenge();
            c.transition(ChallengeState::Dispatched).unwrap();
            c.transition(ChallengeState::AwaitingConfirmation).unwrap();
            c.settle(&outcome).unwrap();
            assert_eq!(c.state(), expected);
        }
    }
}
