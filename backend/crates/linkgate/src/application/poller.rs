//! Confirmation Poller Use Case
//!
//! Waits the dwell time, then queries the verification service at a fixed
//! interval until it confirms, denies, or the polling deadline passes.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::domain::ports::VerificationService;
use crate::domain::value_objects::{
    ChallengeToken, PollOutcome, ValidationFailure, VerificationStatus,
};

/// Timing of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first query
    pub dwell: Duration,
    /// Wait between queries
    pub interval: Duration,
    /// No query is started later than this after the first one.
    /// Zero gives a single query.
    pub deadline: Duration,
    /// Transport failures tolerated; one more ends polling
    pub max_transport_errors: u32,
}

impl PollPolicy {
    /// Sleep once, query once, never retry
    pub fn single_shot(dwell: Duration) -> Self {
        Self {
            dwell,
            interval: Duration::from_secs(1),
            deadline: Duration::ZERO,
            max_transport_errors: 0,
        }
    }
}

/// Confirmation Poller Use Case
pub struct ConfirmationPoller<V>
where
    V: VerificationService,
{
    service: Arc<V>,
    policy: PollPolicy,
}

impl<V> ConfirmationPoller<V>
where
    V: VerificationService,
{
    pub fn new(service: Arc<V>, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub async fn poll(&self, token: &ChallengeToken) -> PollOutcome {
        sleep(self.policy.dwell).await;

        // An unrepresentable deadline means polling is bounded only by the
        // caller's overall deadline
        let deadline = Instant::now().checked_add(self.policy.deadline);
        let mut attempts = 0u32;
        let mut transport_errors = 0u32;
        let mut last_status = None;

        loop {
            attempts += 1;
            match self.service.status(token).await {
                Ok(VerificationStatus::Confirmed) => {
                    tracing::info!(
                        token_fp = %token.fingerprint(),
                        attempts,
                        "Token validated successfully"
                    );
                    return PollOutcome::Confirmed;
                }
                Ok(VerificationStatus::Denied) => {
                    tracing::info!(
                        token_fp = %token.fingerprint(),
                        attempts,
                        "Token denied by user"
                    );
                    return PollOutcome::Denied;
                }
                Ok(VerificationStatus::Pending(status)) => {
                    tracing::debug!(
                        token_fp = %token.fingerprint(),
                        status,
                        "Token not validated yet"
                    );
                    last_status = Some(status);
                }
                Err(e) => {
                    transport_errors += 1;
                    tracing::warn!(error = %e, transport_errors, "Status query failed");
                    if transport_errors > self.policy.max_transport_errors {
                        return PollOutcome::ValidationFailed(ValidationFailure::Transport {
                            errors: transport_errors,
                        });
                    }
                }
            }

            let next_query = Instant::now().checked_add(self.policy.interval);
            let past_deadline = match (next_query, deadline) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(next), Some(deadline)) => next > deadline,
            };
            if past_deadline {
                return PollOutcome::ValidationFailed(ValidationFailure::DeadlineExceeded {
                    attempts,
                    last_status,
                });
            }
            sleep(self.policy.interval).await;
        }
    }
}
