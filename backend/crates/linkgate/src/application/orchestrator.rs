//! Auth Orchestrator
//!
//! Runs one login attempt through the gate:
//!
//! ```text
//! eligibility ──exempt──────────────────────────────────────────▶ Success
//!     │ required
//!     ▼
//! resolve credentials ──fail──▶ AuthError (could not be started)
//!     ▼
//! issue token ─▶ send link ──fail──▶ DispatchFailed ─▶ AuthError
//!     ▼ sent
//! AwaitingConfirmation ─▶ poll ──Confirmed──▶ Success
//!                           ├──Denied─────────▶ AuthError
//!                           └──ValidationFailed▶ AuthError
//! ```
//!
//! Everything after eligibility runs under `overall_deadline`.

use std::sync::Arc;
use std::time::Duration;

use kernel::error::app_error::AppError;
use kernel::id::AttemptId;
use kernel::outcome::HostCode;
use serde::Serialize;
use tracing::Instrument;

use crate::application::credentials::CredentialResolver;
use crate::application::eligibility::{Eligibility, EligibilityGate};
use crate::application::notifier::Notifier;
use crate::application::poller::ConfirmationPoller;
use crate::domain::entities::AuthChallenge;
use crate::domain::ports::{
    Conversation, CredentialStore, DiagnosticEvent, DiagnosticKind, DiagnosticSink,
    IdentityDirectory, MessageChannel, TokenSource, VerificationService,
};
use crate::domain::value_objects::{ChallengeState, PollOutcome, TokenSpec, Username};
use crate::error::{GateError, GateResult};

/// Shown once the link is on its way
pub const LINK_SENT_PROMPT: &str = "CODE: Please click the link sent to your Telegram.";

/// Why an attempt did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    CredentialsUnavailable,
    DispatchFailed,
    ValidationFailed,
    Denied,
    TimedOut,
    Misconfigured,
    Internal,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::CredentialsUnavailable => "credentials unavailable",
            FailureReason::DispatchFailed => "dispatch failed",
            FailureReason::ValidationFailed => "validation failed",
            FailureReason::Denied => "denied",
            FailureReason::TimedOut => "timed out",
            FailureReason::Misconfigured => "misconfigured",
            FailureReason::Internal => "internal error",
        }
    }

    pub(crate) fn of(err: &GateError) -> Self {
        match err {
            GateError::IdentityLookup(_) | GateError::CredentialResolution(_) => {
                FailureReason::CredentialsUnavailable
            }
            GateError::Dispatch(_) => FailureReason::DispatchFailed,
            GateError::Verification(_) | GateError::Validation(_) => {
                FailureReason::ValidationFailed
            }
            GateError::Denied => FailureReason::Denied,
            GateError::Timeout(_) => FailureReason::TimedOut,
            GateError::Config(_) => FailureReason::Misconfigured,
            GateError::InvalidTransition { .. }
            | GateError::InvalidUsername(_)
            | GateError::Internal(_) => FailureReason::Internal,
        }
    }

    fn diagnostic(&self) -> DiagnosticKind {
        match self {
            FailureReason::CredentialsUnavailable => DiagnosticKind::CredentialsUnavailable,
            FailureReason::DispatchFailed => DiagnosticKind::DispatchFailed,
            FailureReason::ValidationFailed => DiagnosticKind::ValidationFailed,
            FailureReason::Denied => DiagnosticKind::Denied,
            FailureReason::TimedOut => DiagnosticKind::TimedOut,
            FailureReason::Misconfigured | FailureReason::Internal => DiagnosticKind::Aborted,
        }
    }
}

/// Decision for one login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthDecision {
    pub code: HostCode,
    /// Set when the user was not challenged at all
    pub exempt: bool,
    pub reason: Option<FailureReason>,
}

impl AuthDecision {
    pub fn exempt() -> Self {
        Self {
            code: HostCode::Success,
            exempt: true,
            reason: None,
        }
    }

    pub fn confirmed() -> Self {
        Self {
            code: HostCode::Success,
            exempt: false,
            reason: None,
        }
    }

    pub fn failed(code: HostCode, reason: FailureReason) -> Self {
        Self {
            code,
            exempt: false,
            reason: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// Auth Orchestrator
pub struct AuthOrchestrator<D, S, M, V>
where
    D: IdentityDirectory,
    S: CredentialStore,
    M: MessageChannel,
    V: VerificationService,
{
    eligibility: EligibilityGate<D>,
    resolver: CredentialResolver<S>,
    tokens: Arc<dyn TokenSource>,
    notifier: Notifier<M>,
    poller: ConfirmationPoller<V>,
    diagnostics: Arc<dyn DiagnosticSink>,
    token_spec: TokenSpec,
    overall_deadline: Duration,
}

impl<D, S, M, V> AuthOrchestrator<D, S, M, V>
where
    D: IdentityDirectory,
    S: CredentialStore,
    M: MessageChannel,
    V: VerificationService,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eligibility: EligibilityGate<D>,
        resolver: CredentialResolver<S>,
        tokens: Arc<dyn TokenSource>,
        notifier: Notifier<M>,
        poller: ConfirmationPoller<V>,
        diagnostics: Arc<dyn DiagnosticSink>,
        token_spec: TokenSpec,
        overall_deadline: Duration,
    ) -> Self {
        Self {
            eligibility,
            resolver,
            tokens,
            notifier,
            poller,
            diagnostics,
            token_spec,
            overall_deadline,
        }
    }

    /// Run the gate for `username`, talking to the user through `conversation`
    pub async fn authenticate(
        &self,
        username: &Username,
        conversation: &dyn Conversation,
    ) -> AuthDecision {
        let attempt = AttemptId::new();
        let span = tracing::info_span!("second_factor", attempt = %attempt, username = %username);
        self.decide(attempt, username, conversation)
            .instrument(span)
            .await
    }

    async fn decide(
        &self,
        attempt: AttemptId,
        username: &Username,
        conversation: &dyn Conversation,
    ) -> AuthDecision {
        match self.eligibility.evaluate(username).await {
            Eligibility::Required => {}
            Eligibility::SuperuserExempt => {
                self.record(attempt, username, DiagnosticKind::SuperuserExempt);
                return AuthDecision::exempt();
            }
            Eligibility::NotInGroup => {
                self.record(attempt, username, DiagnosticKind::NotInGroup);
                return AuthDecision::exempt();
            }
            Eligibility::LookupFailed => {
                self.record(attempt, username, DiagnosticKind::LookupFailed);
                return AuthDecision::exempt();
            }
        }

        let result = tokio::time::timeout(
            self.overall_deadline,
            self.run_challenge(attempt, username, conversation),
        )
        .await
        .unwrap_or(Err(GateError::Timeout(self.overall_deadline)));

        match result {
            Ok(()) => {
                self.record(attempt, username, DiagnosticKind::Confirmed);
                tracing::info!("Second factor confirmed");
                AuthDecision::confirmed()
            }
            Err(err) => self.fail(attempt, username, err, conversation),
        }
    }

    async fn run_challenge(
        &self,
        attempt: AttemptId,
        username: &Username,
        conversation: &dyn Conversation,
    ) -> GateResult<()> {
        let delivery = self.resolver.resolve(username).await?;
        let token = self.tokens.generate(&self.token_spec)?;
        let mut challenge = AuthChallenge::new(username.clone(), delivery, token);

        tracing::debug!(
            challenge_id = %challenge.id(),
            token_fp = %challenge.token().fingerprint(),
            "Challenge created"
        );

        if let Err(err) = self
            .notifier
            .send(challenge.delivery(), challenge.token())
            .await
        {
            challenge.transition(ChallengeState::DispatchFailed)?;
            return Err(err);
        }
        challenge.transition(ChallengeState::Dispatched)?;

        self.record(attempt, username, DiagnosticKind::LinkSent);
        conversation.info(LINK_SENT_PROMPT);
        challenge.transition(ChallengeState::AwaitingConfirmation)?;

        let outcome = self.poller.poll(challenge.token()).await;
        challenge.settle(&outcome)?;

        match outcome {
            PollOutcome::Confirmed => Ok(()),
            PollOutcome::Denied => Err(GateError::Denied),
            PollOutcome::ValidationFailed(failure) => {
                Err(GateError::Validation(failure.to_string()))
            }
        }
    }

    fn fail(
        &self,
        attempt: AttemptId,
        username: &Username,
        err: GateError,
        conversation: &dyn Conversation,
    ) -> AuthDecision {
        err.log();
        let reason = FailureReason::of(&err);
        self.record(attempt, username, reason.diagnostic());

        let app: AppError = err.into();
        conversation.error(&app.user_message());
        AuthDecision::failed(app.host_code(), reason)
    }

    fn record(&self, attempt: AttemptId, username: &Username, kind: DiagnosticKind) {
        self.diagnostics.record(&DiagnosticEvent {
            attempt,
            username: username.to_string(),
            kind,
        });
    }
}
