//! Host Shim
//!
//! Synchronous entry points for the authentication framework. Each call to
//! [`authenticate`] loads configuration, wires the system adapters into an
//! [`AuthOrchestrator`] and drives one attempt to completion on a
//! current-thread runtime.

use std::sync::Arc;

use kernel::error::app_error::AppError;
use kernel::outcome::HostCode;
use platform::http::build_client;
use tokio::runtime::{Builder, Runtime};

use crate::application::config::GateConfig;
use crate::application::credentials::CredentialResolver;
use crate::application::eligibility::EligibilityGate;
use crate::application::notifier::Notifier;
use crate::application::orchestrator::{AuthDecision, AuthOrchestrator, FailureReason};
use crate::application::poller::ConfirmationPoller;
use crate::application::token::TokenGenerator;
use crate::domain::ports::{Conversation, DiagnosticSink};
use crate::domain::value_objects::Username;
use crate::error::{GateError, GateResult};
use crate::infra::credential_file::FileCredentialStore;
use crate::infra::diagnostics::{FileSink, TracingSink};
use crate::infra::directory::AccountFileDirectory;
use crate::infra::telegram::TelegramChannel;
use crate::infra::verification::HttpVerificationService;

/// Orchestrator wired to the local account files, credential files,
/// Telegram and the HTTP verification service
pub type SystemOrchestrator = AuthOrchestrator<
    AccountFileDirectory,
    FileCredentialStore,
    TelegramChannel,
    HttpVerificationService,
>;

/// A configured gate together with the runtime that drives it
pub struct GateService {
    orchestrator: SystemOrchestrator,
    runtime: Runtime,
}

impl GateService {
    /// Validate `config` and build the system adapters from it
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        config.validate()?;

        let client = build_client(&config.http).map_err(|e| GateError::Internal(e.to_string()))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GateError::Internal(format!("cannot start runtime: {e}")))?;

        let diagnostics: Arc<dyn DiagnosticSink> = match &config.diagnostic_log {
            Some(path) => Arc::new(FileSink::new(path)),
            None => Arc::new(TracingSink),
        };

        let orchestrator = AuthOrchestrator::new(
            EligibilityGate::new(
                Arc::new(AccountFileDirectory::new(
                    &config.passwd_file,
                    &config.group_file,
                )),
                config.group.clone(),
            ),
            CredentialResolver::new(Arc::new(FileCredentialStore::new(
                config.credentials_path.clone(),
            ))),
            Arc::new(TokenGenerator::new()),
            Notifier::new(
                Arc::new(TelegramChannel::new(
                    client.clone(),
                    config.telegram_api_base.clone(),
                )),
                config.public_base_url.clone(),
            ),
            ConfirmationPoller::new(
                Arc::new(
                    HttpVerificationService::new(client, config.verification_base_url.clone())
                        .with_denial_status(config.denial_status),
                ),
                config.poll_policy(),
            ),
            diagnostics,
            config.token,
            config.overall_deadline,
        );

        tracing::debug!(group = %config.group, "Gate service ready");
        Ok(Self {
            orchestrator,
            runtime,
        })
    }

    /// Run one attempt, blocking the calling thread until it settles
    pub fn authenticate(
        &self,
        username: &Username,
        conversation: &dyn Conversation,
    ) -> AuthDecision {
        self.runtime
            .block_on(self.orchestrator.authenticate(username, conversation))
    }
}

/// Configuration for one host call: defaults, then `LINKGATE_*` variables,
/// then the module arguments
pub fn load_config<S: AsRef<str>>(args: &[S]) -> GateResult<GateConfig> {
    let config = GateConfig::default().with_env()?.with_module_args(args)?;
    config.validate()?;
    Ok(config)
}

/// Authenticate `username` with the module arguments `args`
///
/// A missing or empty username, and any configuration problem, yield
/// [`HostCode::PermanentError`].
pub fn authenticate<S: AsRef<str>>(
    username: Option<&str>,
    args: &[S],
    conversation: &dyn Conversation,
) -> AuthDecision {
    let prepared = username
        .ok_or_else(|| GateError::InvalidUsername("host supplied no username".to_string()))
        .and_then(Username::new)
        .and_then(|user| Ok((user, load_config(args)?)))
        .and_then(|(user, config)| Ok((user, GateService::from_config(&config)?)));

    match prepared {
        Ok((user, service)) => service.authenticate(&user, conversation),
        Err(err) => refuse(err, conversation),
    }
}

/// Credential establishment is not part of the second factor
pub fn setcred() -> HostCode {
    HostCode::Success
}

pub fn open_session() -> HostCode {
    HostCode::Success
}

pub fn close_session() -> HostCode {
    HostCode::Success
}

fn refuse(err: GateError, conversation: &dyn Conversation) -> AuthDecision {
    err.log();
    let reason = FailureReason::of(&err);
    let app: AppError = err.into();
    conversation.error(&app.user_message());
    AuthDecision::failed(app.host_code(), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Transcript {
        errors: Mutex<Vec<String>>,
    }

    impl Conversation for Transcript {
        fn info(&self, _message: &str) {}

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_session_hooks_are_noops() {
        assert_eq!(setcred(), HostCode::Success);
        assert_eq!(open_session(), HostCode::Success);
        assert_eq!(close_session(), HostCode::Success);
    }

    #[test]
    fn test_missing_username_is_permanent_error() {
        let conversation = Transcript::default();
        let decision = authenticate(None, &[] as &[&str], &conversation);
        assert_eq!(decision.code, HostCode::PermanentError);

        let decision = authenticate(Some(""), &[] as &[&str], &conversation);
        assert_eq!(decision.code, HostCode::PermanentError);
    }

    #[test]
    fn test_bad_module_argument_is_permanent_error() {
        let conversation = Transcript::default();
        let decision = authenticate(Some("alice"), &["no_such_key=1"], &conversation);
        assert_eq!(decision.code, HostCode::PermanentError);
        assert_eq!(decision.reason, Some(FailureReason::Misconfigured));
        let errors = conversation.errors.lock().unwrap();
        assert!(errors[0].contains("misconfigured"));
    }

    #[test]
    fn test_superuser_passes_without_network() {
        let conversation = Transcript::default();
        let decision = authenticate(
            Some("root"),
            &["debug_log=off", "telegram_api=http://127.0.0.1:9"],
            &conversation,
        );
        assert_eq!(decision.code, HostCode::Success);
        assert!(decision.exempt);
        assert!(conversation.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_user_outside_group_passes() {
        let dir = tempfile::TempDir::new().unwrap();
        let passwd = dir.path().join("passwd");
        let group = dir.path().join("group");
        std::fs::write(&passwd, "bob:x:1001:1001::/home/bob:/bin/sh\n").unwrap();
        std::fs::write(&group, "2fa:x:500:alice\n").unwrap();

        let config = GateConfig {
            passwd_file: passwd,
            group_file: group,
            diagnostic_log: None,
            ..GateConfig::default()
        };
        let service = GateService::from_config(&config).unwrap();
        let bob = Username::new("bob").unwrap();
        let decision = service.authenticate(&bob, &Transcript::default());
        assert_eq!(decision, AuthDecision::exempt());
    }
}
