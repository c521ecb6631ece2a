//! Link Gate - out-of-band second factor for login flows
//!
//! Clean Architecture structure:
//! - `domain/` - Challenge entity, value objects, pure services, port traits
//! - `application/` - Configuration and use cases (eligibility, credentials,
//!   token issue, notification, polling) plus the orchestrating state machine
//! - `infra/` - System account files, credential files, Telegram Bot API,
//!   HTTP verification service, diagnostic sinks
//! - `presentation/` - Host shim called by the authentication framework
//!
//! ## Security Model
//! - The superuser is always exempt (hardcoded, not configurable)
//! - Directory lookup failures are fail-open: the user is treated as exempt
//! - Tokens come from one process-wide CSPRNG seeded once from the OS
//! - Bot credentials and tokens never reach logs; only fingerprints do
//! - Every attempt is bounded by an overall deadline

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GateConfig;
pub use application::orchestrator::{AuthDecision, AuthOrchestrator, FailureReason};
pub use error::{ConfigError, GateError, GateResult};
pub use domain::ports::{Conversation, DiagnosticSink};
pub use presentation::host::GateService;

// Re-export kernel types for host front-ends
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::outcome::HostCode;
