//! Application Configuration
//!
//! Configuration for the gate, built in three layers:
//! 1. [`GateConfig::default`]
//! 2. `LINKGATE_*` environment variables ([`GateConfig::with_env`])
//! 3. Host module arguments `key=value` ([`GateConfig::with_module_args`])
//!
//! Every key can be set in either layer; later layers win.

use std::path::PathBuf;
use std::time::Duration;

use platform::http::HttpClientConfig;

use crate::application::poller::PollPolicy;
use crate::domain::value_objects::{TokenAlphabet, TokenSpec};
use crate::error::ConfigError;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LINKGATE_";

/// Placeholder replaced by the username in `credentials_path`
pub const USER_PLACEHOLDER: &str = "{user}";

/// Recognised setting keys
pub const KEYS: &[&str] = &[
    "group",
    "credentials_path",
    "token_alphabet",
    "token_length",
    "public_url",
    "verify_url",
    "telegram_api",
    "dwell_secs",
    "poll_interval_secs",
    "poll_deadline_secs",
    "max_transport_errors",
    "deadline_secs",
    "connect_timeout_secs",
    "request_timeout_secs",
    "denial_status",
    "debug_log",
    "passwd_file",
    "group_file",
];

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Group whose members must complete the second factor
    pub group: String,
    /// Path template of the per-user credential record
    pub credentials_path: String,
    /// Shape of generated tokens
    pub token: TokenSpec,
    /// Base of the link the user clicks
    pub public_base_url: String,
    /// Base of the status endpoint this process polls
    pub verification_base_url: String,
    /// Base of the Telegram Bot API
    pub telegram_api_base: String,
    /// Wait between dispatch and the first status query
    pub dwell_time: Duration,
    /// Wait between status queries
    pub poll_interval: Duration,
    /// How long to keep polling after the first query
    pub poll_deadline: Duration,
    /// Transport failures tolerated before giving up
    pub max_transport_errors: u32,
    /// Upper bound on an attempt from credential lookup to verdict
    pub overall_deadline: Duration,
    /// Outbound HTTP settings
    pub http: HttpClientConfig,
    /// Status code the verification service answers for a rejected link;
    /// `None` treats every non-200 answer as still pending
    pub denial_status: Option<u16>,
    /// Append-only diagnostic log; `None` routes events to tracing instead
    pub diagnostic_log: Option<PathBuf>,
    /// Local account database
    pub passwd_file: PathBuf,
    /// Local group database
    pub group_file: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            group: "2fa".to_string(),
            credentials_path: "/home/{user}/.pam_telegram_2fa/credentials".to_string(),
            token: TokenSpec::default(),
            public_base_url: "http://127.0.0.1:8080".to_string(),
            verification_base_url: "http://localhost:8080".to_string(),
            telegram_api_base: "https://api.telegram.org".to_string(),
            dwell_time: Duration::from_secs(10),
            poll_interval: Duration::from_secs(2),
            poll_deadline: Duration::from_secs(60),
            max_transport_errors: 0,
            overall_deadline: Duration::from_secs(120),
            http: HttpClientConfig::default(),
            denial_status: None,
            diagnostic_log: Some(PathBuf::from("/tmp/pam_telegram_debug.log")),
            passwd_file: PathBuf::from("/etc/passwd"),
            group_file: PathBuf::from("/etc/group"),
        }
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::invalid(key, e.to_string()))
}

/// Longest accepted duration setting (one day)
pub const MAX_DURATION_SECS: u64 = 86_400;

fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = parse_u64(key, value)?;
    if secs > MAX_DURATION_SECS {
        return Err(ConfigError::invalid(
            key,
            format!("must be at most {MAX_DURATION_SECS}"),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn check_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(value).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::invalid(key, format!("unsupported scheme {other}"))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::invalid(key, "query and fragment are not allowed"));
    }
    Ok(())
}

impl GateConfig {
    /// Apply one setting
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "group" => {
                if value.trim().is_empty() {
                    return Err(ConfigError::invalid(key, "must not be empty"));
                }
                self.group = value.trim().to_string();
            }
            "credentials_path" => self.credentials_path = value.to_string(),
            "token_alphabet" => {
                self.token = TokenSpec::new(value.parse::<TokenAlphabet>()?, self.token.length)?;
            }
            "token_length" => {
                let length = usize::try_from(parse_u64(key, value)?)
                    .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
                self.token = TokenSpec::new(self.token.alphabet, length)?;
            }
            "public_url" => self.public_base_url = value.to_string(),
            "verify_url" => self.verification_base_url = value.to_string(),
            "telegram_api" => self.telegram_api_base = value.to_string(),
            "dwell_secs" => self.dwell_time = parse_secs(key, value)?,
            "poll_interval_secs" => self.poll_interval = parse_secs(key, value)?,
            "poll_deadline_secs" => self.poll_deadline = parse_secs(key, value)?,
            "max_transport_errors" => {
                self.max_transport_errors = u32::try_from(parse_u64(key, value)?)
                    .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
            }
            "deadline_secs" => self.overall_deadline = parse_secs(key, value)?,
            "connect_timeout_secs" => self.http.connect_timeout = parse_secs(key, value)?,
            "request_timeout_secs" => self.http.request_timeout = parse_secs(key, value)?,
            "denial_status" => {
                self.denial_status = match value.trim() {
                    "" | "off" | "none" => None,
                    code => Some(
                        code.parse::<u16>()
                            .ok()
                            .filter(|c| (400..600).contains(c))
                            .ok_or_else(|| {
                                ConfigError::invalid(key, "expected an HTTP error status")
                            })?,
                    ),
                };
            }
            "debug_log" => {
                self.diagnostic_log = match value.trim() {
                    "" | "off" | "none" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "passwd_file" => self.passwd_file = PathBuf::from(value),
            "group_file" => self.group_file = PathBuf::from(value),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Apply `LINKGATE_*` variables from an iterator of `(name, value)`
    pub fn with_vars<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                self.set(&key.to_ascii_lowercase(), &value)?;
            }
        }
        Ok(self)
    }

    /// Apply `LINKGATE_*` variables from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(std::env::vars())
    }

    /// Apply host module arguments of the form `key=value`
    pub fn with_module_args<S: AsRef<str>>(mut self, args: &[S]) -> Result<Self, ConfigError> {
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedArgument(arg.to_string()))?;
            self.set(key.trim(), value)?;
        }
        Ok(self)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_base_url("public_url", &self.public_base_url)?;
        check_base_url("verify_url", &self.verification_base_url)?;
        check_base_url("telegram_api", &self.telegram_api_base)?;

        if !self.credentials_path.contains(USER_PLACEHOLDER) {
            return Err(ConfigError::invalid(
                "credentials_path",
                format!("must contain {USER_PLACEHOLDER}"),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::invalid("poll_interval_secs", "must be positive"));
        }
        if self.overall_deadline <= self.dwell_time {
            return Err(ConfigError::invalid(
                "deadline_secs",
                "must be longer than dwell_secs",
            ));
        }
        Ok(())
    }

    /// Polling policy derived from this configuration
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            dwell: self.dwell_time,
            interval: self.poll_interval,
            deadline: self.poll_deadline,
            max_transport_errors: self.max_transport_errors,
        }
    }

    /// Configuration with short timings (for development against a local
    /// verification service)
    pub fn development() -> Self {
        Self {
            dwell_time: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
            poll_deadline: Duration::from_secs(30),
            overall_deadline: Duration::from_secs(45),
            diagnostic_log: None,
            ..Default::default()
        }
    }
}
