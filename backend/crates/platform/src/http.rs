//! Outbound HTTP
//!
//! Every outbound call made during a login carries explicit timeouts so that
//! a stuck endpoint can never hold the login prompt longer than configured.

use std::time::Duration;

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("linkgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Error building an HTTP client
#[derive(Debug, thiserror::Error)]
#[error("Failed to build HTTP client: {0}")]
pub struct HttpClientError(#[from] reqwest::Error);

/// Build a `reqwest::Client` from settings
///
/// Redirects are disabled; requests only ever reach the configured host.
pub fn build_client(config: &HttpClientConfig) -> Result<reqwest::Client, HttpClientError> {
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = HttpClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("linkgate/"));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&HttpClientConfig::default()).is_ok());
    }
}
