//! HTTP Verification Service Client
//!
//! Queries `GET {base}/auth/{token}/status` and classifies the response code.
//! Only `200` means anything unless a denial status is configured.

use crate::domain::ports::VerificationService;
use crate::domain::services::{classify_status, status_url};
use crate::domain::value_objects::{ChallengeToken, VerificationStatus};
use crate::error::{GateError, GateResult};

/// Verification service reached over HTTP
#[derive(Clone)]
pub struct HttpVerificationService {
    client: reqwest::Client,
    base_url: String,
    denial_status: Option<u16>,
}

impl HttpVerificationService {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            denial_status: None,
        }
    }

    /// Treat `status` as an explicit rejection
    pub fn with_denial_status(mut self, status: Option<u16>) -> Self {
        self.denial_status = status;
        self
    }
}

impl VerificationService for HttpVerificationService {
    async fn status(&self, token: &ChallengeToken) -> GateResult<VerificationStatus> {
        let url = status_url(&self.base_url, token);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GateError::Verification(e.without_url().to_string()))?;

        let code = response.status().as_u16();
        tracing::debug!(token_fp = %token.fingerprint(), status = code, "Status queried");
        Ok(classify_status(code, self.denial_status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token() -> ChallengeToken {
        ChallengeToken::new("ABCDEFGHJK".to_string()).unwrap()
    }

    async fn answering(code: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/ABCDEFGHJK/status"))
            .respond_with(ResponseTemplate::new(code))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_status_codes_are_classified() {
        for (code, expected) in [
            (200, VerificationStatus::Confirmed),
            (403, VerificationStatus::Pending(403)),
            (404, VerificationStatus::Pending(404)),
            (202, VerificationStatus::Pending(202)),
            (500, VerificationStatus::Pending(500)),
        ] {
            let server = answering(code).await;
            let service = HttpVerificationService::new(reqwest::Client::new(), server.uri());
            assert_eq!(service.status(&token()).await.unwrap(), expected, "code {code}");
        }
    }

    #[tokio::test]
    async fn test_configured_denial_status() {
        let server = answering(403).await;
        let service = HttpVerificationService::new(reqwest::Client::new(), server.uri())
            .with_denial_status(Some(403));
        assert_eq!(
            service.status(&token()).await.unwrap(),
            VerificationStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base() {
        let server = answering(200).await;
        let service =
            HttpVerificationService::new(reqwest::Client::new(), format!("{}/", server.uri()));
        assert_eq!(
            service.status(&token()).await.unwrap(),
            VerificationStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_hides_token() {
        let service = HttpVerificationService::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = service.status(&token()).await.unwrap_err();
        assert!(matches!(err, GateError::Verification(_)));
        assert!(!err.to_string().contains("ABCDEFGHJK"));
    }
}
