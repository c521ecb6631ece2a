//! Credential File Store
//!
//! Reads the per-user record from a path built from a template such as
//! `/home/{user}/.pam_telegram_2fa/credentials`.

use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

use crate::application::config::USER_PLACEHOLDER;
use crate::domain::ports::CredentialStore;
use crate::domain::value_objects::Username;
use crate::error::{GateError, GateResult};

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path_template: String,
}

impl FileCredentialStore {
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
        }
    }

    /// Path of the record for `username`
    pub fn path_for(&self, username: &Username) -> GateResult<PathBuf> {
        if !username.is_path_safe() {
            return Err(GateError::CredentialResolution(
                "username cannot be used in a path".to_string(),
            ));
        }
        Ok(PathBuf::from(
            self.path_template.replace(USER_PLACEHOLDER, username.as_str()),
        ))
    }
}

impl CredentialStore for FileCredentialStore {
    async fn load(&self, username: &Username) -> GateResult<Option<String>> {
        let path = self.path_for(username)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No credential record");
                Ok(None)
            }
            Err(e) => Err(GateError::CredentialResolution(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }
}
