//! Credential Resolver Use Case
//!
//! Resolves the chat target and bot credential for a user. Nothing is cached;
//! every challenge reads the record afresh.

use std::sync::Arc;

use crate::domain::ports::CredentialStore;
use crate::domain::services::parse_credential_record;
use crate::domain::value_objects::{DeliveryCredentials, Username};
use crate::error::{GateError, GateResult};

/// Credential Resolver Use Case
pub struct CredentialResolver<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> CredentialResolver<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, username: &Username) -> GateResult<DeliveryCredentials> {
        let record = self.store.load(username).await?.ok_or_else(|| {
            GateError::CredentialResolution("no credential record".to_string())
        })?;

        parse_credential_record(&record).ok_or_else(|| {
            GateError::CredentialResolution(
                "record must contain non-empty id= and botkey= lines".to_string(),
            )
        })
    }
}
