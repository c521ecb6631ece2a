//! Eligibility Gate Use Case
//!
//! Decides whether a principal must complete the second factor.
//!
//! ## Fail-open
//! If the group or the user cannot be found, or the directory cannot be read,
//! the principal is treated as NOT subject to 2FA and the login proceeds on
//! primary authentication alone. A missing `2fa` group therefore disables the
//! second factor for everyone. Every such decision is logged at `warn`.

use std::sync::Arc;

use crate::domain::ports::IdentityDirectory;
use crate::domain::services::{is_group_member, is_superuser};
use crate::domain::value_objects::Username;

/// Why a principal was (or was not) selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Member of the designated group
    Required,
    /// The superuser; never challenged
    SuperuserExempt,
    /// Not a member of the designated group
    NotInGroup,
    /// Group or user missing, or directory unavailable (fail-open)
    LookupFailed,
}

impl Eligibility {
    pub fn is_required(&self) -> bool {
        matches!(self, Eligibility::Required)
    }
}

/// Eligibility Gate Use Case
pub struct EligibilityGate<D>
where
    D: IdentityDirectory,
{
    directory: Arc<D>,
    group: String,
}

impl<D> EligibilityGate<D>
where
    D: IdentityDirectory,
{
    pub fn new(directory: Arc<D>, group: impl Into<String>) -> Self {
        Self {
            directory,
            group: group.into(),
        }
    }

    /// Whether `username` must complete the second factor
    pub async fn is_subject_to_second_factor(&self, username: &Username) -> bool {
        self.evaluate(username).await.is_required()
    }

    /// Full eligibility decision, including the reason
    pub async fn evaluate(&self, username: &Username) -> Eligibility {
        if is_superuser(username.as_str()) {
            return Eligibility::SuperuserExempt;
        }

        let group = match self.directory.find_group(&self.group).await {
            Ok(Some(group)) => group,
            Ok(None) => {
                tracing::warn!(group = %self.group, "Group not found, skipping 2FA (fail-open)");
                return Eligibility::LookupFailed;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Group lookup failed, skipping 2FA (fail-open)");
                return Eligibility::LookupFailed;
            }
        };

        let user = match self.directory.find_user(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(username = %username, "User not found, skipping 2FA (fail-open)");
                return Eligibility::LookupFailed;
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed, skipping 2FA (fail-open)");
                return Eligibility::LookupFailed;
            }
        };

        if is_group_member(&user, &group) {
            Eligibility::Required
        } else {
            tracing::debug!(username = %username, group = %self.group, "User not in 2FA group");
            Eligibility::NotInGroup
        }
    }
}
