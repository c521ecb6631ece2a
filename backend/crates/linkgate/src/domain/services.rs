//! Domain Services
//!
//! Pure domain logic: group membership, credential record parsing, and the
//! URLs and message text built around a token.

use platform::secret::SecretString;

use crate::domain::value_objects::{
    ChallengeToken, DeliveryCredentials, GroupEntry, UserEntry, VerificationStatus,
};

/// Name of the principal that is never challenged
///
/// Always exempt. Hardcoded, not configurable.
pub const SUPERUSER: &str = "root";

/// Link text of the confirmation message
pub const LINK_TEXT: &str = "Click here to authenticate";

/// Whether `username` is the exempt superuser
pub fn is_superuser(username: &str) -> bool {
    username == SUPERUSER
}

/// A user belongs to a group if listed as a supplementary member or if the
/// group is the user's primary group
pub fn is_group_member(user: &UserEntry, group: &GroupEntry) -> bool {
    group.members.iter().any(|m| m == &user.name) || user.primary_gid == group.gid
}

/// Parse a `key=value` credential record
///
/// Recognises `id=` (chat target) and `botkey=` (bot credential). Other lines
/// are ignored, a later key wins over an earlier one, and trailing whitespace
/// is stripped. Returns `None` unless both values are present and non-empty.
pub fn parse_credential_record(text: &str) -> Option<DeliveryCredentials> {
    let mut chat_target = None;
    let mut bot_credential = None;

    for line in text.lines() {
        if let Some(value) = line.strip_prefix("id=") {
            chat_target = Some(value.trim_end().to_string());
        } else if let Some(value) = line.strip_prefix("botkey=") {
            bot_credential = Some(value.trim_end().to_string());
        }
    }

    DeliveryCredentials::new(chat_target?, SecretString::new(bot_credential?))
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// `{public_base}/auth/{token}`
pub fn confirmation_link(public_base: &str, token: &ChallengeToken) -> String {
    join(public_base, &format!("auth/{}", token.as_str()))
}

/// `{verification_base}/auth/{token}/status`
pub fn status_url(verification_base: &str, token: &ChallengeToken) -> String {
    join(verification_base, &format!("auth/{}/status", token.as_str()))
}

/// HTML body of the confirmation message
pub fn render_message(link: &str) -> String {
    format!("<a href=\"{link}\">{LINK_TEXT}</a>")
}

/// Map a verification response code onto a status
///
/// `200` confirms. `denial_status`, when configured, is an explicit
/// rejection. Anything else is still pending.
pub fn classify_status(code: u16, denial_status: Option<u16>) -> VerificationStatus {
    match code {
        200 => VerificationStatus::Confirmed,
        other if Some(other) == denial_status => VerificationStatus::Denied,
        other => VerificationStatus::Pending(other),
    }
}
