//! The signed-in user, supplied by the host's session provider.
//!
//! Passed by reference into every mapper and permission check that needs it.

use serde::{Deserialize, Serialize};

/// Identity of the user driving the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Employee id.
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub leave_approver_email: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Normalized email used for approver comparisons.
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Canonical form of an email address used as a lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
