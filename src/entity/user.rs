//! The persisted user record.

use crate::document::ObjectId;
use crate::entity::{Claim, Entity, EntityKind, UserLogin, UserToken};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account.
///
/// Fields left unset in a stored document take their default values when
/// the document is read back.
///
/// # Example
///
/// ```rust
/// use tenant_identity_store::User;
///
/// let mut user = User::new("testUser");
/// user.normalized_name = Some("TESTUSER".to_string());
/// user.email = Some("test@example.com".to_string());
///
/// assert!(user.id.is_nil());
/// assert!(user.tenant_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,

    pub name: String,
    pub normalized_name: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,

    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    /// Consecutive failed sign-ins; `None` once reset
    pub access_failed_count: Option<u32>,

    pub logins: Vec<UserLogin>,
    pub two_factor_enabled: bool,
    pub security_stamp: Option<String>,
    pub recovery_codes: Vec<String>,
    pub roles: Vec<String>,
    pub claims: Vec<Claim>,
    pub authenticator_key: Option<String>,
    pub tokens: Vec<UserToken>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    fn set_tenant_id(&mut self, tenant_id: Option<String>) {
        self.tenant_id = tenant_id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }
}
