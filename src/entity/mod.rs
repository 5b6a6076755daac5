//! Identity records persisted by the stores.
//!
//! Every stored record implements [`Entity`], which exposes the three fields
//! the generic store manages for it: the identifier, the tenant tag and the
//! creation time. Field names are camelCase in storage; the identifier is
//! stored as `_id` and the tenant tag as `tenantId`.

pub mod claim;
pub mod role;
pub mod user;

pub use claim::{Claim, UserLogin, UserToken};
pub use role::Role;
pub use user::User;

use crate::document::ObjectId;
use crate::error::ErrorCode;
use crate::options::StoreOptions;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Name of the stored tenant tag.
pub const TENANT_FIELD: &str = "tenantId";

/// The kinds of record the stores persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Role,
}

impl EntityKind {
    /// Lowercase name used in log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Role => "role",
        }
    }

    /// The configured collection holding this kind.
    pub fn collection_name<'a>(&self, options: &'a StoreOptions) -> &'a str {
        match self {
            EntityKind::User => &options.users_collection,
            EntityKind::Role => &options.roles_collection,
        }
    }

    pub fn not_found(&self) -> ErrorCode {
        match self {
            EntityKind::User => ErrorCode::UserNotFound,
            EntityKind::Role => ErrorCode::RoleNotFound,
        }
    }

    pub fn not_modified(&self) -> ErrorCode {
        match self {
            EntityKind::User => ErrorCode::UserNotModified,
            EntityKind::Role => ErrorCode::RoleNotModified,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record the generic entity store can persist.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// The identifier; [`ObjectId::NIL`] until the entity is created.
    fn id(&self) -> ObjectId;

    fn set_id(&mut self, id: ObjectId);

    fn tenant_id(&self) -> Option<&str>;

    fn set_tenant_id(&mut self, tenant_id: Option<String>);

    fn created_at(&self) -> DateTime<Utc>;

    fn set_created_at(&mut self, created_at: DateTime<Utc>);
}
