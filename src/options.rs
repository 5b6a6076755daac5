//! Store configuration values.
//!
//! Options are layered by composition:
//!
//! * [`StoreOptions`] holds the base connection, database and collection names
//! * [`TenantStoreOptions`] adds the tenant a store is bound to
//! * [`StoreProviderOptions`] adds the optional [`MultiTenancyOptions`] a
//!   provider uses to derive tenant-scoped options per request
//!
//! All three bind from a configuration tree using PascalCase keys:
//!
//! ```rust
//! use tenant_identity_store::{MultiTenancyHandling, StoreProviderOptions};
//! use serde_json::json;
//!
//! let config = json!({
//!     "Identity": {
//!         "Store": {
//!             "ConnectionString": "memory://local",
//!             "DatabaseName": "identity",
//!             "MultiTenancy": { "Handling": "TenantField" }
//!         }
//!     }
//! });
//!
//! let options = StoreProviderOptions::from_section(&config, "Identity:Store").unwrap();
//! assert_eq!(options.store.users_collection, "users");
//! assert_eq!(
//!     options.multi_tenancy.map(|m| m.handling),
//!     Some(MultiTenancyHandling::TenantField)
//! );
//! ```

use crate::error::ConfigurationError;
use crate::multi_tenant::MultiTenancyOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_USERS_COLLECTION: &str = "users";
pub const DEFAULT_ROLES_COLLECTION: &str = "roles";

fn default_users_collection() -> String {
    DEFAULT_USERS_COLLECTION.to_string()
}

fn default_roles_collection() -> String {
    DEFAULT_ROLES_COLLECTION.to_string()
}

/// Base settings of a document-backed identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreOptions {
    /// Connection descriptor handed to the document connector
    #[serde(default)]
    pub connection_string: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    #[serde(default = "default_roles_collection")]
    pub roles_collection: String,
}

impl StoreOptions {
    pub fn new(connection_string: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database_name: database_name.into(),
            users_collection: default_users_collection(),
            roles_collection: default_roles_collection(),
        }
    }

    pub fn with_users_collection(mut self, name: impl Into<String>) -> Self {
        self.users_collection = name.into();
        self
    }

    pub fn with_roles_collection(mut self, name: impl Into<String>) -> Self {
        self.roles_collection = name.into();
        self
    }

    /// Check that every name required to reach a collection is present.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.connection_string.trim().is_empty() {
            return Err(ConfigurationError::MissingConnectionString);
        }
        if self.database_name.trim().is_empty() {
            return Err(ConfigurationError::MissingDatabaseName);
        }
        if self.users_collection.trim().is_empty() {
            return Err(ConfigurationError::MissingCollectionName {
                kind: "users".to_string(),
            });
        }
        if self.roles_collection.trim().is_empty() {
            return Err(ConfigurationError::MissingCollectionName {
                kind: "roles".to_string(),
            });
        }
        Ok(())
    }
}

/// Store options bound to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TenantStoreOptions {
    #[serde(flatten)]
    pub store: StoreOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl TenantStoreOptions {
    /// Options with no tenant bound.
    pub fn new(store: StoreOptions) -> Self {
        Self {
            store,
            tenant_id: None,
        }
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Whether queries are narrowed to a tenant.
    pub fn has_tenant_set(&self) -> bool {
        self.tenant().is_some()
    }

    /// The bound tenant, if it is not blank.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant_id
            .as_deref()
            .filter(|tenant| !tenant.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.store.validate()
    }
}

impl From<StoreOptions> for TenantStoreOptions {
    fn from(store: StoreOptions) -> Self {
        Self::new(store)
    }
}

/// Options owned by a store provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreProviderOptions {
    #[serde(flatten)]
    pub store: StoreOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_tenancy: Option<MultiTenancyOptions>,
}

impl StoreProviderOptions {
    pub fn new(store: StoreOptions) -> Self {
        Self {
            store,
            multi_tenancy: None,
        }
    }

    pub fn with_multi_tenancy(mut self, multi_tenancy: MultiTenancyOptions) -> Self {
        self.multi_tenancy = Some(multi_tenancy);
        self
    }

    /// Bind options from a JSON configuration object.
    pub fn from_json(value: &Value) -> Result<Self, ConfigurationError> {
        Ok(Self::deserialize(value)?)
    }

    /// Bind options from a colon-separated section of a configuration tree.
    pub fn from_section(root: &Value, path: &str) -> Result<Self, ConfigurationError> {
        let mut section = root;
        for key in path.split(':').filter(|key| !key.is_empty()) {
            section = section
                .get(key)
                .ok_or_else(|| ConfigurationError::InvalidSection {
                    path: path.to_string(),
                })?;
        }

        if !section.is_object() {
            return Err(ConfigurationError::InvalidSection {
                path: path.to_string(),
            });
        }

        Self::from_json(section)
    }

    /// Validate the base options.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.store.validate()
    }
}

impl From<StoreOptions> for StoreProviderOptions {
    fn from(store: StoreOptions) -> Self {
        Self::new(store)
    }
}
