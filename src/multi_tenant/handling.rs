//! Multi-tenancy handling modes and their settings.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DATABASE_FORMAT: &str = "{tenant}_{database}";
pub const DEFAULT_COLLECTION_FORMAT: &str = "{tenant}_{collection}";

/// How tenants are separated in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MultiTenancyHandling {
    /// All tenants share the base database and collections, unfiltered.
    #[default]
    None,
    /// Shared collections; every query is narrowed by the tenant field.
    TenantField,
    /// One database per tenant, named from the database format.
    TenantDatabase,
    /// One pair of collections per tenant, named from the collection format.
    TenantCollection,
}

impl MultiTenancyHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiTenancyHandling::None => "None",
            MultiTenancyHandling::TenantField => "TenantField",
            MultiTenancyHandling::TenantDatabase => "TenantDatabase",
            MultiTenancyHandling::TenantCollection => "TenantCollection",
        }
    }

    /// Whether resolving options in this mode needs a tenant id.
    pub fn requires_tenant(&self) -> bool {
        !matches!(self, MultiTenancyHandling::None)
    }
}

impl fmt::Display for MultiTenancyHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_database_format() -> String {
    DEFAULT_DATABASE_FORMAT.to_string()
}

fn default_collection_format() -> String {
    DEFAULT_COLLECTION_FORMAT.to_string()
}

/// Multi-tenancy settings of a store provider.
///
/// # Example
///
/// ```rust
/// use tenant_identity_store::{MultiTenancyHandling, MultiTenancyOptions};
///
/// let options = MultiTenancyOptions::new(MultiTenancyHandling::TenantDatabase)
///     .with_database_format("{database}-{tenant}");
///
/// assert_eq!(options.collection_format, "{tenant}_{collection}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiTenancyOptions {
    #[serde(default)]
    pub handling: MultiTenancyHandling,
    /// Template with `{tenant}` and `{database}` placeholders
    #[serde(default = "default_database_format")]
    pub database_format: String,
    /// Template with `{tenant}` and `{collection}` placeholders
    #[serde(default = "default_collection_format")]
    pub collection_format: String,
}

impl MultiTenancyOptions {
    pub fn new(handling: MultiTenancyHandling) -> Self {
        Self {
            handling,
            database_format: default_database_format(),
            collection_format: default_collection_format(),
        }
    }

    pub fn with_database_format(mut self, format: impl Into<String>) -> Self {
        self.database_format = format.into();
        self
    }

    pub fn with_collection_format(mut self, format: impl Into<String>) -> Self {
        self.collection_format = format.into();
        self
    }
}

impl Default for MultiTenancyOptions {
    fn default() -> Self {
        Self::new(MultiTenancyHandling::None)
    }
}
