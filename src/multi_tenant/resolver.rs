//! Derivation of tenant-scoped store options.
//!
//! A [`TenancyStrategy`] turns the base [`StoreOptions`] of a provider and the
//! tenant of the current request into the [`TenantStoreOptions`] a store is
//! bound to. The built-in strategy is [`MultiTenancyOptions`]:
//!
//! | Handling           | Database                  | Collections                 | Tenant filter |
//! |--------------------|---------------------------|-----------------------------|---------------|
//! | `None`             | base                      | base                        | none          |
//! | `TenantField`      | base                      | base                        | `tenantId`    |
//! | `TenantDatabase`   | rendered `DatabaseFormat` | base                        | none          |
//! | `TenantCollection` | base                      | rendered `CollectionFormat` | none          |
//!
//! Resolution never touches the document store and always yields the same
//! options for the same inputs.
//!
//! # Example Usage
//!
//! ```rust
//! use tenant_identity_store::multi_tenant::resolve;
//! use tenant_identity_store::{MultiTenancyHandling, MultiTenancyOptions, StoreOptions};
//!
//! let base = StoreOptions::new("memory://local", "identity");
//! let tenancy = MultiTenancyOptions::new(MultiTenancyHandling::TenantDatabase);
//!
//! let options = resolve(&base, Some(&tenancy), "acme").unwrap();
//! assert_eq!(options.store.database_name, "acme_identity");
//! assert!(!options.has_tenant_set());
//! ```

use crate::error::TenancyError;
use crate::multi_tenant::handling::{MultiTenancyHandling, MultiTenancyOptions};
use crate::multi_tenant::template::{self, COLLECTION, DATABASE, TENANT};
use crate::options::{StoreOptions, TenantStoreOptions};
use std::fmt::Debug;

/// Strategy deriving tenant-scoped options from base options.
///
/// Implementations must be pure: no I/O, and equal inputs give equal outputs.
/// Providers hold a strategy behind an `Arc` and call it once per store.
pub trait TenancyStrategy: Debug + Send + Sync {
    /// Derive the options for `tenant_id`; a blank id means "no tenant".
    fn resolve(
        &self,
        base: &StoreOptions,
        tenant_id: &str,
    ) -> Result<TenantStoreOptions, TenancyError>;

    /// Reject settings that could never resolve correctly.
    fn validate(&self) -> Result<(), TenancyError> {
        Ok(())
    }
}

/// Resolve tenant-scoped options, failing when no strategy is configured.
pub fn resolve(
    base: &StoreOptions,
    strategy: Option<&dyn TenancyStrategy>,
    tenant_id: &str,
) -> Result<TenantStoreOptions, TenancyError> {
    strategy
        .ok_or(TenancyError::NotConfigured)?
        .resolve(base, tenant_id)
}

impl MultiTenancyOptions {
    fn require_tenant<'a>(&self, tenant_id: &'a str) -> Result<&'a str, TenancyError> {
        let tenant = tenant_id.trim();
        if tenant.is_empty() {
            return Err(TenancyError::MissingTenant {
                handling: self.handling.to_string(),
            });
        }
        Ok(tenant)
    }
}

fn require_placeholder(kind: &str, format: &str) -> Result<(), TenancyError> {
    if template::has_placeholder(format, TENANT) {
        Ok(())
    } else {
        Err(TenancyError::MissingTenantPlaceholder {
            kind: kind.to_string(),
            template: format.to_string(),
        })
    }
}

impl TenancyStrategy for MultiTenancyOptions {
    fn resolve(
        &self,
        base: &StoreOptions,
        tenant_id: &str,
    ) -> Result<TenantStoreOptions, TenancyError> {
        self.validate()?;

        let mut store = base.clone();
        let mut bound_tenant = None;

        match self.handling {
            MultiTenancyHandling::None => {}
            MultiTenancyHandling::TenantField => {
                bound_tenant = Some(self.require_tenant(tenant_id)?.to_string());
            }
            MultiTenancyHandling::TenantDatabase => {
                let tenant = self.require_tenant(tenant_id)?;
                store.database_name = template::render(
                    &self.database_format,
                    &[(TENANT, tenant), (DATABASE, &base.database_name)],
                );
            }
            MultiTenancyHandling::TenantCollection => {
                let tenant = self.require_tenant(tenant_id)?;
                store.users_collection = template::render(
                    &self.collection_format,
                    &[(TENANT, tenant), (COLLECTION, &base.users_collection)],
                );
                store.roles_collection = template::render(
                    &self.collection_format,
                    &[(TENANT, tenant), (COLLECTION, &base.roles_collection)],
                );
            }
        }

        Ok(TenantStoreOptions {
            store,
            tenant_id: bound_tenant,
        })
    }

    fn validate(&self) -> Result<(), TenancyError> {
        match self.handling {
            MultiTenancyHandling::TenantDatabase => {
                require_placeholder("database", &self.database_format)
            }
            MultiTenancyHandling::TenantCollection => {
                require_placeholder("collection", &self.collection_format)
            }
            MultiTenancyHandling::None | MultiTenancyHandling::TenantField => Ok(()),
        }
    }
}
