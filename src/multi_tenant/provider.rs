//! Per-tenant store and manager providers.
//!
//! A provider owns one immutable [`StoreProviderOptions`] value, a tenancy
//! strategy and a document connector. Each call to
//! [`StoreProvider::get_store`] derives fresh tenant-scoped options and binds
//! a new store to them; nothing is cached between calls, so providers can be
//! shared freely across concurrent requests.

use crate::document::DocumentConnector;
use crate::error::{StoreError, StoreResult};
use crate::multi_tenant::resolver::{self, TenancyStrategy};
use crate::options::{StoreProviderOptions, TenantStoreOptions};
use crate::store::{DocumentRoleStore, DocumentUserStore};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Factory of stores bound to one tenant.
pub trait StoreProvider: Send + Sync {
    type Store;

    /// Build a store for `tenant_id`. A blank id is only accepted when the
    /// handling mode does not need a tenant.
    fn get_store(&self, tenant_id: &str) -> StoreResult<Self::Store>;
}

/// State shared by the user and role providers.
#[derive(Clone)]
struct ProviderCore<K> {
    options: Arc<StoreProviderOptions>,
    strategy: Option<Arc<dyn TenancyStrategy>>,
    connector: K,
}

impl<K: DocumentConnector> ProviderCore<K> {
    fn new(options: StoreProviderOptions, connector: K) -> StoreResult<Self> {
        let strategy = options
            .multi_tenancy
            .clone()
            .map(|tenancy| Arc::new(tenancy) as Arc<dyn TenancyStrategy>);
        Self::with_strategy(options, strategy, connector)
    }

    fn with_strategy(
        options: StoreProviderOptions,
        strategy: Option<Arc<dyn TenancyStrategy>>,
        connector: K,
    ) -> StoreResult<Self> {
        options.validate()?;
        if let Some(strategy) = &strategy {
            strategy.validate()?;
        }

        Ok(Self {
            options: Arc::new(options),
            strategy,
            connector,
        })
    }

    fn store_options(&self, tenant_id: &str) -> StoreResult<TenantStoreOptions> {
        let options = resolver::resolve(&self.options.store, self.strategy.as_deref(), tenant_id)?;
        debug!(
            "Resolved options for tenant '{}': database '{}', tenant filter {:?}",
            tenant_id, options.store.database_name, options.tenant_id
        );
        Ok(options)
    }
}

impl<K> fmt::Debug for ProviderCore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCore")
            .field("options", &self.options)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

macro_rules! document_store_provider {
    ($(#[$doc:meta])* $name:ident => $store:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<K> {
            core: ProviderCore<K>,
        }

        impl<K: DocumentConnector> $name<K> {
            /// Create a provider resolving tenants with the configured
            /// [`MultiTenancyOptions`](crate::MultiTenancyOptions).
            pub fn new(options: StoreProviderOptions, connector: K) -> StoreResult<Self> {
                Ok(Self {
                    core: ProviderCore::new(options, connector)?,
                })
            }

            /// Create a provider resolving tenants with a custom strategy.
            pub fn with_strategy(
                options: StoreProviderOptions,
                strategy: Arc<dyn TenancyStrategy>,
                connector: K,
            ) -> StoreResult<Self> {
                Ok(Self {
                    core: ProviderCore::with_strategy(options, Some(strategy), connector)?,
                })
            }

            pub fn options(&self) -> &StoreProviderOptions {
                &self.core.options
            }

            /// The options a store for `tenant_id` would be bound to.
            pub fn store_options(&self, tenant_id: &str) -> StoreResult<TenantStoreOptions> {
                self.core.store_options(tenant_id)
            }
        }

        impl<K: DocumentConnector> StoreProvider for $name<K> {
            type Store = $store<K>;

            fn get_store(&self, tenant_id: &str) -> StoreResult<Self::Store> {
                let options = self.core.store_options(tenant_id)?;
                $store::new(options, self.core.connector.clone())
            }
        }
    };
}

document_store_provider!(
    /// Provider of [`DocumentUserStore`]s.
    UserStoreProvider => DocumentUserStore
);

document_store_provider!(
    /// Provider of [`DocumentRoleStore`]s.
    RoleStoreProvider => DocumentRoleStore
);

/// Provider of caller-defined managers wrapping per-tenant stores.
///
/// The manager type and its construction belong to the caller; this type
/// only resolves the store for the tenant and hands it to the factory.
///
/// # Example
///
/// ```rust
/// use tenant_identity_store::document::InMemoryConnector;
/// use tenant_identity_store::multi_tenant::{ManagerProvider, RoleStoreProvider};
/// use tenant_identity_store::store::DocumentRoleStore;
/// use tenant_identity_store::{
///     MultiTenancyHandling, MultiTenancyOptions, StoreOptions, StoreProviderOptions,
/// };
///
/// struct RoleManager {
///     store: DocumentRoleStore<InMemoryConnector>,
/// }
///
/// let options = StoreProviderOptions::new(StoreOptions::new("memory://local", "identity"))
///     .with_multi_tenancy(MultiTenancyOptions::new(MultiTenancyHandling::TenantField));
/// let stores = RoleStoreProvider::new(options, InMemoryConnector::new()).unwrap();
/// let managers = ManagerProvider::new(stores, |store| RoleManager { store });
///
/// let manager = managers.get_manager("acme").unwrap();
/// assert_eq!(manager.store.options().tenant(), Some("acme"));
/// ```
pub struct ManagerProvider<P, F> {
    stores: P,
    factory: F,
}

impl<P, F, M> ManagerProvider<P, F>
where
    P: StoreProvider,
    F: Fn(P::Store) -> M + Send + Sync,
{
    pub fn new(stores: P, factory: F) -> Self {
        Self { stores, factory }
    }

    pub fn stores(&self) -> &P {
        &self.stores
    }

    /// Build a manager around a store for `tenant_id`.
    pub fn get_manager(&self, tenant_id: &str) -> Result<M, StoreError> {
        let store = self.stores.get_store(tenant_id)?;
        Ok((self.factory)(store))
    }
}

impl<P: fmt::Debug, F> fmt::Debug for ManagerProvider<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerProvider")
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}
