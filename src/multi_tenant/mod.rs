//! Multi-tenant store resolution.
//!
//! This module turns one static configuration into per-tenant stores:
//!
//! * **Handling modes** ([`MultiTenancyHandling`]): how tenants are separated
//!   (shared collections narrowed by a tenant field, a database per tenant,
//!   or collections per tenant)
//! * **Name templates** ([`template`]): single-pass `{placeholder}` rendering
//!   of tenant database and collection names
//! * **Resolution** ([`TenancyStrategy`], [`resolve`]): pure derivation of the
//!   [`TenantStoreOptions`](crate::TenantStoreOptions) a store is bound to
//! * **Providers** ([`StoreProvider`]): per-request factories of stores and
//!   managers bound to the resolved options
//!
//! # Example Usage
//!
//! ```rust
//! use tenant_identity_store::document::InMemoryConnector;
//! use tenant_identity_store::multi_tenant::{StoreProvider, UserStoreProvider};
//! use tenant_identity_store::{
//!     MultiTenancyHandling, MultiTenancyOptions, StoreOptions, StoreProviderOptions,
//! };
//!
//! let options = StoreProviderOptions::new(StoreOptions::new("memory://local", "identity"))
//!     .with_multi_tenancy(MultiTenancyOptions::new(MultiTenancyHandling::TenantField));
//!
//! let provider = UserStoreProvider::new(options, InMemoryConnector::new()).unwrap();
//! let store = provider.get_store("acme").unwrap();
//! assert_eq!(store.options().tenant(), Some("acme"));
//! ```

pub mod handling;
pub mod provider;
pub mod resolver;
pub mod template;

pub use handling::{
    DEFAULT_COLLECTION_FORMAT, DEFAULT_DATABASE_FORMAT, MultiTenancyHandling, MultiTenancyOptions,
};
pub use provider::{ManagerProvider, RoleStoreProvider, StoreProvider, UserStoreProvider};
pub use resolver::{TenancyStrategy, resolve};
