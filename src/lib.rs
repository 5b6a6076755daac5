//! Multi-tenant user and role persistence over a document store.
//!
//! Provides tenant-aware identity stores with pluggable tenant separation
//! strategies and pluggable document-store backends.
//!
//! # Core Components
//!
//! - [`multi_tenant`] - Tenant resolution and per-tenant store providers
//! - [`store`] - Document-backed user and role stores
//! - [`identity`] - Capability traits implemented by the stores
//! - [`document`] - The document-store abstraction and an in-process backend
//!
//! # Quick Start
//!
//! ```rust
//! use tenant_identity_store::document::InMemoryConnector;
//! use tenant_identity_store::multi_tenant::{StoreProvider, UserStoreProvider};
//! use tenant_identity_store::{
//!     MultiTenancyHandling, MultiTenancyOptions, StoreOptions, StoreProviderOptions, User,
//!     UserEmailStore, UserStore,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = StoreProviderOptions::new(StoreOptions::new("memory://local", "identity"))
//!     .with_multi_tenancy(MultiTenancyOptions::new(MultiTenancyHandling::TenantField));
//! let provider = UserStoreProvider::new(options, InMemoryConnector::new())?;
//! let cancel = CancellationToken::new();
//!
//! let store = provider.get_store("acme")?;
//! let mut user = User::new("testUser");
//! store.set_normalized_email(&mut user, Some("TEST@EXAMPLE.COM"), &cancel)?;
//! assert!(store.create(&mut user, &cancel).await?.succeeded());
//!
//! let other = provider.get_store("globex")?;
//! assert!(other.find_by_email("TEST@EXAMPLE.COM", &cancel).await?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod entity;
pub mod error;
pub mod identity;
pub mod multi_tenant;
pub mod options;
pub mod store;

// Re-export commonly used types for convenience
pub use entity::{Claim, Entity, EntityKind, Role, User, UserLogin, UserToken};
pub use error::{
    ConfigurationError, ErrorCode, IdentityError, IdentityResult, StoreError, StoreResult,
    TenancyError,
};
pub use identity::{
    QueryableRoleStore, QueryableUserStore, RoleClaimStore, RoleStore,
    UserAuthenticationTokenStore, UserAuthenticatorKeyStore, UserClaimStore, UserEmailStore,
    UserLockoutStore, UserLoginStore, UserPasswordStore, UserPhoneNumberStore, UserRoleStore,
    UserSecurityStampStore, UserStore, UserTwoFactorRecoveryCodeStore, UserTwoFactorStore,
};
pub use multi_tenant::{
    ManagerProvider, MultiTenancyHandling, MultiTenancyOptions, RoleStoreProvider, StoreProvider,
    TenancyStrategy, UserStoreProvider,
};
pub use options::{StoreOptions, StoreProviderOptions, TenantStoreOptions};
pub use store::{DocumentRoleStore, DocumentUserStore, EntityStore};
