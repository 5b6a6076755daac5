//! Document-backed role store.

use crate::document::{DocumentConnector, Filter};
use crate::entity::{Claim, Role};
use crate::error::{IdentityResult, StoreResult};
use crate::identity::{QueryableRoleStore, RoleClaimStore, RoleStore};
use crate::options::TenantStoreOptions;
use crate::store::EntityStore;
use crate::store::user::add_claim_once;
use log::debug;
use tokio_util::sync::CancellationToken;

/// Role store over the roles collection of a document store.
#[derive(Debug)]
pub struct DocumentRoleStore<K: DocumentConnector> {
    inner: EntityStore<Role, K>,
}

impl<K: DocumentConnector> DocumentRoleStore<K> {
    pub fn new(options: TenantStoreOptions, connector: K) -> StoreResult<Self> {
        Ok(Self {
            inner: EntityStore::new(options, connector)?,
        })
    }

    pub fn options(&self) -> &TenantStoreOptions {
        self.inner.options()
    }

    pub fn entities(&self) -> &EntityStore<Role, K> {
        &self.inner
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl<K: DocumentConnector> RoleStore for DocumentRoleStore<K> {
    async fn create(&self, role: &mut Role, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.create(role, cancel).await
    }

    async fn update(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.update(role, cancel).await
    }

    async fn delete(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.delete(role, cancel).await
    }

    async fn find_by_id(&self, role_id: &str, cancel: &CancellationToken) -> StoreResult<Option<Role>> {
        self.inner.find_by_id(role_id, cancel).await
    }

    async fn find_by_name(
        &self,
        normalized_role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<Role>> {
        debug!("Finding the role named '{}'", normalized_role_name);
        self.inner
            .find_one(Filter::eq("normalizedName", normalized_role_name), cancel)
            .await
    }

    fn role_id(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<String> {
        self.inner.access(cancel, || role.id.to_string())
    }

    fn role_name(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<String> {
        self.inner.access(cancel, || role.name.clone())
    }

    fn set_role_name(
        &self,
        role: &mut Role,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || role.name = role_name.to_string())
    }

    fn normalized_role_name(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || role.normalized_name.clone())
    }

    fn set_normalized_role_name(
        &self,
        role: &mut Role,
        normalized_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || role.normalized_name = normalized_name.map(str::to_string))
    }
}

impl<K: DocumentConnector> QueryableRoleStore for DocumentRoleStore<K> {
    async fn roles(&self, cancel: &CancellationToken) -> StoreResult<Vec<Role>> {
        self.inner.find_all(Filter::All, cancel).await
    }
}

impl<K: DocumentConnector> RoleClaimStore for DocumentRoleStore<K> {
    fn claims(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<Vec<Claim>> {
        self.inner.access(cancel, || role.claims.clone())
    }

    fn add_claim(
        &self,
        role: &mut Role,
        claim: Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || add_claim_once(&mut role.claims, claim))
    }

    fn remove_claim(
        &self,
        role: &mut Role,
        claim: &Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            role.claims
                .retain(|existing| existing.claim_type != claim.claim_type)
        })
    }
}
