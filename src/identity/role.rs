//! Capability contracts of a role store.

use crate::entity::{Claim, Role};
use crate::error::{IdentityResult, StoreResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Persistence of roles.
pub trait RoleStore: Send + Sync {
    fn create(
        &self,
        role: &mut Role,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn update(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn delete(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn find_by_id(
        &self,
        role_id: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<Role>>> + Send;

    fn find_by_name(
        &self,
        normalized_role_name: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<Role>>> + Send;

    fn role_id(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<String>;

    fn role_name(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<String>;

    fn set_role_name(
        &self,
        role: &mut Role,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn normalized_role_name(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>>;

    fn set_normalized_role_name(
        &self,
        role: &mut Role,
        normalized_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;
}

/// Enumeration of every role visible to the store.
pub trait QueryableRoleStore: RoleStore {
    fn roles(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Vec<Role>>> + Send;
}

pub trait RoleClaimStore: RoleStore {
    fn claims(&self, role: &Role, cancel: &CancellationToken) -> StoreResult<Vec<Claim>>;

    /// Add a claim unless one of the same type is already held.
    fn add_claim(
        &self,
        role: &mut Role,
        claim: Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn remove_claim(
        &self,
        role: &mut Role,
        claim: &Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;
}
