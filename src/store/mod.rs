//! Tenant-aware persistence of identity records.
//!
//! [`EntityStore`] is the generic core shared by the user and role stores. It
//! is bound to one [`TenantStoreOptions`] value and to one collection of the
//! document store, which it opens lazily on first use. Every query and every
//! write other than an insert goes through [`EntityStore::normalize_filter`],
//! so a store bound to a tenant can never see or touch another tenant's
//! documents: a cross-tenant update or delete reports the same "not found"
//! outcome as a missing id.
//!
//! Writes report business outcomes through [`IdentityResult`]; storage
//! failures on writes become [`ErrorCode::UnknownError`] failures after being
//! logged, while storage failures on reads surface as [`StoreError::Storage`].
//!
//! # Example Usage
//!
//! ```rust
//! use tenant_identity_store::document::InMemoryConnector;
//! use tenant_identity_store::store::EntityStore;
//! use tenant_identity_store::{Role, StoreOptions, TenantStoreOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = TenantStoreOptions::new(StoreOptions::new("memory://local", "identity"))
//!     .with_tenant_id("acme");
//! let store: EntityStore<Role, _> = EntityStore::new(options, InMemoryConnector::new())?;
//! let cancel = CancellationToken::new();
//!
//! let mut role = Role::new("admin");
//! assert!(store.create(&mut role, &cancel).await?.succeeded());
//! assert_eq!(role.tenant_id.as_deref(), Some("acme"));
//!
//! let found = store.find_by_id(&role.id.to_string(), &cancel).await?;
//! assert_eq!(found.map(|r| r.name), Some("admin".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod role;
pub mod user;

pub use role::DocumentRoleStore;
pub use user::DocumentUserStore;

use crate::document::{
    CollectionOf, DocumentClient, DocumentCollection, DocumentConnector, DocumentDatabase,
    DocumentError, Filter, FindOptions, ID_FIELD, ObjectId, ParseObjectIdError, ReplaceOptions,
};
use crate::entity::{Entity, TENANT_FIELD};
use crate::error::{ErrorCode, IdentityResult, StoreError, StoreResult};
use crate::options::TenantStoreOptions;
use chrono::Utc;
use log::{debug, error, info, trace, warn};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Generic CRUD over one collection, narrowed to the bound tenant.
pub struct EntityStore<E, K: DocumentConnector> {
    options: TenantStoreOptions,
    connector: K,
    collection: OnceCell<CollectionOf<K>>,
    disposed: AtomicBool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, K: DocumentConnector> EntityStore<E, K> {
    /// Create a store bound to `options`. No connection is made until the
    /// first operation that needs the collection.
    pub fn new(options: TenantStoreOptions, connector: K) -> StoreResult<Self> {
        options.validate()?;

        Ok(Self {
            options,
            connector,
            collection: OnceCell::new(),
            disposed: AtomicBool::new(false),
            _entity: PhantomData,
        })
    }

    pub fn options(&self) -> &TenantStoreOptions {
        &self.options
    }

    pub fn database_name(&self) -> &str {
        &self.options.store.database_name
    }

    pub fn collection_name(&self) -> &str {
        E::KIND.collection_name(&self.options.store)
    }

    /// Mark the store as disposed. Later operations fail with
    /// [`StoreError::Disposed`]; calling this again has no effect.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            trace!("Disposed the {} store of {}", E::KIND, self.context());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Fail when the store is disposed or the caller has cancelled.
    pub fn check(&self, cancel: &CancellationToken) -> StoreResult<()> {
        if self.is_disposed() {
            return Err(StoreError::Disposed);
        }
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        Ok(())
    }

    /// Run an in-memory accessor behind the same checks as store I/O.
    pub fn access<T>(&self, cancel: &CancellationToken, f: impl FnOnce() -> T) -> StoreResult<T> {
        self.check(cancel)?;
        Ok(f())
    }

    /// Narrow `filter` to the bound tenant, if any.
    pub fn normalize_filter(&self, filter: Filter) -> Filter {
        match self.options.tenant() {
            Some(tenant) => filter.and(Filter::eq(TENANT_FIELD, tenant)),
            None => filter,
        }
    }

    /// The normalized filter selecting the entity with `id`.
    pub fn id_filter(&self, id: ObjectId) -> Filter {
        self.normalize_filter(Filter::eq(ID_FIELD, id.to_string()))
    }

    /// Describes the bound collection for log and error messages.
    pub fn context(&self) -> String {
        let mut context = format!(
            "collection '{}' of database '{}'",
            self.collection_name(),
            self.database_name()
        );
        if let Some(tenant) = self.options.tenant() {
            context.push_str(&format!(" for tenant '{}'", tenant));
        }
        context
    }

    async fn collection(&self) -> Result<&CollectionOf<K>, DocumentError> {
        self.collection
            .get_or_try_init(|| async {
                let client = self.connector.connect(&self.options.store.connection_string)?;
                let collection = client
                    .database(self.database_name())
                    .collection(self.collection_name());
                debug!("Opened {}", self.context());
                Ok::<_, DocumentError>(collection)
            })
            .await
    }

    fn require_id(&self, entity: &E, argument: &str) -> StoreResult<ObjectId> {
        let id = entity.id();
        if id.is_nil() {
            return Err(StoreError::invalid_argument(
                argument,
                format!("the {} has no identifier", E::KIND),
            ));
        }
        Ok(id)
    }

    fn read_error(&self, operation: &str, source: DocumentError) -> StoreError {
        error!(
            "Storage error during {} on {}: {}",
            operation,
            self.context(),
            source
        );
        StoreError::storage(operation, self.context(), source)
    }

    /// Persist a new entity.
    ///
    /// The id, creation time and tenant are assigned to `entity` only once
    /// the insert succeeds; on any failure the caller's value is untouched.
    pub async fn create(&self, entity: &mut E, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.check(cancel)?;

        let mut stamped = entity.clone();
        if stamped.id().is_nil() {
            stamped.set_id(ObjectId::new());
        }
        stamped.set_created_at(Utc::now());
        if let Some(tenant) = self.options.tenant() {
            stamped.set_tenant_id(Some(tenant.to_string()));
        }

        info!("Creating {} '{}' in {}", E::KIND, stamped.id(), self.context());

        let document = serde_json::to_value(&stamped)?;
        let result: Result<(), DocumentError> = async {
            self.collection().await?.insert_one(document).await
        }
        .await;

        match result {
            Ok(()) => {
                trace!("Created {} '{}'", E::KIND, stamped.id());
                *entity = stamped;
                Ok(IdentityResult::Success)
            }
            Err(e) => {
                error!(
                    "Could not create {} '{}' in {}: {}",
                    E::KIND,
                    stamped.id(),
                    self.context(),
                    e
                );
                Ok(IdentityResult::failed(
                    ErrorCode::UnknownError,
                    format!("The storage system failed persisting the {}", E::KIND),
                ))
            }
        }
    }

    /// Replace the stored entity with the same id.
    pub async fn update(&self, entity: &E, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.check(cancel)?;
        let id = self.require_id(entity, E::KIND.name())?;

        info!("Updating {} '{}' in {}", E::KIND, id, self.context());

        let mut document = serde_json::to_value(entity)?;
        if let (Some(tenant), Some(fields)) = (self.options.tenant(), document.as_object_mut()) {
            fields.insert(TENANT_FIELD.to_string(), Value::String(tenant.to_string()));
        }

        let filter = self.id_filter(id);
        let result = async {
            self.collection()
                .await?
                .replace_one(&filter, document, ReplaceOptions { upsert: false })
                .await
        }
        .await;

        match result {
            Ok(outcome) if outcome.matched_count == 0 => {
                warn!("The {} '{}' was not found in {}", E::KIND, id, self.context());
                Ok(IdentityResult::failed(
                    E::KIND.not_found(),
                    format!(
                        "The {} with ID {} was not found and could not be updated",
                        E::KIND,
                        id
                    ),
                ))
            }
            Ok(outcome) if outcome.modified_count == 0 => {
                warn!("The {} '{}' was not modified in {}", E::KIND, id, self.context());
                Ok(IdentityResult::failed(
                    E::KIND.not_modified(),
                    format!("The {} with ID {} was not updated", E::KIND, id),
                ))
            }
            Ok(_) => {
                trace!("Updated {} '{}'", E::KIND, id);
                Ok(IdentityResult::Success)
            }
            Err(e) => {
                error!(
                    "Could not update {} '{}' in {}: {}",
                    E::KIND,
                    id,
                    self.context(),
                    e
                );
                Ok(IdentityResult::failed(
                    ErrorCode::UnknownError,
                    format!("Could not update the {} in the storage system", E::KIND),
                ))
            }
        }
    }

    /// Remove the stored entity with the same id.
    pub async fn delete(&self, entity: &E, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.check(cancel)?;
        let id = self.require_id(entity, E::KIND.name())?;

        info!("Deleting {} '{}' from {}", E::KIND, id, self.context());

        let filter = self.id_filter(id);
        let result = async { self.collection().await?.delete_one(&filter).await }.await;

        match result {
            Ok(outcome) if outcome.deleted_count == 0 => {
                warn!("The {} '{}' was not found in {}", E::KIND, id, self.context());
                Ok(IdentityResult::failed(
                    E::KIND.not_found(),
                    format!("The {} was not deleted from the storage", E::KIND),
                ))
            }
            Ok(outcome) => {
                if outcome.deleted_count > 1 {
                    warn!(
                        "Deleting {} '{}' removed {} documents from {}",
                        E::KIND,
                        id,
                        outcome.deleted_count,
                        self.context()
                    );
                }
                trace!("Deleted {} '{}'", E::KIND, id);
                Ok(IdentityResult::Success)
            }
            Err(e) => {
                error!(
                    "Could not delete {} '{}' from {}: {}",
                    E::KIND,
                    id,
                    self.context(),
                    e
                );
                Ok(IdentityResult::failed(
                    ErrorCode::UnknownError,
                    format!("Could not delete the {} from the storage system", E::KIND),
                ))
            }
        }
    }

    /// The first entity matching `filter` within the bound tenant.
    pub async fn find_one(&self, filter: Filter, cancel: &CancellationToken) -> StoreResult<Option<E>> {
        self.check(cancel)?;

        let filter = self.normalize_filter(filter);
        debug!("Finding one {} in {}", E::KIND, self.context());
        trace!("Filter: {:?}", filter);

        let mut documents = async {
            self.collection()
                .await?
                .find(&filter, FindOptions::limit(1))
                .await
        }
        .await
        .map_err(|e| self.read_error("find", e))?;

        match documents.pop() {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => {
                debug!("No {} matched in {}", E::KIND, self.context());
                Ok(None)
            }
        }
    }

    /// Every entity matching `filter` within the bound tenant.
    pub async fn find_all(&self, filter: Filter, cancel: &CancellationToken) -> StoreResult<Vec<E>> {
        self.check(cancel)?;

        let filter = self.normalize_filter(filter);
        debug!("Finding all {}s in {}", E::KIND, self.context());
        trace!("Filter: {:?}", filter);

        let documents = async {
            self.collection()
                .await?
                .find(&filter, FindOptions::default())
                .await
        }
        .await
        .map_err(|e| self.read_error("find", e))?;

        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }

    /// Look an entity up by its hex id.
    pub async fn find_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Option<E>> {
        let id: ObjectId = id
            .parse()
            .map_err(|e: ParseObjectIdError| StoreError::invalid_argument("id", e.to_string()))?;

        self.find_one(Filter::eq(ID_FIELD, id.to_string()), cancel).await
    }
}

impl<E, K: DocumentConnector> std::fmt::Debug for EntityStore<E, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("options", &self.options)
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryConnector;
    use crate::entity::Role;
    use crate::options::StoreOptions;
    use serde_json::json;

    fn store(tenant: Option<&str>) -> EntityStore<Role, InMemoryConnector> {
        let mut options = TenantStoreOptions::new(StoreOptions::new("memory://unit", "identity"));
        options.tenant_id = tenant.map(str::to_string);
        EntityStore::new(options, InMemoryConnector::new()).unwrap()
    }

    #[test]
    fn test_new_rejects_incomplete_options() {
        let options = TenantStoreOptions::new(StoreOptions::new("", "identity"));
        let result: StoreResult<EntityStore<Role, _>> =
            EntityStore::new(options, InMemoryConnector::new());
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn test_normalize_filter_adds_tenant_clause() {
        let filter = Filter::eq("name", "admin");

        assert_eq!(store(None).normalize_filter(filter.clone()), filter);
        assert_eq!(store(Some(" ")).normalize_filter(filter.clone()), filter);
        assert_eq!(
            store(Some("acme")).normalize_filter(filter.clone()),
            Filter::And(vec![filter, Filter::eq("tenantId", "acme")])
        );

        let tenant_only = store(Some("acme")).normalize_filter(Filter::All);
        assert!(tenant_only.matches(&json!({"tenantId": "acme"})));
        assert!(!tenant_only.matches(&json!({"tenantId": "other"})));
    }

    #[test]
    fn test_context_mentions_tenant_only_when_set() {
        assert_eq!(
            store(None).context(),
            "collection 'roles' of database 'identity'"
        );
        assert_eq!(
            store(Some("acme")).context(),
            "collection 'roles' of database 'identity' for tenant 'acme'"
        );
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_blocks_operations() {
        let store = store(None);
        let cancel = CancellationToken::new();

        store.dispose();
        store.dispose();
        assert!(store.is_disposed());

        let mut role = Role::new("admin");
        assert!(matches!(
            store.create(&mut role, &cancel).await,
            Err(StoreError::Disposed)
        ));
        assert!(matches!(
            store.access(&cancel, || role.name.clone()),
            Err(StoreError::Disposed)
        ));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_io() {
        let store = store(None);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut role = Role::new("admin");
        assert!(matches!(
            store.create(&mut role, &cancel).await,
            Err(StoreError::Cancelled)
        ));
        assert!(role.id.is_nil());

        let id = ObjectId::new().to_string();
        assert!(matches!(
            store.find_by_id(&id, &cancel).await,
            Err(StoreError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_an_id() {
        let store = store(None);
        let cancel = CancellationToken::new();
        let role = Role::new("never-created");

        assert!(matches!(
            store.update(&role, &cancel).await,
            Err(StoreError::InvalidArgument { .. })
        ));
        assert!(matches!(
            store.delete(&role, &cancel).await,
            Err(StoreError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_by_id_rejects_malformed_ids() {
        let store = store(None);
        let cancel = CancellationToken::new();

        let result = store.find_by_id("not-an-id", &cancel).await;
        assert!(matches!(result, Err(StoreError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_create_stamps_id_time_and_tenant() {
        let store = store(Some("acme"));
        let cancel = CancellationToken::new();
        let before = Utc::now();

        let mut role = Role::new("admin");
        let result = store.create(&mut role, &cancel).await.unwrap();

        assert!(result.succeeded());
        assert!(!role.id.is_nil());
        assert!(role.created_at >= before);
        assert_eq!(role.tenant_id.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_create_with_existing_id_reports_unknown_error() {
        let store = store(None);
        let cancel = CancellationToken::new();

        let mut first = Role::new("admin");
        store.create(&mut first, &cancel).await.unwrap();

        let mut clash = Role::new("other");
        clash.id = first.id;
        let before = clash.clone();
        let result = store.create(&mut clash, &cancel).await.unwrap();
        assert!(result.has_code(ErrorCode::UnknownError));
        assert_eq!(clash, before);
    }

    #[tokio::test]
    async fn test_update_outcomes() {
        let store = store(None);
        let cancel = CancellationToken::new();

        let mut role = Role::new("admin");
        store.create(&mut role, &cancel).await.unwrap();

        let unchanged = store.update(&role, &cancel).await.unwrap();
        assert!(unchanged.has_code(ErrorCode::RoleNotModified));

        role.normalized_name = Some("ADMIN".to_string());
        assert!(store.update(&role, &cancel).await.unwrap().succeeded());

        let mut ghost = Role::new("ghost");
        ghost.id = ObjectId::new();
        let missing = store.update(&ghost, &cancel).await.unwrap();
        assert!(missing.has_code(ErrorCode::RoleNotFound));
    }

    #[tokio::test]
    async fn test_update_keeps_bound_tenant() {
        let store = store(Some("acme"));
        let cancel = CancellationToken::new();

        let mut role = Role::new("admin");
        store.create(&mut role, &cancel).await.unwrap();

        role.tenant_id = None;
        role.normalized_name = Some("ADMIN".to_string());
        assert!(store.update(&role, &cancel).await.unwrap().succeeded());

        let stored = store.find_by_id(&role.id.to_string(), &cancel).await.unwrap().unwrap();
        assert_eq!(stored.tenant_id.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let store = store(None);
        let cancel = CancellationToken::new();

        let mut role = Role::new("admin");
        store.create(&mut role, &cancel).await.unwrap();

        assert!(store.delete(&role, &cancel).await.unwrap().succeeded());
        let again = store.delete(&role, &cancel).await.unwrap();
        assert!(again.has_code(ErrorCode::RoleNotFound));
        assert!(store.find_by_id(&role.id.to_string(), &cancel).await.unwrap().is_none());
    }
}
