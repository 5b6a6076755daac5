//! Common test utilities for the identity store integration tests.
//!
//! Provides provider builders for each multi-tenancy handling mode, user and
//! role fixtures, raw access to the in-memory backend, and a connector whose
//! every operation fails.

#![allow(dead_code)]

use serde_json::Value;
use tenant_identity_store::document::{
    DeleteResult, DocumentClient, DocumentCollection, DocumentConnector, DocumentDatabase,
    DocumentError, Filter, FindOptions, InMemoryCollection, InMemoryConnector, ReplaceOptions,
    ReplaceResult,
};
use tenant_identity_store::{
    MultiTenancyHandling, MultiTenancyOptions, Role, RoleStoreProvider, StoreOptions,
    StoreProviderOptions, User, UserStoreProvider,
};

pub const SERVER: &str = "memory://identity-tests";
pub const DATABASE: &str = "identity";

/// Install a test logger once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn store_options() -> StoreOptions {
    StoreOptions::new(SERVER, DATABASE)
}

pub fn provider_options(handling: Option<MultiTenancyHandling>) -> StoreProviderOptions {
    let mut options = StoreProviderOptions::new(store_options());
    options.multi_tenancy = handling.map(MultiTenancyOptions::new);
    options
}

pub fn user_provider(
    connector: &InMemoryConnector,
    handling: MultiTenancyHandling,
) -> UserStoreProvider<InMemoryConnector> {
    UserStoreProvider::new(provider_options(Some(handling)), connector.clone())
        .expect("valid provider options")
}

pub fn role_provider(
    connector: &InMemoryConnector,
    handling: MultiTenancyHandling,
) -> RoleStoreProvider<InMemoryConnector> {
    RoleStoreProvider::new(provider_options(Some(handling)), connector.clone())
        .expect("valid provider options")
}

/// A user with its name and e-mail already normalized.
pub fn test_user(name: &str, email: &str) -> User {
    let mut user = User::new(name);
    user.normalized_name = Some(name.to_uppercase());
    user.email = Some(email.to_string());
    user.normalized_email = Some(email.to_uppercase());
    user
}

pub fn test_role(name: &str) -> Role {
    let mut role = Role::new(name);
    role.normalized_name = Some(name.to_uppercase());
    role
}

/// Raw handle on a collection of the shared test server.
pub fn raw_collection(
    connector: &InMemoryConnector,
    database: &str,
    collection: &str,
) -> InMemoryCollection {
    connector
        .connect(SERVER)
        .expect("in-memory server")
        .database(database)
        .collection(collection)
}

/// Every document of a collection, in storage order.
pub async fn raw_documents(
    connector: &InMemoryConnector,
    database: &str,
    collection: &str,
) -> Vec<Value> {
    raw_collection(connector, database, collection)
        .find(&Filter::All, FindOptions::default())
        .await
        .expect("in-memory find")
}

/// Connector whose collections fail every operation.
#[derive(Debug, Clone, Default)]
pub struct FailingConnector;

#[derive(Debug, Clone)]
pub struct FailingClient;

#[derive(Debug)]
pub struct FailingDatabase(String);

#[derive(Debug)]
pub struct FailingCollection(String);

fn unavailable() -> DocumentError {
    DocumentError::driver("server selection timed out")
}

impl DocumentConnector for FailingConnector {
    type Client = FailingClient;

    fn connect(&self, _connection_string: &str) -> Result<FailingClient, DocumentError> {
        Ok(FailingClient)
    }
}

impl DocumentClient for FailingClient {
    type Database = FailingDatabase;

    fn database(&self, name: &str) -> FailingDatabase {
        FailingDatabase(name.to_string())
    }
}

impl DocumentDatabase for FailingDatabase {
    type Collection = FailingCollection;

    fn name(&self) -> &str {
        &self.0
    }

    fn collection(&self, name: &str) -> FailingCollection {
        FailingCollection(name.to_string())
    }
}

impl DocumentCollection for FailingCollection {
    fn name(&self) -> &str {
        &self.0
    }

    async fn insert_one(&self, _document: Value) -> Result<(), DocumentError> {
        Err(unavailable())
    }

    async fn replace_one(
        &self,
        _filter: &Filter,
        _replacement: Value,
        _options: ReplaceOptions,
    ) -> Result<ReplaceResult, DocumentError> {
        Err(unavailable())
    }

    async fn delete_one(&self, _filter: &Filter) -> Result<DeleteResult, DocumentError> {
        Err(unavailable())
    }

    async fn find(
        &self,
        _filter: &Filter,
        _options: FindOptions,
    ) -> Result<Vec<Value>, DocumentError> {
        Err(unavailable())
    }
}

/// Connector whose deletes report two removed documents, as a store holding
/// duplicated ids would. Every other operation fails.
#[derive(Debug, Clone, Default)]
pub struct OverDeletingConnector;

#[derive(Debug, Clone)]
pub struct OverDeletingClient;

#[derive(Debug)]
pub struct OverDeletingDatabase(String);

#[derive(Debug)]
pub struct OverDeletingCollection(String);

impl DocumentConnector for OverDeletingConnector {
    type Client = OverDeletingClient;

    fn connect(&self, _connection_string: &str) -> Result<OverDeletingClient, DocumentError> {
        Ok(OverDeletingClient)
    }
}

impl DocumentClient for OverDeletingClient {
    type Database = OverDeletingDatabase;

    fn database(&self, name: &str) -> OverDeletingDatabase {
        OverDeletingDatabase(name.to_string())
    }
}

impl DocumentDatabase for OverDeletingDatabase {
    type Collection = OverDeletingCollection;

    fn name(&self) -> &str {
        &self.0
    }

    fn collection(&self, name: &str) -> OverDeletingCollection {
        OverDeletingCollection(name.to_string())
    }
}

impl DocumentCollection for OverDeletingCollection {
    fn name(&self) -> &str {
        &self.0
    }

    async fn insert_one(&self, _document: Value) -> Result<(), DocumentError> {
        Err(unavailable())
    }

    async fn replace_one(
        &self,
        _filter: &Filter,
        _replacement: Value,
        _options: ReplaceOptions,
    ) -> Result<ReplaceResult, DocumentError> {
        Err(unavailable())
    }

    async fn delete_one(&self, _filter: &Filter) -> Result<DeleteResult, DocumentError> {
        Ok(DeleteResult { deleted_count: 2 })
    }

    async fn find(
        &self,
        _filter: &Filter,
        _options: FindOptions,
    ) -> Result<Vec<Value>, DocumentError> {
        Err(unavailable())
    }
}
