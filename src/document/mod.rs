//! Document-store abstraction consumed by the identity stores.
//!
//! The stores never talk to a database driver directly. They go through four
//! small traits that mirror how a document database is addressed:
//!
//! * [`DocumentConnector`] turns a connection descriptor into a client
//! * [`DocumentClient`] hands out databases by name
//! * [`DocumentDatabase`] hands out collections by name
//! * [`DocumentCollection`] stores and queries JSON documents
//!
//! Documents are `serde_json::Value` objects keyed by an `_id` field. Queries
//! are expressed as [`Filter`] values so the tenant narrowing can be composed
//! before a backend ever sees them.
//!
//! # Example Usage
//!
//! ```rust
//! use tenant_identity_store::document::{
//!     DocumentClient, DocumentCollection, DocumentConnector, DocumentDatabase, Filter,
//!     FindOptions, InMemoryConnector,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = InMemoryConnector::new();
//! let client = connector.connect("memory://local")?;
//! let users = client.database("identity").collection("users");
//!
//! users.insert_one(json!({"_id": "1", "name": "alice"})).await?;
//!
//! let found = users
//!     .find(&Filter::eq("name", "alice"), FindOptions::default())
//!     .await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod filter;
pub mod in_memory;
pub mod object_id;

pub use errors::DocumentError;
pub use filter::Filter;
pub use in_memory::{
    InMemoryClient, InMemoryCollection, InMemoryConnector, InMemoryDatabase, InMemoryServerStats,
};
pub use object_id::{ObjectId, ParseObjectIdError};

use serde_json::Value;
use std::future::Future;

/// Name of the identifier field of every stored document.
pub const ID_FIELD: &str = "_id";

/// Creates clients from connection descriptors.
pub trait DocumentConnector: Clone + Send + Sync + 'static {
    type Client: DocumentClient;

    /// Open a client for the given connection descriptor.
    ///
    /// Implementations may pool or share the underlying transport; the
    /// returned client is expected to be cheap to clone and safe to use
    /// concurrently.
    fn connect(&self, connection_string: &str) -> Result<Self::Client, DocumentError>;
}

/// A connected client.
pub trait DocumentClient: Clone + Send + Sync + 'static {
    type Database: DocumentDatabase;

    fn database(&self, name: &str) -> Self::Database;
}

/// A named database reachable through a client.
pub trait DocumentDatabase: Send + Sync + 'static {
    type Collection: DocumentCollection;

    fn name(&self) -> &str;

    fn collection(&self, name: &str) -> Self::Collection;
}

/// A collection of JSON documents.
///
/// All operations are async and must be safe to call concurrently from
/// multiple stores sharing the same handle.
pub trait DocumentCollection: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Insert one document. Fails with [`DocumentError::DuplicateKey`] when
    /// a document with the same `_id` exists.
    fn insert_one(&self, document: Value)
    -> impl Future<Output = Result<(), DocumentError>> + Send;

    /// Replace the first document matching `filter`.
    fn replace_one(
        &self,
        filter: &Filter,
        replacement: Value,
        options: ReplaceOptions,
    ) -> impl Future<Output = Result<ReplaceResult, DocumentError>> + Send;

    /// Delete the first document matching `filter`.
    fn delete_one(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<DeleteResult, DocumentError>> + Send;

    /// Find the documents matching `filter`, in storage order.
    fn find(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> impl Future<Output = Result<Vec<Value>, DocumentError>> + Send;
}

/// The collection type reached from a connector.
pub type CollectionOf<K> = <<<K as DocumentConnector>::Client as DocumentClient>::Database as DocumentDatabase>::Collection;

/// Options of a find operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// Options of a replace operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Insert the replacement when nothing matches.
    pub upsert: bool,
}

/// Outcome of a replace operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaceResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
}

/// Outcome of a delete operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}
