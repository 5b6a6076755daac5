//! In-process document store.
//!
//! This module provides a thread-safe, in-memory implementation of the
//! document-store traits using nested `HashMap`s behind a tokio `RwLock`. It
//! is used by the test suites and as the reference behavior that other
//! backends are expected to match.
//!
//! # Features
//!
//! * Named servers addressed by `memory://<server>` connection strings
//! * Databases and collections created on first insert
//! * Documents kept in insertion order
//! * `_id` uniqueness enforced per collection
//! * Replace reports matched and modified counts like a real server
//!
//! # Example Usage
//!
//! ```rust
//! use tenant_identity_store::document::{
//!     DocumentClient, DocumentCollection, DocumentConnector, DocumentDatabase, Filter,
//!     InMemoryConnector, ReplaceOptions,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = InMemoryConnector::new();
//! let roles = connector
//!     .connect("memory://local")?
//!     .database("identity")
//!     .collection("roles");
//!
//! roles.insert_one(json!({"_id": "1", "name": "admin"})).await?;
//!
//! let result = roles
//!     .replace_one(
//!         &Filter::eq("_id", "1"),
//!         json!({"_id": "1", "name": "admin"}),
//!         ReplaceOptions::default(),
//!     )
//!     .await?;
//! assert_eq!(result.matched_count, 1);
//! assert_eq!(result.modified_count, 0);
//! # Ok(())
//! # }
//! ```

use crate::document::{
    DeleteResult, DocumentClient, DocumentCollection, DocumentConnector, DocumentDatabase,
    DocumentError, Filter, FindOptions, ID_FIELD, ReplaceOptions, ReplaceResult,
};
use log::trace;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

const SCHEME: &str = "memory://";

// Structure: database -> collection -> documents (insertion order)
type ServerData = Arc<RwLock<HashMap<String, HashMap<String, Vec<Value>>>>>;

/// Connector resolving `memory://<server>` descriptors to shared in-process servers.
///
/// Clones share the same set of servers, so two stores built from clones of
/// one connector see each other's writes when they address the same server.
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    servers: Arc<Mutex<HashMap<String, ServerData>>>,
}

impl InMemoryConnector {
    /// Create a connector with no servers; servers appear on first connect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get statistics for one server, if it was ever connected to.
    pub async fn stats(&self, server: &str) -> Option<InMemoryServerStats> {
        let data = self.servers.lock().ok()?.get(server).cloned()?;
        let guard = data.read().await;

        let mut stats = InMemoryServerStats::default();
        for collections in guard.values() {
            stats.database_count += 1;
            for documents in collections.values() {
                stats.collection_count += 1;
                stats.document_count += documents.len();
            }
        }

        Some(stats)
    }
}

impl std::fmt::Debug for InMemoryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConnector").finish_non_exhaustive()
    }
}

impl DocumentConnector for InMemoryConnector {
    type Client = InMemoryClient;

    fn connect(&self, connection_string: &str) -> Result<Self::Client, DocumentError> {
        let server = connection_string
            .trim()
            .strip_prefix(SCHEME)
            .ok_or_else(|| {
                DocumentError::invalid_connection_string(
                    connection_string,
                    format!("expected a '{}' descriptor", SCHEME),
                )
            })?
            .trim_end_matches('/');

        if server.is_empty() {
            return Err(DocumentError::invalid_connection_string(
                connection_string,
                "the server name is empty",
            ));
        }

        let mut servers = self
            .servers
            .lock()
            .map_err(|_| DocumentError::driver("in-memory server registry is poisoned"))?;

        let data = servers
            .entry(server.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(HashMap::new())))
            .clone();

        trace!("Connected to in-memory server '{}'", server);

        Ok(InMemoryClient {
            server: server.to_string(),
            data,
        })
    }
}

/// Client bound to one in-memory server.
#[derive(Clone)]
pub struct InMemoryClient {
    server: String,
    data: ServerData,
}

impl InMemoryClient {
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Names of the databases holding at least one collection, sorted.
    pub async fn database_names(&self) -> Vec<String> {
        let guard = self.data.read().await;
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names
    }
}

impl DocumentClient for InMemoryClient {
    type Database = InMemoryDatabase;

    fn database(&self, name: &str) -> Self::Database {
        InMemoryDatabase {
            name: name.to_string(),
            data: self.data.clone(),
        }
    }
}

/// Database handle on an in-memory server.
#[derive(Clone)]
pub struct InMemoryDatabase {
    name: String,
    data: ServerData,
}

impl InMemoryDatabase {
    /// Names of the collections of this database, sorted.
    pub async fn collection_names(&self) -> Vec<String> {
        let guard = self.data.read().await;
        let mut names: Vec<String> = guard
            .get(&self.name)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl DocumentDatabase for InMemoryDatabase {
    type Collection = InMemoryCollection;

    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> Self::Collection {
        InMemoryCollection {
            database: self.name.clone(),
            name: name.to_string(),
            data: self.data.clone(),
        }
    }
}

/// Collection handle on an in-memory server.
#[derive(Clone)]
pub struct InMemoryCollection {
    database: String,
    name: String,
    data: ServerData,
}

impl InMemoryCollection {
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Number of documents currently stored.
    pub async fn count(&self) -> usize {
        let guard = self.data.read().await;
        guard
            .get(&self.database)
            .and_then(|collections| collections.get(&self.name))
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn document_id(document: &Value) -> Result<&Value, DocumentError> {
        if !document.is_object() {
            return Err(DocumentError::invalid_document(
                "documents must be JSON objects",
            ));
        }

        match document.get(ID_FIELD) {
            Some(Value::Null) | None => Err(DocumentError::invalid_document(format!(
                "documents must carry a non-null '{}' field",
                ID_FIELD
            ))),
            Some(id) => Ok(id),
        }
    }

    fn id_text(id: &Value) -> String {
        id.as_str()
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

impl DocumentCollection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: Value) -> Result<(), DocumentError> {
        let id = Self::document_id(&document)?.clone();

        let mut guard = self.data.write().await;
        let documents = guard
            .entry(self.database.clone())
            .or_default()
            .entry(self.name.clone())
            .or_default();

        if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(&id)) {
            return Err(DocumentError::DuplicateKey {
                collection: self.name.clone(),
                id: Self::id_text(&id),
            });
        }

        documents.push(document);
        Ok(())
    }

    async fn replace_one(
        &self,
        filter: &Filter,
        mut replacement: Value,
        options: ReplaceOptions,
    ) -> Result<ReplaceResult, DocumentError> {
        if !replacement.is_object() {
            return Err(DocumentError::invalid_document(
                "replacement documents must be JSON objects",
            ));
        }

        let mut guard = self.data.write().await;
        let position = guard
            .get(&self.database)
            .and_then(|collections| collections.get(&self.name))
            .and_then(|documents| documents.iter().position(|doc| filter.matches(doc)));

        let Some(position) = position else {
            if !options.upsert {
                return Ok(ReplaceResult::default());
            }

            let id = Self::document_id(&replacement)?.clone();
            guard
                .entry(self.database.clone())
                .or_default()
                .entry(self.name.clone())
                .or_default()
                .push(replacement);
            return Ok(ReplaceResult {
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(id),
            });
        };

        let Some(documents) = guard
            .get_mut(&self.database)
            .and_then(|collections| collections.get_mut(&self.name))
        else {
            return Ok(ReplaceResult::default());
        };

        let existing = &mut documents[position];
        let existing_id = existing.get(ID_FIELD).cloned().unwrap_or(Value::Null);

        match replacement.get(ID_FIELD) {
            None | Some(Value::Null) => {
                if let Some(object) = replacement.as_object_mut() {
                    object.insert(ID_FIELD.to_string(), existing_id);
                }
            }
            Some(id) if *id != existing_id => {
                return Err(DocumentError::invalid_document(format!(
                    "the '{}' field is immutable",
                    ID_FIELD
                )));
            }
            Some(_) => {}
        }

        let modified = *existing != replacement;
        if modified {
            *existing = replacement;
        }

        Ok(ReplaceResult {
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
        })
    }

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, DocumentError> {
        let mut guard = self.data.write().await;

        let Some(documents) = guard
            .get_mut(&self.database)
            .and_then(|collections| collections.get_mut(&self.name))
        else {
            return Ok(DeleteResult::default());
        };

        match documents.iter().position(|doc| filter.matches(doc)) {
            Some(position) => {
                documents.remove(position);
                Ok(DeleteResult { deleted_count: 1 })
            }
            None => Ok(DeleteResult::default()),
        }
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> Result<Vec<Value>, DocumentError> {
        let guard = self.data.read().await;

        let Some(documents) = guard
            .get(&self.database)
            .and_then(|collections| collections.get(&self.name))
        else {
            return Ok(Vec::new());
        };

        let limit = options.limit.unwrap_or(usize::MAX);
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Statistics about one in-memory server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryServerStats {
    /// Number of databases with at least one collection
    pub database_count: usize,
    /// Number of collections across all databases
    pub collection_count: usize,
    /// Total number of stored documents
    pub document_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(connector: &InMemoryConnector, name: &str) -> InMemoryCollection {
        connector
            .connect("memory://test")
            .unwrap()
            .database("identity")
            .collection(name)
    }

    #[test]
    fn test_connect_rejects_foreign_descriptors() {
        let connector = InMemoryConnector::new();
        assert!(connector.connect("mongodb://localhost:27017").is_err());
        assert!(connector.connect("memory://").is_err());
        assert!(connector.connect("memory://local/").is_ok());
    }

    #[tokio::test]
    async fn test_insert_and_find_in_order() {
        let connector = InMemoryConnector::new();
        let users = collection(&connector, "users");

        for i in 1..=3 {
            users
                .insert_one(json!({"_id": i.to_string(), "name": format!("user{}", i)}))
                .await
                .unwrap();
        }

        let all = users.find(&Filter::All, FindOptions::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0]["name"], "user1");
        assert_eq!(all[2]["name"], "user3");

        let first = users.find(&Filter::All, FindOptions::limit(1)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0]["name"], "user1");
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_and_missing_ids() {
        let connector = InMemoryConnector::new();
        let users = collection(&connector, "users");

        users.insert_one(json!({"_id": "1"})).await.unwrap();
        let duplicate = users.insert_one(json!({"_id": "1"})).await;
        assert!(matches!(duplicate, Err(DocumentError::DuplicateKey { .. })));

        let missing = users.insert_one(json!({"name": "x"})).await;
        assert!(matches!(missing, Err(DocumentError::InvalidDocument { .. })));
    }

    #[tokio::test]
    async fn test_replace_reports_matched_and_modified() {
        let connector = InMemoryConnector::new();
        let users = collection(&connector, "users");
        users.insert_one(json!({"_id": "1", "name": "a"})).await.unwrap();

        let by_id = Filter::eq("_id", "1");

        let unchanged = users
            .replace_one(&by_id, json!({"_id": "1", "name": "a"}), ReplaceOptions::default())
            .await
            .unwrap();
        assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));

        let changed = users
            .replace_one(&by_id, json!({"name": "b"}), ReplaceOptions::default())
            .await
            .unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let stored = users.find(&by_id, FindOptions::default()).await.unwrap();
        assert_eq!(stored[0], json!({"_id": "1", "name": "b"}));

        let missing = users
            .replace_one(&Filter::eq("_id", "2"), json!({"_id": "2"}), ReplaceOptions::default())
            .await
            .unwrap();
        assert_eq!(missing, ReplaceResult::default());
    }

    #[tokio::test]
    async fn test_replace_upsert_and_immutable_id() {
        let connector = InMemoryConnector::new();
        let users = collection(&connector, "users");

        let upserted = users
            .replace_one(
                &Filter::eq("_id", "9"),
                json!({"_id": "9"}),
                ReplaceOptions { upsert: true },
            )
            .await
            .unwrap();
        assert_eq!(upserted.upserted_id, Some(json!("9")));
        assert_eq!(users.count().await, 1);

        let changed_id = users
            .replace_one(&Filter::eq("_id", "9"), json!({"_id": "10"}), ReplaceOptions::default())
            .await;
        assert!(changed_id.is_err());
    }

    #[tokio::test]
    async fn test_delete_one() {
        let connector = InMemoryConnector::new();
        let users = collection(&connector, "users");
        users.insert_one(json!({"_id": "1"})).await.unwrap();

        let deleted = users.delete_one(&Filter::eq("_id", "1")).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);

        let again = users.delete_one(&Filter::eq("_id", "1")).await.unwrap();
        assert_eq!(again.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_servers_databases_and_collections_are_isolated() {
        let connector = InMemoryConnector::new();
        let a = connector.connect("memory://a").unwrap();
        let b = connector.connect("memory://b").unwrap();

        a.database("one").collection("users").insert_one(json!({"_id": "1"})).await.unwrap();

        let same_server_other_db = a.database("two").collection("users");
        let other_server = b.database("one").collection("users");
        assert_eq!(same_server_other_db.count().await, 0);
        assert_eq!(other_server.count().await, 0);

        assert_eq!(a.database_names().await, vec!["one".to_string()]);
        assert!(b.database_names().await.is_empty());

        let stats = connector.stats("a").await.unwrap();
        assert_eq!(stats.document_count, 1);
        assert!(connector.stats("missing").await.is_none());
    }
}
