//! Errors raised at the document-store boundary.
//!
//! These describe failures of the backend itself (connection, driver,
//! serialization) and carry no identity semantics. Entity stores never let
//! them escape unwrapped.

use thiserror::Error;

/// Errors that can occur while talking to a document store.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The connection descriptor could not be interpreted by the backend.
    #[error("Invalid connection string '{connection_string}': {message}")]
    InvalidConnectionString {
        connection_string: String,
        message: String,
    },

    /// A document with the same `_id` already exists in the collection.
    #[error("Duplicate key '{id}' in collection '{collection}'")]
    DuplicateKey { collection: String, id: String },

    /// The document does not have the shape the backend requires.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// Encoding or decoding a document failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("Document driver error: {message}")]
    Driver {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DocumentError {
    pub fn invalid_connection_string(
        connection_string: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidConnectionString {
            connection_string: connection_string.into(),
            message: message.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
            source: None,
        }
    }
}
