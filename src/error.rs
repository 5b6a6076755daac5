//! Error types for identity store operations.
//!
//! Two families of failure are kept apart:
//!
//! * [`IdentityResult`] carries business outcomes of writes (an entity that
//!   does not exist for the bound tenant, an update that changed nothing, a
//!   storage failure while persisting). These are values, never `Err`.
//! * [`StoreError`] carries everything that prevents an operation from being
//!   attempted at all: a disposed store, a cancelled request, bad input, bad
//!   configuration, or a read that the backend could not serve.

use crate::document::DocumentError;
use std::fmt;

/// Stable identifiers of the failures reported through [`IdentityResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The storage system failed while serving the request.
    UnknownError,
    /// No user with the given id is visible to the bound tenant.
    UserNotFound,
    /// The user update matched a document but changed nothing.
    UserNotModified,
    /// No role with the given id is visible to the bound tenant.
    RoleNotFound,
    /// The role update matched a document but changed nothing.
    RoleNotModified,
}

impl ErrorCode {
    /// The wire form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "MONGO-0100",
            ErrorCode::UserNotFound => "MONGO-0301",
            ErrorCode::UserNotModified => "MONGO-0302",
            ErrorCode::RoleNotFound => "MONGO-0401",
            ErrorCode::RoleNotModified => "MONGO-0402",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure reported by a store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    pub code: ErrorCode,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// Outcome of a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityResult {
    Success,
    Failed(Vec<IdentityError>),
}

impl IdentityResult {
    /// A failed result carrying a single error.
    pub fn failed(code: ErrorCode, description: impl Into<String>) -> Self {
        IdentityResult::Failed(vec![IdentityError::new(code, description)])
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, IdentityResult::Success)
    }

    /// The reported errors; empty on success.
    pub fn errors(&self) -> &[IdentityError] {
        match self {
            IdentityResult::Success => &[],
            IdentityResult::Failed(errors) => errors,
        }
    }

    /// Whether one of the reported errors carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors().iter().any(|e| e.code == code)
    }
}

impl fmt::Display for IdentityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityResult::Success => f.write_str("Succeeded"),
            IdentityResult::Failed(errors) => {
                f.write_str("Failed: ")?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", error.code)?;
                }
                Ok(())
            }
        }
    }
}

/// Errors that stop a store operation before or during I/O.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was disposed
    #[error("The store has been disposed")]
    Disposed,

    /// The caller cancelled the operation before it started
    #[error("The operation was cancelled")]
    Cancelled,

    /// Invalid input rejected before touching storage
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Invalid or incomplete store options
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Tenant-scoped options could not be derived
    #[error("Multi-tenancy error: {0}")]
    Tenancy(#[from] TenancyError),

    /// The backend failed while serving a read
    #[error("Storage error during {operation} on {context}: {source}")]
    Storage {
        operation: String,
        context: String,
        #[source]
        source: DocumentError,
    },

    /// A stored document could not be mapped to or from an entity
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    pub fn storage(
        operation: impl Into<String>,
        context: impl Into<String>,
        source: DocumentError,
    ) -> Self {
        Self::Storage {
            operation: operation.into(),
            context: context.into(),
            source,
        }
    }
}

/// Errors in the static store configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("The connection string is required")]
    MissingConnectionString,

    #[error("The database name is required")]
    MissingDatabaseName,

    #[error("The {kind} collection name is required")]
    MissingCollectionName { kind: String },

    /// The requested configuration section does not exist or is not an object
    #[error("Configuration section '{path}' is missing or is not an object")]
    InvalidSection { path: String },

    #[error("Could not bind the configuration: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Errors while deriving tenant-scoped options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenancyError {
    /// A tenant was requested but no multi-tenancy handling is configured
    #[error("Multi-tenancy is not configured for this provider")]
    NotConfigured,

    /// The handling mode requires a tenant id and none was given
    #[error("A tenant id is required by the {handling} handling")]
    MissingTenant { handling: String },

    /// A name template would map every tenant onto the same name
    #[error("The {kind} format '{template}' does not contain the {{tenant}} placeholder")]
    MissingTenantPlaceholder { kind: String, template: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
