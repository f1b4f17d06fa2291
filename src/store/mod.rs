//! Remote document store interface
//!
//! The dashboard persists to a managed document database reached over the
//! network. This module defines the narrow surface the sync engine consumes:
//! per-document CRUD plus an ordered list query, all asynchronous and all
//! fallible with transport/permission errors. No multi-document transactions
//! are assumed.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;

/// Handle to one remote document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Collection the document lives in
    pub collection: String,
    /// The store's native key for the document
    pub key: String,
}

impl DocumentRef {
    /// Build a reference from a collection name and document key
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

/// Errors surfaced by a remote store adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("document already exists: {collection}/{key}")]
    AlreadyExists { collection: String, key: String },

    #[error("document not found: {collection}/{key}")]
    NotFound { collection: String, key: String },
}

/// Asynchronous document store with per-document atomic writes
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create a document. With `key` set the document is stored under that
    /// explicit key; otherwise the store assigns one. Returns a reference to
    /// the created document.
    async fn create_document(
        &self,
        collection: &str,
        key: Option<&str>,
        fields: Value,
    ) -> Result<DocumentRef, StoreError>;

    /// Partially update a document: only the supplied fields are overwritten
    async fn update_document(&self, doc: &DocumentRef, fields: Value) -> Result<(), StoreError>;

    /// Delete a document
    async fn delete_document(&self, doc: &DocumentRef) -> Result<(), StoreError>;

    /// Fetch every document in a collection, ordered by the given fields
    async fn list_documents(
        &self,
        collection: &str,
        order_by: &[&str],
    ) -> Result<Vec<(DocumentRef, Value)>, StoreError>;
}
