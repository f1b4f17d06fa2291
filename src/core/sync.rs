//! Sync controller
//!
//! Mediates every create/update/delete between validated UI input and the
//! remote store, keeping the local cache consistent with the outcome. The
//! cache is mutated only after the remote call settles successfully, so the
//! UI never sees unconfirmed state as durable. Remote failures leave the
//! cache untouched and surface as typed errors; no operation retries on its
//! own, and a later `refresh` always re-establishes a consistent cache and
//! allocator.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::allocator::IdAllocator;
use crate::core::cache::EntityCache;
use crate::core::entity::Entity;
use crate::core::identity::KeyStrategy;
use crate::store::{DocumentRef, RemoteStore, StoreError};

/// Errors surfaced to the UI layer by sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote read failed: {0}")]
    RemoteReadFailed(#[source] StoreError),

    #[error("remote write failed: {0}")]
    RemoteWriteFailed(#[source] StoreError),

    #[error("no cached entity with document key '{key}'")]
    NotFound { key: String },

    #[error("failed to encode entity fields: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Cache mutation awaiting the outcome of a remote write.
///
/// The mutation is described before the remote call is issued and committed
/// only when that call succeeds; on failure the op is dropped and the cache
/// is untouched. Pending -> applied or discarded, nothing in between.
enum PendingOp<E: Entity> {
    Append(E),
    Merge { key: String, patch: E::Patch },
    Remove { key: String },
}

impl<E: Entity> PendingOp<E> {
    fn commit(self, cache: &mut EntityCache<E>) {
        match self {
            PendingOp::Append(entity) => cache.push(entity),
            PendingOp::Merge { key, patch } => {
                cache.merge(&key, &patch);
            }
            PendingOp::Remove { key } => {
                cache.remove(&key);
            }
        }
    }
}

/// Per-session, per-entity-type orchestrator of the optimistic sync protocol
///
/// Owns the store handle, the local cache and the id allocator for one
/// entity type. Operations are expected to be awaited one at a time; the
/// controller provides no cross-session coordination.
pub struct SyncController<E: Entity, S: RemoteStore> {
    store: S,
    cache: EntityCache<E>,
    allocator: IdAllocator,
}

impl<E: Entity, S: RemoteStore> SyncController<E, S> {
    /// Create a controller with an empty cache. Call [`refresh`] before the
    /// first create so the allocator is seeded from remote state.
    ///
    /// [`refresh`]: SyncController::refresh
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: EntityCache::new(),
            allocator: IdAllocator::new(E::KIND),
        }
    }

    /// Read access to the local cache
    pub fn cache(&self) -> &EntityCache<E> {
        &self.cache
    }

    /// The underlying store adapter
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the full ordered set from the remote store, replace the cache
    /// wholesale and re-seed the allocator from what was actually fetched.
    ///
    /// Documents whose fields fail to deserialize are skipped with a
    /// warning rather than failing the whole refresh. This is the only
    /// operation that corrects allocator drift after a failed or external
    /// write.
    pub async fn refresh(&mut self) -> Result<&[E], SyncError> {
        let docs = self
            .store
            .list_documents(E::KIND.collection(), E::KIND.order_by())
            .await
            .map_err(SyncError::RemoteReadFailed)?;

        let mut records = Vec::with_capacity(docs.len());
        for (doc, fields) in docs {
            match serde_json::from_value::<E>(fields) {
                Ok(mut entity) => {
                    entity.set_document_id(doc.key);
                    records.push(entity);
                }
                Err(err) => {
                    warn!(
                        collection = E::KIND.collection(),
                        key = %doc.key,
                        %err,
                        "skipping malformed document"
                    );
                }
            }
        }

        self.allocator
            .initialize(records.iter().map(|e| e.structured_id().to_string()));
        self.cache.replace_all(records);

        debug!(
            collection = E::KIND.collection(),
            count = self.cache.len(),
            "cache refreshed"
        );
        Ok(self.cache.items())
    }

    /// Create a record from validated input.
    ///
    /// Allocates the next structured id, stamps the creation time and writes
    /// the document remotely - under the structured id itself when the entity
    /// type derives its key from it, under a store-assigned key otherwise.
    /// The cache gains the entry only after the write succeeds. On failure
    /// the allocator's counter is deliberately not rolled back: ids must be
    /// unique and increasing, not contiguous, and skipping the failed number
    /// avoids handing it out twice.
    pub async fn create(&mut self, draft: E::Draft) -> Result<E, SyncError> {
        let id = self.allocator.next();
        let mut entity = E::from_draft(draft, id, Utc::now());
        let fields = serde_json::to_value(&entity)?;

        let explicit_key = match E::KIND.key_strategy() {
            KeyStrategy::DerivedFromStructuredId => Some(id.to_string()),
            KeyStrategy::StoreAssigned => None,
        };

        let doc = self
            .store
            .create_document(E::KIND.collection(), explicit_key.as_deref(), fields)
            .await
            .map_err(SyncError::RemoteWriteFailed)?;

        entity.set_document_id(doc.key);
        debug!(collection = E::KIND.collection(), id = %id, key = %entity.document_id(), "created");

        PendingOp::Append(entity.clone()).commit(&mut self.cache);
        Ok(entity)
    }

    /// Apply a partial update to the record with the given document key.
    ///
    /// The patch type only carries mutable fields, so identifier fields can
    /// never change through an edit. On success the cache entry is merged in
    /// place, preserving its position.
    pub async fn update(&mut self, document_id: &str, patch: E::Patch) -> Result<(), SyncError> {
        if !self.cache.contains(document_id) {
            warn!(
                collection = E::KIND.collection(),
                key = document_id,
                "update for unknown document key"
            );
            return Err(SyncError::NotFound {
                key: document_id.to_string(),
            });
        }

        let fields = serde_json::to_value(&patch)?;
        let pending = PendingOp::Merge {
            key: document_id.to_string(),
            patch,
        };

        self.store
            .update_document(&DocumentRef::new(E::KIND.collection(), document_id), fields)
            .await
            .map_err(SyncError::RemoteWriteFailed)?;

        debug!(collection = E::KIND.collection(), key = document_id, "updated");
        pending.commit(&mut self.cache);
        Ok(())
    }

    /// Delete the record with the given document key.
    ///
    /// User confirmation is the caller's responsibility; the controller
    /// deletes unconditionally. On success the cache entry is removed, on
    /// failure it is retained.
    pub async fn delete(&mut self, document_id: &str) -> Result<(), SyncError> {
        if !self.cache.contains(document_id) {
            warn!(
                collection = E::KIND.collection(),
                key = document_id,
                "delete for unknown document key"
            );
            return Err(SyncError::NotFound {
                key: document_id.to_string(),
            });
        }

        let pending: PendingOp<E> = PendingOp::Remove {
            key: document_id.to_string(),
        };

        self.store
            .delete_document(&DocumentRef::new(E::KIND.collection(), document_id))
            .await
            .map_err(SyncError::RemoteWriteFailed)?;

        debug!(collection = E::KIND.collection(), key = document_id, "deleted");
        pending.commit(&mut self.cache);
        Ok(())
    }
}
