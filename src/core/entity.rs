//! Entity trait - common interface for all synchronized record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityKind, StructuredId};

/// Common trait for records managed by the sync controller
///
/// A record serializes to the remote document's field payload. The document
/// key is carried alongside but never serialized into the fields, matching
/// stores where the key lives outside the document body.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The entity type this record belongs to
    const KIND: EntityKind;

    /// Validated create input, as handed over by the form layer
    type Draft: Send;

    /// Partial update restricted to mutable fields.
    ///
    /// Identifier fields are not representable here, so an edit submission
    /// can never alter `structuredId` or the document key.
    type Patch: Serialize + Clone + Send + Sync;

    /// Build a full record from validated input, a freshly allocated id and
    /// a creation timestamp. The document key is assigned separately once
    /// the remote create settles.
    fn from_draft(draft: Self::Draft, id: StructuredId, created: DateTime<Utc>) -> Self;

    /// The remote store's key for this record (empty until assigned)
    fn document_id(&self) -> &str;

    /// Record the remote store's key, on creation or on fetch
    fn set_document_id(&mut self, key: String);

    /// The human-facing structured identifier
    fn structured_id(&self) -> &StructuredId;

    /// Merge a patch into this record in place
    fn apply_patch(&mut self, patch: &Self::Patch);
}
