//! In-memory remote store
//!
//! Backs tests and offline sessions with the same contract as the real
//! document database: explicit or store-assigned keys, partial-update merge
//! semantics, ordered list queries, and injectable read/write failures to
//! exercise the sync controller's error paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use ulid::Ulid;

use crate::store::{DocumentRef, RemoteStore, StoreError};

/// In-memory document store with failure injection
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a transport error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail with a transport error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Insert a document directly, bypassing failure injection. Used to seed
    /// pre-existing remote state.
    pub fn seed(&self, collection: &str, key: &str, fields: Value) {
        let mut collections = self.collections.lock().expect("store mutex poisoned");
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), fields);
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        let collections = self.collections.lock().expect("store mutex poisoned");
        collections.get(collection).map_or(0, |c| c.len())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Transport("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::Transport("injected read failure".to_string()))
        } else {
            Ok(())
        }
    }

    /// Extract an order-by field as a comparable string
    fn sort_key(fields: &Value, order_by: &[&str]) -> Vec<String> {
        order_by
            .iter()
            .map(|field| match fields.get(field) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            })
            .collect()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn create_document(
        &self,
        collection: &str,
        key: Option<&str>,
        fields: Value,
    ) -> Result<DocumentRef, StoreError> {
        self.check_write()?;

        let key = match key {
            Some(k) => k.to_string(),
            None => Ulid::new().to_string(),
        };

        let mut collections = self.collections.lock().expect("store mutex poisoned");
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                key,
            });
        }
        docs.insert(key.clone(), fields);

        Ok(DocumentRef::new(collection, key))
    }

    async fn update_document(&self, doc: &DocumentRef, fields: Value) -> Result<(), StoreError> {
        self.check_write()?;

        let mut collections = self.collections.lock().expect("store mutex poisoned");
        let entry = collections
            .get_mut(&doc.collection)
            .and_then(|docs| docs.get_mut(&doc.key))
            .ok_or_else(|| StoreError::NotFound {
                collection: doc.collection.clone(),
                key: doc.key.clone(),
            })?;

        // Partial update: only supplied fields are overwritten.
        match (entry, fields) {
            (Value::Object(existing), Value::Object(patch)) => {
                for (k, v) in patch {
                    existing.insert(k, v);
                }
            }
            (entry, fields) => *entry = fields,
        }

        Ok(())
    }

    async fn delete_document(&self, doc: &DocumentRef) -> Result<(), StoreError> {
        self.check_write()?;

        let mut collections = self.collections.lock().expect("store mutex poisoned");
        let removed = collections
            .get_mut(&doc.collection)
            .and_then(|docs| docs.remove(&doc.key));

        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                collection: doc.collection.clone(),
                key: doc.key.clone(),
            }),
        }
    }

    async fn list_documents(
        &self,
        collection: &str,
        order_by: &[&str],
    ) -> Result<Vec<(DocumentRef, Value)>, StoreError> {
        self.check_read()?;

        let collections = self.collections.lock().expect("store mutex poisoned");
        let mut docs: Vec<(DocumentRef, Value)> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|(key, fields)| (DocumentRef::new(collection, key.clone()), fields.clone()))
            .collect();

        docs.sort_by(|(ra, a), (rb, b)| {
            Self::sort_key(a, order_by)
                .cmp(&Self::sort_key(b, order_by))
                .then_with(|| ra.key.cmp(&rb.key))
        });

        Ok(docs)
    }
}
