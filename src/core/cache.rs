//! Local entity cache
//!
//! An ordered in-memory mirror of one entity type for a single session,
//! keyed by document id. Advisory only: the remote store stays the source of
//! truth, and the cache is rebuilt from it on every session start and on
//! explicit refresh. Only the sync controller writes to it.

use crate::core::entity::Entity;

/// Ordered collection of records keyed by document id
#[derive(Debug, Clone)]
pub struct EntityCache<E: Entity> {
    items: Vec<E>,
}

impl<E: Entity> EntityCache<E> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records in display order
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Iterate over records in display order
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.items.iter()
    }

    /// Look up a record by document id
    pub fn get(&self, document_id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.document_id() == document_id)
    }

    /// Check whether a document id is cached
    pub fn contains(&self, document_id: &str) -> bool {
        self.get(document_id).is_some()
    }

    /// Replace the whole cache with a freshly fetched, already ordered set
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
    }

    /// Append a newly created record, keeping prior entries in place
    pub fn push(&mut self, item: E) {
        self.items.push(item);
    }

    /// Merge a patch into the record with the given document id, preserving
    /// its position. Returns false if no such record is cached.
    pub fn merge(&mut self, document_id: &str, patch: &E::Patch) -> bool {
        match self
            .items
            .iter_mut()
            .find(|e| e.document_id() == document_id)
        {
            Some(entry) => {
                entry.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given document id, returning it
    pub fn remove(&mut self, document_id: &str) -> Option<E> {
        let pos = self
            .items
            .iter()
            .position(|e| e.document_id() == document_id)?;
        Some(self.items.remove(pos))
    }
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::{Client, ClientDraft, ClientPatch};
    use crate::core::identity::{EntityKind, StructuredId};
    use chrono::Utc;

    fn client(seq: u32, nom: &str) -> Client {
        let mut c = Client::from_draft(
            ClientDraft {
                prenom: "Awa".to_string(),
                nom: nom.to_string(),
                telephone: "70123456".to_string(),
            },
            StructuredId::from_parts(EntityKind::Client, 25, seq),
            Utc::now(),
        );
        c.set_document_id(format!("CL-25-{:02}", seq));
        c
    }

    #[test]
    fn test_push_and_get() {
        let mut cache = EntityCache::new();
        cache.push(client(1, "Traoré"));
        cache.push(client(2, "Ouédraogo"));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("CL-25-01"));
        assert_eq!(cache.get("CL-25-02").unwrap().nom, "Ouédraogo");
        assert!(cache.get("CL-25-99").is_none());
    }

    #[test]
    fn test_replace_all() {
        let mut cache = EntityCache::new();
        cache.push(client(1, "Traoré"));

        cache.replace_all(vec![client(5, "Kaboré"), client(6, "Sawadogo")]);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("CL-25-01"));
        assert_eq!(cache.items()[0].nom, "Kaboré");
    }

    #[test]
    fn test_merge_preserves_position() {
        let mut cache = EntityCache::new();
        cache.push(client(1, "Traoré"));
        cache.push(client(2, "Ouédraogo"));
        cache.push(client(3, "Kaboré"));

        let patch = ClientPatch {
            telephone: Some("71112233".to_string()),
            ..ClientPatch::default()
        };
        assert!(cache.merge("CL-25-02", &patch));

        let entry = &cache.items()[1];
        assert_eq!(entry.document_id(), "CL-25-02");
        assert_eq!(entry.telephone, "71112233");
        assert_eq!(entry.nom, "Ouédraogo");
    }

    #[test]
    fn test_merge_missing_key() {
        let mut cache: EntityCache<Client> = EntityCache::new();
        assert!(!cache.merge("CL-25-01", &ClientPatch::default()));
    }

    #[test]
    fn test_remove() {
        let mut cache = EntityCache::new();
        cache.push(client(1, "Traoré"));
        cache.push(client(2, "Ouédraogo"));

        let removed = cache.remove("CL-25-01").unwrap();
        assert_eq!(removed.nom, "Traoré");
        assert_eq!(cache.len(), 1);
        assert!(cache.remove("CL-25-01").is_none());
    }
}
