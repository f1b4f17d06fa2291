//! Session-local structured id allocator
//!
//! One allocator instance per entity type per session, owned by the sync
//! controller and seeded from the remote store's fetched state. Allocation is
//! a pure in-memory counter: it is only as fresh as the last `initialize`.
//! Two independent sessions allocating from stale snapshots can race to the
//! same id; the caller must refresh immediately before creating.

use chrono::{Datelike, Utc};

use crate::core::identity::{EntityKind, StructuredId};

/// Two-digit year of the current date, the active year scope.
fn current_year_scope() -> u8 {
    (Utc::now().year().rem_euclid(100)) as u8
}

/// Monotonic per-type id allocator scoped to a two-digit year
#[derive(Debug, Clone)]
pub struct IdAllocator {
    kind: EntityKind,
    last_seq: u32,
    year_scope: u8,
}

impl IdAllocator {
    /// Create an allocator starting at sequence 0 in the current year scope
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            last_seq: 0,
            year_scope: current_year_scope(),
        }
    }

    /// The entity kind this allocator produces ids for
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Seed the counter from structured id strings fetched from the store.
    ///
    /// Malformed ids and ids of another kind are skipped, and ids from a
    /// prior year scope are ignored. With no usable ids the counter starts
    /// at 0 so the first allocation is sequence 1.
    pub fn initialize<I>(&mut self, existing: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.initialize_in(existing, current_year_scope());
    }

    /// Allocate the next id, re-deriving the year scope at call time.
    ///
    /// Crossing a year boundary resets the sequence so the first id of the
    /// new year is sequence 1. Never consults the store and cannot fail.
    pub fn next(&mut self) -> StructuredId {
        self.next_in(current_year_scope())
    }

    fn initialize_in<I>(&mut self, existing: I, year_scope: u8)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.year_scope = year_scope;
        self.last_seq = existing
            .into_iter()
            .filter_map(|raw| StructuredId::parse(raw.as_ref()).ok())
            .filter(|id| id.kind() == self.kind && id.year() == year_scope)
            .map(|id| id.seq())
            .max()
            .unwrap_or(0);
    }

    fn next_in(&mut self, year_scope: u8) -> StructuredId {
        if year_scope != self.year_scope {
            self.year_scope = year_scope;
            self.last_seq = 0;
        }
        self.last_seq += 1;
        StructuredId::from_parts(self.kind, year_scope, self.last_seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_continues_from_max_seen() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(["CL-25-01", "CL-25-02"], 25);
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-03");
    }

    #[test]
    fn test_first_id_of_empty_scope() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(Vec::<String>::new(), 25);
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-01");
    }

    #[test]
    fn test_sequences_strictly_increase() {
        let mut alloc = IdAllocator::new(EntityKind::Project);
        alloc.initialize_in(["PR-25-004"], 25);
        let a = alloc.next_in(25);
        let b = alloc.next_in(25);
        assert!(b.seq() > a.seq());
        assert_eq!(a.to_string(), "PR-25-005");
        assert_eq!(b.to_string(), "PR-25-006");
    }

    #[test]
    fn test_malformed_ids_are_skipped() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(["CL-25-02", "garbage", "CL-25-9", "CL-25"], 25);
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-03");
    }

    #[test]
    fn test_other_kind_ids_are_skipped() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(["PR-25-099", "CL-25-01"], 25);
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-02");
    }

    #[test]
    fn test_prior_year_ids_are_ignored() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(["CL-24-08", "CL-24-09"], 25);
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-01");
    }

    #[test]
    fn test_year_boundary_resets_sequence() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        alloc.initialize_in(["CL-24-07"], 24);
        assert_eq!(alloc.next_in(24).to_string(), "CL-24-08");
        // Year rolls over between two calls: sequence restarts at 1.
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-01");
        assert_eq!(alloc.next_in(25).to_string(), "CL-25-02");
    }

    #[test]
    fn test_public_next_uses_current_year() {
        let mut alloc = IdAllocator::new(EntityKind::Client);
        let id = alloc.next();
        assert_eq!(id.year(), current_year_scope());
        assert_eq!(id.seq(), 1);
    }
}
