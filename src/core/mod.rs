//! Core module - identifiers, allocation, caching and synchronization

pub mod allocator;
pub mod cache;
pub mod entity;
pub mod identity;
pub mod sync;

pub use allocator::IdAllocator;
pub use cache::EntityCache;
pub use entity::Entity;
pub use identity::{EntityKind, IdParseError, KeyStrategy, StructuredId};
pub use sync::{SyncController, SyncError};
