//! Gestion: core sync engine for a small business-management dashboard
//!
//! Structured id allocation and optimistic local/remote synchronization for
//! clients, projects and transactions backed by a remote document store.

pub mod core;
pub mod entities;
pub mod store;
