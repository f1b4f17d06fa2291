//! Entity type definitions

pub mod client;
pub mod project;
pub mod transaction;

pub use client::{Client, ClientDraft, ClientPatch};
pub use project::{Project, ProjectDraft, ProjectPatch, ProjectType};
pub use transaction::{Transaction, TransactionDraft, TransactionPatch};
