//! Account persistence abstractions
//!
//! The document store is injected into the service layer as a trait object,
//! so business logic can be tested against the in-memory implementation.
//! Keys are normalized (lower-cased, trimmed) email addresses; callers
//! normalize before touching the store.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PostgresAccountStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Account;

/// Errors surfaced by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A create hit an existing document for the same key
    #[error("Account already exists")]
    AlreadyExists,

    /// A write targeted a key with no document
    #[error("Account not found")]
    NotFound,

    /// Backend failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed document store holding one record per account
///
/// Each service operation performs at most one `get` and one write against
/// this trait, never a multi-write sequence that could be torn by a crash.
/// Concurrent writers for the same key are last-writer-wins; `create` is the
/// one atomic primitive (create-if-absent).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch the account document for a normalized email, if present
    async fn get(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Atomically create the document unless one already exists for the key
    async fn create(&self, account: &Account) -> StoreResult<()>;

    /// Replace the document stored under `account.email`
    async fn put(&self, account: &Account) -> StoreResult<()>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}
