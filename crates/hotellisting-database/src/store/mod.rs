//! Storage backends.
//!
//! A [`Store`] reads type-erased [`Record`]s and applies a batch of
//! [`Mutation`]s atomically. Typed access lives one level up in
//! [`Repository`](crate::repository::Repository).

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use hotellisting_core::result::AppResult;
use hotellisting_entity::{EntityKind, Query, Record};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A single staged change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create a row; the backend assigns the identity.
    Insert(Record),
    /// Overwrite the columns of an existing row.
    Update(Record),
    /// Remove a row by key.
    Delete {
        /// Table to delete from.
        kind: EntityKind,
        /// Primary key.
        id: i32,
    },
}

impl Mutation {
    /// Entity kind the mutation touches.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Insert(record) | Self::Update(record) => record.kind(),
            Self::Delete { kind, .. } => *kind,
        }
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Number of rows inserted, updated or deleted.
    pub rows_affected: u64,
    /// Identities assigned to the batch's inserts, in batch order.
    pub inserted_ids: Vec<i32>,
}

/// One window of rows plus the row count observed by the same read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSlice {
    /// Rows inside the window, in key order.
    pub records: Vec<Record>,
    /// Total rows of the kind when the window was read.
    pub total: u64,
}

/// Record storage with transactional batch commit.
///
/// Reads return rows ordered by primary key with relations detached.
/// `commit` applies the whole batch or nothing: a failing mutation rolls back
/// every earlier one.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    /// Rows matching every condition of `query`.
    async fn fetch(&self, query: &Query) -> AppResult<Vec<Record>>;

    /// Rows `[offset, offset + limit)` of `kind` in key order, and the total
    /// row count, from one consistent snapshot. An offset past the end yields
    /// no rows.
    async fn fetch_page(&self, kind: EntityKind, offset: u64, limit: u64)
    -> AppResult<PageSlice>;

    /// Total number of rows of `kind`.
    async fn count(&self, kind: EntityKind) -> AppResult<u64>;

    /// Apply `batch` in order inside a single transaction.
    async fn commit(&self, batch: Vec<Mutation>) -> AppResult<CommitReceipt>;
}
