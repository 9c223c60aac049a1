//! Unit of work: one repository per entity type and a single commit point.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tracing::{debug, warn};

use hotellisting_core::result::AppResult;
use hotellisting_entity::{Country, Hotel};

use crate::repository::{InsertTicket, Repository};
use crate::store::{Mutation, Store};

/// Request-scoped aggregate of repositories sharing one staged batch.
///
/// Staging needs `&mut self`, so a unit of work is never shared between
/// tasks. Mutations staged through any repository are saved together, in
/// the order they were staged.
#[derive(Debug)]
pub struct UnitOfWork {
    store: Arc<dyn Store>,
    max_page_size: u32,
    sequence: Arc<AtomicU64>,
    countries: Option<Repository<Country>>,
    hotels: Option<Repository<Hotel>>,
    assigned: HashMap<u64, i32>,
}

impl UnitOfWork {
    /// Open a unit of work over `store`.
    pub fn new(store: Arc<dyn Store>, max_page_size: u32) -> Self {
        Self {
            store,
            max_page_size,
            sequence: Arc::new(AtomicU64::new(0)),
            countries: None,
            hotels: None,
            assigned: HashMap::new(),
        }
    }

    /// The country repository, created on first access.
    pub fn countries(&mut self) -> &mut Repository<Country> {
        let (store, sequence, max) = (&self.store, &self.sequence, self.max_page_size);
        self.countries
            .get_or_insert_with(|| Repository::new(Arc::clone(store), Arc::clone(sequence), max))
    }

    /// The hotel repository, created on first access.
    pub fn hotels(&mut self) -> &mut Repository<Hotel> {
        let (store, sequence, max) = (&self.store, &self.sequence, self.max_page_size);
        self.hotels
            .get_or_insert_with(|| Repository::new(Arc::clone(store), Arc::clone(sequence), max))
    }

    /// Commit every staged mutation atomically and return the number of
    /// affected rows.
    ///
    /// The staged batch is consumed whether the commit succeeds or fails.
    pub async fn save(&mut self) -> AppResult<u64> {
        let mut staged = Vec::new();
        if let Some(countries) = self.countries.as_mut() {
            staged.extend(countries.take_staged());
        }
        if let Some(hotels) = self.hotels.as_mut() {
            staged.extend(hotels.take_staged());
        }
        staged.sort_by_key(|s| s.sequence);
        self.assigned.clear();

        if staged.is_empty() {
            return Ok(0);
        }

        let inserts: Vec<u64> = staged
            .iter()
            .filter(|s| matches!(s.mutation, Mutation::Insert(_)))
            .map(|s| s.sequence)
            .collect();
        let batch: Vec<Mutation> = staged.into_iter().map(|s| s.mutation).collect();
        let size = batch.len();

        let receipt = self.store.commit(batch).await.map_err(|e| {
            warn!(error = %e, batch_size = size, "Unit of work save failed");
            e
        })?;

        self.assigned
            .extend(inserts.into_iter().zip(receipt.inserted_ids));
        debug!(
            batch_size = size,
            rows = receipt.rows_affected,
            "Unit of work saved"
        );
        Ok(receipt.rows_affected)
    }

    /// Identity assigned to a staged insert by the last successful save.
    pub fn assigned_id<T>(&self, ticket: &InsertTicket<T>) -> Option<i32> {
        self.assigned.get(&ticket.sequence).copied()
    }

    /// Drop every staged mutation without touching storage.
    pub fn discard(&mut self) {
        let mut dropped = 0;
        if let Some(countries) = self.countries.as_mut() {
            dropped += countries.take_staged().len();
        }
        if let Some(hotels) = self.hotels.as_mut() {
            dropped += hotels.take_staged().len();
        }
        debug!(dropped, "Unit of work discarded");
    }
}

/// Opens request-scoped units of work over a shared store.
#[derive(Debug, Clone)]
pub struct UnitOfWorkFactory {
    store: Arc<dyn Store>,
    max_page_size: u32,
}

impl UnitOfWorkFactory {
    /// Create a factory over `store`.
    pub fn new(store: Arc<dyn Store>, max_page_size: u32) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    /// Open a fresh unit of work.
    pub fn begin(&self) -> UnitOfWork {
        UnitOfWork::new(Arc::clone(&self.store), self.max_page_size)
    }
}
