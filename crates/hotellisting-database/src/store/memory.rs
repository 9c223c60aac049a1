//! In-process storage backend.
//!
//! Tables are ordered maps behind a single tokio `RwLock`. A commit works on
//! a copy of the tables and swaps it in only when every mutation succeeded,
//! so readers never observe a partially applied batch. Referential rules
//! mirror the PostgreSQL schema: a hotel must reference an existing country
//! and a country that still owns hotels cannot be deleted.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;
use hotellisting_entity::{Country, EntityKind, Hotel, Query, Record};

use super::{CommitReceipt, Mutation, PageSlice, Store};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<i32, Record>,
    last_id: i32,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    tables: HashMap<EntityKind, Table>,
}

impl Tables {
    fn table(&self, kind: EntityKind) -> Option<&Table> {
        self.tables.get(&kind)
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        self.tables.entry(kind).or_default()
    }

    fn rows(&self, kind: EntityKind) -> impl Iterator<Item = &Record> {
        self.table(kind).into_iter().flat_map(|table| table.rows.values())
    }

    fn len(&self, kind: EntityKind) -> u64 {
        self.table(kind)
            .map_or(0, |table| u64::try_from(table.rows.len()).unwrap_or(u64::MAX))
    }

    fn contains(&self, kind: EntityKind, id: i32) -> bool {
        self.table(kind).is_some_and(|table| table.rows.contains_key(&id))
    }

    fn apply(&mut self, mutation: Mutation, receipt: &mut CommitReceipt) -> AppResult<()> {
        match mutation {
            Mutation::Insert(record) => {
                let record = record.detached();
                self.check_row(&record)?;
                let table = self.table_mut(record.kind());
                table.last_id += 1;
                let id = table.last_id;
                let mut record = record;
                record.assign_id(id);
                table.rows.insert(id, record);
                receipt.inserted_ids.push(id);
            }
            Mutation::Update(record) => {
                let record = record.detached();
                let (kind, id) = (record.kind(), record.id());
                if !self.contains(kind, id) {
                    return Err(AppError::not_found(format!("{kind} {id} does not exist")));
                }
                self.check_row(&record)?;
                self.table_mut(kind).rows.insert(id, record);
            }
            Mutation::Delete { kind, id } => {
                if !self.contains(kind, id) {
                    return Err(AppError::not_found(format!("{kind} {id} does not exist")));
                }
                if kind == EntityKind::Country && self.owns_hotels(id) {
                    return Err(AppError::constraint_violation(format!(
                        "Country {id} is still referenced by hotels"
                    )));
                }
                self.table_mut(kind).rows.remove(&id);
            }
        }
        receipt.rows_affected += 1;
        Ok(())
    }

    fn owns_hotels(&self, country_id: i32) -> bool {
        self.rows(EntityKind::Hotel)
            .any(|record| matches!(record, Record::Hotel(hotel) if hotel.country_id == country_id))
    }

    /// Column checks the schema enforces with CHECK and FOREIGN KEY clauses.
    fn check_row(&self, record: &Record) -> AppResult<()> {
        match record {
            Record::Country(_) => Ok(()),
            Record::Hotel(hotel) => {
                if !(1.0..=5.0).contains(&hotel.rating) {
                    return Err(AppError::constraint_violation(format!(
                        "Hotel rating {} is outside 1-5",
                        hotel.rating
                    )));
                }
                if !self.contains(EntityKind::Country, hotel.country_id) {
                    return Err(AppError::constraint_violation(format!(
                        "Hotel references missing country {}",
                        hotel.country_id
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Storage backend that keeps every row in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the same reference data the migrations seed.
    pub fn seeded() -> Self {
        let mut tables = Tables::default();
        let mut receipt = CommitReceipt::default();
        let seed = seed_countries()
            .into_iter()
            .map(|country| Mutation::Insert(Record::Country(country)))
            .chain(
                seed_hotels()
                    .into_iter()
                    .map(|hotel| Mutation::Insert(Record::Hotel(hotel))),
            );
        for mutation in seed {
            if let Err(e) = tables.apply(mutation, &mut receipt) {
                warn!(error = %e, "Skipping seed row");
            }
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

fn seed_countries() -> Vec<Country> {
    vec![
        Country::new("Jamaica", "JM"),
        Country::new("Bahamas", "BS"),
        Country::new("Cayman Island", "CI"),
    ]
}

fn seed_hotels() -> Vec<Hotel> {
    vec![
        Hotel::new("Sandals Resort and Spa", "Negril", 4.5, 1),
        Hotel::new("Comfort Suites", "George Town", 4.3, 3),
        Hotel::new("Grand Palldium", "Nassua", 4.0, 2),
    ]
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch(&self, query: &Query) -> AppResult<Vec<Record>> {
        let tables = self.tables.read().await;
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(tables
            .rows(query.kind)
            .filter(|record| record.matches(&query.conditions))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_page(
        &self,
        kind: EntityKind,
        offset: u64,
        limit: u64,
    ) -> AppResult<PageSlice> {
        let tables = self.tables.read().await;
        let total = tables.len(kind);
        if offset >= total {
            return Ok(PageSlice {
                records: Vec::new(),
                total,
            });
        }
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(PageSlice {
            records: tables.rows(kind).skip(offset).take(limit).cloned().collect(),
            total,
        })
    }

    async fn count(&self, kind: EntityKind) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.len(kind))
    }

    async fn commit(&self, batch: Vec<Mutation>) -> AppResult<CommitReceipt> {
        let mut guard = self.tables.write().await;
        let mut working = guard.clone();
        let mut receipt = CommitReceipt::default();
        let size = batch.len();

        for mutation in batch {
            if let Err(e) = working.apply(mutation, &mut receipt) {
                warn!(error = %e, batch_size = size, "Rolling back memory commit");
                return Err(e);
            }
        }

        *guard = working;
        debug!(rows = receipt.rows_affected, "Memory commit applied");
        Ok(receipt)
    }
}
