//! Generic repository.
//!
//! One [`Repository`] exists per entity type inside a
//! [`UnitOfWork`](crate::unit_of_work::UnitOfWork). Reads go straight to the
//! store. Writes are validated and staged; nothing reaches storage until the
//! unit of work saves.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;
use hotellisting_core::types::pagination::{Page, PageRequest};
use hotellisting_entity::{Condition, Entity, Include, Query, Record};

use crate::store::{Mutation, Store};

/// A mutation tagged with its position in the unit of work's staging order.
#[derive(Debug)]
pub(crate) struct Staged {
    pub(crate) sequence: u64,
    pub(crate) mutation: Mutation,
}

/// Handle to a staged insert. Resolves to the assigned identity through
/// [`UnitOfWork::assigned_id`](crate::unit_of_work::UnitOfWork::assigned_id)
/// once the batch has been saved.
#[derive(Debug)]
pub struct InsertTicket<T> {
    pub(crate) sequence: u64,
    _entity: PhantomData<fn() -> T>,
}

/// Typed data access for one entity type.
#[derive(Debug)]
pub struct Repository<T: Entity> {
    store: Arc<dyn Store>,
    sequence: Arc<AtomicU64>,
    max_page_size: u32,
    staged: Vec<Staged>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
    pub(crate) fn new(store: Arc<dyn Store>, sequence: Arc<AtomicU64>, max_page_size: u32) -> Self {
        Self {
            store,
            sequence,
            max_page_size,
            staged: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Every persisted entity, ordered by key.
    pub async fn get_all(&self) -> AppResult<Vec<T>> {
        self.load(Query::all(T::KIND), &[]).await
    }

    /// The entity matching every filter, with `includes` eagerly loaded.
    ///
    /// When several rows match, the one with the lowest key is returned.
    pub async fn get(&self, filters: &[T::Filter], includes: &[T::Include]) -> AppResult<Option<T>> {
        let query = Self::query(filters).limit(1);
        Ok(self.load(query, includes).await?.into_iter().next())
    }

    /// Shorthand for [`Self::get`] with an identity filter.
    pub async fn get_by_id(&self, id: i32, includes: &[T::Include]) -> AppResult<Option<T>> {
        self.get(&[T::id_filter(id)], includes).await
    }

    /// Every entity matching all filters, ordered by key.
    pub async fn find(&self, filters: &[T::Filter], includes: &[T::Include]) -> AppResult<Vec<T>> {
        self.load(Self::query(filters), includes).await
    }

    /// One page of all entities in key order.
    ///
    /// Items and `total_items` come from the same storage snapshot. A page
    /// past the end is empty rather than an error.
    pub async fn get_paged_list(&self, request: &PageRequest) -> AppResult<Page<T>> {
        let window = request.resolve(self.max_page_size)?;
        let slice = self
            .store
            .fetch_page(T::KIND, window.offset(), window.limit())
            .await?;
        let items = slice
            .records
            .into_iter()
            .map(Self::typed)
            .collect::<AppResult<Vec<T>>>()?;
        Ok(Page::from_window(items, window, slice.total))
    }

    /// Stage the creation of `entity`.
    pub fn insert(&mut self, entity: T) -> AppResult<InsertTicket<T>> {
        Self::check_insert(&entity)?;
        let sequence = self.stage(Mutation::Insert(entity.into_record().detached()));
        Ok(InsertTicket {
            sequence,
            _entity: PhantomData,
        })
    }

    /// Stage the creation of every entity, or none of them if any is invalid.
    pub fn insert_range(&mut self, entities: Vec<T>) -> AppResult<Vec<InsertTicket<T>>> {
        for entity in &entities {
            Self::check_insert(entity)?;
        }
        Ok(entities
            .into_iter()
            .map(|entity| InsertTicket {
                sequence: self.stage(Mutation::Insert(entity.into_record().detached())),
                _entity: PhantomData,
            })
            .collect())
    }

    /// Stage a modification of an identified entity.
    pub fn update(&mut self, entity: T) -> AppResult<()> {
        Self::check_id(entity.id())?;
        entity.check_fields()?;
        self.stage(Mutation::Update(entity.into_record().detached()));
        Ok(())
    }

    /// Stage the removal of the entity with key `id`.
    pub fn delete(&mut self, id: i32) -> AppResult<()> {
        Self::check_id(id)?;
        self.stage(Mutation::Delete { kind: T::KIND, id });
        Ok(())
    }

    /// Stage the removal of every key, or none of them if any is invalid.
    pub fn delete_range(&mut self, ids: &[i32]) -> AppResult<()> {
        for id in ids {
            Self::check_id(*id)?;
        }
        for id in ids {
            self.stage(Mutation::Delete {
                kind: T::KIND,
                id: *id,
            });
        }
        Ok(())
    }

    /// Number of mutations staged and not yet saved.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn take_staged(&mut self) -> Vec<Staged> {
        std::mem::take(&mut self.staged)
    }

    fn stage(&mut self, mutation: Mutation) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.staged.push(Staged { sequence, mutation });
        sequence
    }

    fn query(filters: &[T::Filter]) -> Query {
        Query::filtered(T::KIND, filters.iter().map(Condition::to_condition).collect())
    }

    fn check_insert(entity: &T) -> AppResult<()> {
        if entity.id() != 0 {
            return Err(AppError::invalid_argument(format!(
                "A new {} must not carry an identity (got {})",
                T::KIND,
                entity.id()
            )));
        }
        entity.check_fields()
    }

    fn check_id(id: i32) -> AppResult<()> {
        if id < 1 {
            return Err(AppError::invalid_argument(format!(
                "{} identity must be at least 1, got {id}",
                T::KIND
            )));
        }
        Ok(())
    }

    fn typed(record: Record) -> AppResult<T> {
        let kind = record.kind();
        T::from_record(record).ok_or_else(|| {
            AppError::internal(format!("Expected a {} row, storage returned {kind}", T::KIND))
        })
    }

    async fn load(&self, query: Query, includes: &[T::Include]) -> AppResult<Vec<T>> {
        let records = self.store.fetch(&query).await?;
        let mut entities = records
            .into_iter()
            .map(Self::typed)
            .collect::<AppResult<Vec<T>>>()?;

        let mut seen = HashSet::new();
        for include in includes.iter().filter(|include| seen.insert(**include)) {
            for entity in &mut entities {
                let related = self.store.fetch(&include.related(entity)).await?;
                include.attach(entity, related);
            }
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use hotellisting_core::error::ErrorKind;
    use hotellisting_entity::{
        Country, CountryFilter, CountryInclude, Hotel, HotelFilter, HotelInclude,
    };

    fn repository<T: Entity>(store: Arc<dyn Store>) -> Repository<T> {
        Repository::new(store, Arc::new(AtomicU64::new(0)), 50)
    }

    #[tokio::test]
    async fn test_get_by_id_with_include() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let hotels = repository::<Hotel>(store);

        let hotel = hotels
            .get_by_id(2, &[HotelInclude::Country])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hotel.name, "Comfort Suites");
        assert_eq!(hotel.country.map(|c| c.short_name), Some("CI".to_string()));

        let bare = hotels.get_by_id(2, &[]).await.unwrap().unwrap();
        assert!(bare.country.is_none());
    }

    #[tokio::test]
    async fn test_get_returns_lowest_key_on_multiple_matches() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let hotels = repository::<Hotel>(store);
        let hotel = hotels
            .get(&[HotelFilter::MinRating(4.0)], &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hotel.id, 1);
    }

    #[tokio::test]
    async fn test_get_without_match_is_none() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let countries = repository::<Country>(store);
        let missing = countries
            .get(&[CountryFilter::ShortName("ZZ".into())], &[])
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_country_include_loads_hotels() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let countries = repository::<Country>(store);
        let found = countries
            .find(
                &[CountryFilter::NameContains("a".into())],
                &[CountryInclude::Hotels, CountryInclude::Hotels],
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
        for country in found {
            assert_eq!(country.hotels.map(|h| h.len()), Some(1));
        }
    }

    #[tokio::test]
    async fn test_name_contains_matches_wildcards_literally() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let countries = repository::<Country>(store);
        let found = countries
            .find(&[CountryFilter::NameContains("_".into())], &[])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_paged_list_rejects_page_zero() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let countries = repository::<Country>(store);
        let err = countries
            .get_paged_list(&PageRequest::new(0, 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_paged_list_far_past_the_end_is_empty() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded());
        let countries = repository::<Country>(store);
        let page = countries
            .get_paged_list(&PageRequest::new(i64::MAX, 10))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[tokio::test]
    async fn test_invalid_insert_stages_nothing() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut countries = repository::<Country>(store);
        assert!(countries.insert(Country::new("Jamaica", "JAM")).is_err());

        let batch = vec![Country::new("Jamaica", "JM"), Country::new("X", "XX")];
        assert!(countries.insert_range(batch).is_err());
        assert_eq!(countries.pending(), 0);
    }

    #[tokio::test]
    async fn test_update_without_identity_is_rejected() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut countries = repository::<Country>(store);
        let err = countries.update(Country::new("Jamaica", "JM")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(countries.delete_range(&[1, 0]).is_err());
        assert_eq!(countries.pending(), 0);
    }
}
