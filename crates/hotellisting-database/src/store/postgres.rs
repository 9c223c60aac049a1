//! PostgreSQL storage backend.

use async_trait::async_trait;
use sqlx::postgres::PgQueryResult;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, warn};

use hotellisting_core::error::{AppError, ErrorKind};
use hotellisting_core::result::AppResult;
use hotellisting_core::types::filter::{FilterField, FilterOp, FilterValue, LIKE_ESCAPE};
use hotellisting_entity::{Country, EntityKind, Hotel, Query, Record};

use super::{CommitReceipt, Mutation, PageSlice, Store};

/// Storage backend over a sqlx PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select(kind: EntityKind) -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            kind.columns().join(", "),
            kind.table()
        ))
    }

    async fn load(
        conn: &mut PgConnection,
        kind: EntityKind,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> AppResult<Vec<Record>> {
        let records = match kind {
            EntityKind::Country => builder
                .build_query_as::<Country>()
                .fetch_all(&mut *conn)
                .await
                .map(|rows| rows.into_iter().map(Record::Country).collect()),
            EntityKind::Hotel => builder
                .build_query_as::<Hotel>()
                .fetch_all(&mut *conn)
                .await
                .map(|rows| rows.into_iter().map(Record::Hotel).collect()),
        };
        records.map_err(|e| classify(e, &format!("Failed to read {}", kind.table())))
    }

    async fn count_rows(conn: &mut PgConnection, kind: EntityKind) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table()))
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| classify(e, &format!("Failed to count {}", kind.table())))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

/// `LIMIT`/`OFFSET` operand; values beyond `BIGINT` saturate.
fn bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn push_condition(
    builder: &mut QueryBuilder<'_, Postgres>,
    kind: EntityKind,
    condition: &FilterField,
) -> AppResult<()> {
    if !kind.columns().contains(&condition.field) {
        return Err(AppError::invalid_argument(format!(
            "Unknown {kind} column '{}'",
            condition.field
        )));
    }
    builder
        .push(condition.field)
        .push(" ")
        .push(condition.op.as_sql())
        .push(" ");
    match &condition.value {
        FilterValue::String(value) => builder.push_bind(value.clone()),
        FilterValue::Integer(value) => builder.push_bind(*value),
        FilterValue::Float(value) => builder.push_bind(*value),
    };
    if condition.op == FilterOp::ILike {
        builder.push(format!(" ESCAPE '{LIKE_ESCAPE}'"));
    }
    Ok(())
}

/// Map a sqlx error, separating integrity violations from storage faults.
fn classify(err: sqlx::Error, context: &str) -> AppError {
    let violation = err
        .as_database_error()
        .filter(|db| {
            db.is_foreign_key_violation() || db.is_unique_violation() || db.is_check_violation()
        })
        .map(|db| db.message().to_string());

    match violation {
        Some(message) => AppError::with_source(
            ErrorKind::ConstraintViolation,
            format!("{context}: {message}"),
            err,
        ),
        None => AppError::with_source(ErrorKind::Storage, format!("{context}: {err}"), err),
    }
}

fn expect_row(result: PgQueryResult, kind: EntityKind, id: i32) -> AppResult<u64> {
    match result.rows_affected() {
        0 => Err(AppError::not_found(format!("{kind} {id} does not exist"))),
        n => Ok(n),
    }
}

async fn apply(
    tx: &mut Transaction<'_, Postgres>,
    mutation: Mutation,
    receipt: &mut CommitReceipt,
) -> AppResult<()> {
    match mutation {
        Mutation::Insert(Record::Country(country)) => {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO countries (name, short_name) VALUES ($1, $2) RETURNING id",
            )
            .bind(&country.name)
            .bind(&country.short_name)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| classify(e, "Failed to insert country"))?;
            receipt.inserted_ids.push(id);
            receipt.rows_affected += 1;
        }
        Mutation::Insert(Record::Hotel(hotel)) => {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO hotels (name, address, rating, country_id) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&hotel.name)
            .bind(&hotel.address)
            .bind(hotel.rating)
            .bind(hotel.country_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| classify(e, "Failed to insert hotel"))?;
            receipt.inserted_ids.push(id);
            receipt.rows_affected += 1;
        }
        Mutation::Update(Record::Country(country)) => {
            let result =
                sqlx::query("UPDATE countries SET name = $1, short_name = $2 WHERE id = $3")
                    .bind(&country.name)
                    .bind(&country.short_name)
                    .bind(country.id)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| classify(e, "Failed to update country"))?;
            receipt.rows_affected += expect_row(result, EntityKind::Country, country.id)?;
        }
        Mutation::Update(Record::Hotel(hotel)) => {
            let result = sqlx::query(
                "UPDATE hotels SET name = $1, address = $2, rating = $3, country_id = $4 \
                 WHERE id = $5",
            )
            .bind(&hotel.name)
            .bind(&hotel.address)
            .bind(hotel.rating)
            .bind(hotel.country_id)
            .bind(hotel.id)
            .execute(&mut **tx)
            .await
            .map_err(|e| classify(e, "Failed to update hotel"))?;
            receipt.rows_affected += expect_row(result, EntityKind::Hotel, hotel.id)?;
        }
        Mutation::Delete { kind, id } => {
            let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
                .bind(id)
                .execute(&mut **tx)
                .await
                .map_err(|e| classify(e, &format!("Failed to delete {kind} {id}")))?;
            receipt.rows_affected += expect_row(result, kind, id)?;
        }
    }
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn fetch(&self, query: &Query) -> AppResult<Vec<Record>> {
        let mut builder = Self::select(query.kind);
        for (i, condition) in query.conditions.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            push_condition(&mut builder, query.kind, condition)?;
        }
        builder.push(" ORDER BY id");
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(bigint(limit));
        }
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| classify(e, "Failed to acquire connection"))?;
        Self::load(&mut conn, query.kind, builder).await
    }

    async fn fetch_page(&self, kind: EntityKind, offset: u64, limit: u64) -> AppResult<PageSlice> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(e, "Failed to begin transaction"))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "Failed to open read snapshot"))?;

        let total = Self::count_rows(&mut tx, kind).await?;
        let records = if offset >= total {
            Vec::new()
        } else {
            let mut builder = Self::select(kind);
            builder
                .push(" ORDER BY id LIMIT ")
                .push_bind(bigint(limit))
                .push(" OFFSET ")
                .push_bind(bigint(offset));
            Self::load(&mut tx, kind, builder).await?
        };

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to close read snapshot"))?;
        Ok(PageSlice { records, total })
    }

    async fn count(&self, kind: EntityKind) -> AppResult<u64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| classify(e, "Failed to acquire connection"))?;
        Self::count_rows(&mut conn, kind).await
    }

    async fn commit(&self, batch: Vec<Mutation>) -> AppResult<CommitReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(e, "Failed to begin transaction"))?;
        let mut receipt = CommitReceipt::default();
        let size = batch.len();

        for mutation in batch {
            if let Err(e) = apply(&mut tx, mutation, &mut receipt).await {
                warn!(error = %e, batch_size = size, "Rolling back transaction");
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                return Err(e);
            }
        }

        tx.commit()
            .await
            .map_err(|e| classify(e, "Failed to commit transaction"))?;
        debug!(rows = receipt.rows_affected, "Transaction committed");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_render_with_placeholders() {
        let mut builder = PgStore::select(EntityKind::Hotel);
        builder.push(" WHERE ");
        push_condition(
            &mut builder,
            EntityKind::Hotel,
            &FilterField::new("rating", FilterOp::Gte, 4.0),
        )
        .unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, name, address, rating, country_id FROM hotels WHERE rating >= $1"
        );
    }

    #[test]
    fn test_substring_condition_declares_escape() {
        let mut builder = PgStore::select(EntityKind::Country);
        builder.push(" WHERE ");
        push_condition(
            &mut builder,
            EntityKind::Country,
            &FilterField::contains("name", "_"),
        )
        .unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, name, short_name FROM countries WHERE name ILIKE $1 ESCAPE '\\'"
        );
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let mut builder = PgStore::select(EntityKind::Country);
        let err = push_condition(
            &mut builder,
            EntityKind::Country,
            &FilterField::eq("country_id", 1),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_window_operands_never_go_negative() {
        assert_eq!(bigint(20), 20);
        assert_eq!(bigint(u64::MAX), i64::MAX);
        assert_eq!(bigint(i64::MAX as u64 + 1), i64::MAX);
    }

    #[test]
    fn test_classify_non_database_error_is_storage() {
        let err = classify(sqlx::Error::PoolTimedOut, "Failed to read hotels");
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
