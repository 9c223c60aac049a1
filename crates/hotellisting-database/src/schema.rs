//! Schema preparation: embedded migrations followed by a check of the
//! reference data the listing endpoints expect.

use sqlx::PgPool;
use tracing::{info, warn};

use hotellisting_core::error::{AppError, ErrorKind};
use hotellisting_core::result::AppResult;

/// Row counts observed once the schema is in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Rows in `countries`.
    pub countries: u64,
    /// Rows in `hotels`.
    pub hotels: u64,
    /// Rows in `users`.
    pub users: u64,
}

impl SchemaReport {
    /// Whether any countries exist. Hotels cannot be created without one.
    pub fn has_reference_data(&self) -> bool {
        self.countries > 0
    }

    /// Whether anyone could log in to perform writes.
    pub fn has_accounts(&self) -> bool {
        self.users > 0
    }
}

/// Apply pending migrations, then report what the catalogue holds.
pub async fn prepare(pool: &PgPool) -> AppResult<SchemaReport> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    let report = inspect(pool).await?;
    info!(
        countries = report.countries,
        hotels = report.hotels,
        users = report.users,
        "Schema ready"
    );
    if !report.has_reference_data() {
        warn!("No countries present; hotel creation will be rejected until one is added");
    }
    if !report.has_accounts() {
        warn!("No user accounts; register one before using write endpoints");
    }
    Ok(report)
}

/// Count the catalogue and account tables in one statement.
pub async fn inspect(pool: &PgPool) -> AppResult<SchemaReport> {
    let (countries, hotels, users) = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT (SELECT COUNT(*) FROM countries), \
         (SELECT COUNT(*) FROM hotels), \
         (SELECT COUNT(*) FROM users)",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to inspect schema", e))?;

    Ok(SchemaReport {
        countries: u64::try_from(countries).unwrap_or(0),
        hotels: u64::try_from(hotels).unwrap_or(0),
        users: u64::try_from(users).unwrap_or(0),
    })
}
