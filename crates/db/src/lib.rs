//! Record storage for the freight admin panel.
//!
//! Provides:
//! - The [`RecordStore`] trait every page and action talks to
//! - [`PgRecordStore`], backed by PostgreSQL via SQLx (`admin.records`)
//! - [`MemoryStore`], an in-process store for local runs and tests
//!
//! # Example
//!
//! ```ignore
//! use freight_admin_db::{DbConfig, PgRecordStore, RecordStore, create_pool};
//!
//! let pool = create_pool(&DbConfig::from_url("postgres://localhost/freight")).await?;
//! let store = PgRecordStore::new(pool);
//! let shipment = store.create("shipments", data).await?;
//! ```

mod models;
mod repository;

use freight_admin_core::AppError;

/// Database error wrapper for `?` conversion into `AppError`.
#[derive(Debug)]
struct DbError(sqlx::Error);

impl From<sqlx::Error> for DbError {
    #[inline]
    fn from(e: sqlx::Error) -> Self {
        Self(e)
    }
}

impl From<DbError> for AppError {
    #[inline]
    fn from(e: DbError) -> Self {
        Self::Unavailable(e.0.to_string())
    }
}

pub use models::{ListQuery, Record, RecordPage};
pub use repository::{DbConfig, MemoryStore, PgRecordStore, RecordStore, create_pool};
