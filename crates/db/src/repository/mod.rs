//! Record storage behind the `RecordStore` trait.
//!
//! # Error Handling
//!
//! All store methods return `Result<T, AppError>` where errors are:
//! - `AppError::Unavailable` - Database connection or query failures
//! - `AppError::NotFound` - Requested record does not exist

mod config;
mod memory;
mod records;

use async_trait::async_trait;
use freight_admin_core::AppError;
use serde_json::{Map, Value};
use uuid::Uuid;

pub use config::{DbConfig, create_pool};
pub use memory::MemoryStore;
pub use records::PgRecordStore;

use crate::{ListQuery, Record, RecordPage};

/// Persistence for resource records, keyed by resource slug.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of records, newest first.
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<RecordPage, AppError>;

    /// Up to `limit` records, newest first.
    async fn all(&self, resource: &str, limit: usize) -> Result<Vec<Record>, AppError>;

    async fn get(&self, resource: &str, id: Uuid) -> Result<Record, AppError>;

    async fn create(&self, resource: &str, data: Map<String, Value>) -> Result<Record, AppError>;

    /// Merge `data` into the stored record and bump `updated_at`.
    async fn update(
        &self,
        resource: &str,
        id: Uuid,
        data: Map<String, Value>,
    ) -> Result<Record, AppError>;

    async fn delete(&self, resource: &str, id: Uuid) -> Result<(), AppError>;

    /// Check the backing store is reachable.
    async fn health_check(&self) -> bool;
}

/// Error for a record missing from `resource`.
pub(crate) fn record_not_found(resource: &str, id: Uuid) -> AppError {
    AppError::not_found(&format!("Record in {resource}"), id)
}
