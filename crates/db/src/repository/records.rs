//! PostgreSQL record store over `admin.records`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{RecordStore, record_not_found};
use crate::models::RecordRow;
use crate::{AppError, DbError, ListQuery, Record, RecordPage};

/// Search predicate: any string-typed top-level value matches the pattern `$2`.
const SEARCH_FILTER: &str = r"
    resource = $1
    AND ($2::text IS NULL OR EXISTS (
        SELECT 1
          FROM jsonb_each(data) AS e
         WHERE jsonb_typeof(e.value) = 'string'
           AND e.value #>> '{}' ILIKE $2 ESCAPE '\'
    ))";

/// `ILIKE` pattern matching `search` as a literal substring.
fn substring_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Record store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<RecordPage, AppError> {
        let pattern = query.search.as_deref().map(substring_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM admin.records WHERE {SEARCH_FILTER}"
        ))
        .bind(resource)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError)?;

        let rows: Vec<RecordRow> = sqlx::query_as(&format!(
            r"
            SELECT id, resource, data, created_at, updated_at
              FROM admin.records
             WHERE {SEARCH_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4
            "
        ))
        .bind(resource)
        .bind(pattern.as_deref())
        .bind(i64::from(query.per_page))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError)?;

        Ok(RecordPage {
            records: rows.into_iter().map(Record::from).collect(),
            total: u64::try_from(total).unwrap_or_default(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn all(&self, resource: &str, limit: usize) -> Result<Vec<Record>, AppError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r"
            SELECT id, resource, data, created_at, updated_at
              FROM admin.records
             WHERE resource = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2
            ",
        )
        .bind(resource)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError)?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn get(&self, resource: &str, id: Uuid) -> Result<Record, AppError> {
        sqlx::query_as::<_, RecordRow>(
            r"
            SELECT id, resource, data, created_at, updated_at
              FROM admin.records
             WHERE resource = $1 AND id = $2
            ",
        )
        .bind(resource)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError)?
        .map(Record::from)
        .ok_or_else(|| record_not_found(resource, id))
    }

    async fn create(&self, resource: &str, data: Map<String, Value>) -> Result<Record, AppError> {
        let record = Record::new(resource, data);

        sqlx::query(
            r"
            INSERT INTO admin.records (id, resource, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(record.id)
        .bind(&record.resource)
        .bind(Json(&record.data))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError)?;

        Ok(record)
    }

    async fn update(
        &self,
        resource: &str,
        id: Uuid,
        data: Map<String, Value>,
    ) -> Result<Record, AppError> {
        sqlx::query_as::<_, RecordRow>(
            r"
            UPDATE admin.records
               SET data = data || $3,
                   updated_at = now()
             WHERE resource = $1 AND id = $2
            RETURNING id, resource, data, created_at, updated_at
            ",
        )
        .bind(resource)
        .bind(id)
        .bind(Json(&data))
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError)?
        .map(Record::from)
        .ok_or_else(|| record_not_found(resource, id))
    }

    async fn delete(&self, resource: &str, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM admin.records WHERE resource = $1 AND id = $2")
            .bind(resource)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError)?;

        if result.rows_affected() == 0 {
            return Err(record_not_found(resource, id));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
