//! Record model and query parameter types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A stored resource record. Field values live in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub resource: String,
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Create a fresh record stamped with the current time.
    #[must_use]
    pub fn new(resource: impl Into<String>, data: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            resource: resource.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a column value. `id`, `created_at` and `updated_at` resolve to
    /// the record metadata, anything else to the data map.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::String(self.id.to_string())),
            "created_at" => Some(Value::String(self.created_at.to_rfc3339())),
            "updated_at" => Some(Value::String(self.updated_at.to_rfc3339())),
            other => self.data.get(other).cloned(),
        }
    }

    /// Whether any string value contains `needle` (case-insensitive).
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.data
            .values()
            .filter_map(Value::as_str)
            .any(|s| s.to_lowercase().contains(&needle))
    }
}

/// Row shape of `admin.records`.
#[derive(Debug, FromRow)]
pub(crate) struct RecordRow {
    pub id: Uuid,
    pub resource: String,
    pub data: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            resource: row.resource,
            data: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Pagination and search parameters for listing records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
}

impl ListQuery {
    pub const DEFAULT_PER_PAGE: u32 = 25;
    pub const MAX_PER_PAGE: u32 = 100;

    /// Build a query, clamping page to >= 1 and per_page to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>, search: Option<String>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
            search: search.filter(|s| !s.trim().is_empty()),
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// One page of records plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl RecordPage {
    #[must_use]
    pub fn last_page(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.per_page)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
