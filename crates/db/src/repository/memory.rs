//! In-process record store used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, record_not_found};
use crate::{AppError, ListQuery, Record, RecordPage};

/// Records per resource, kept in insertion order (oldest first).
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<RecordPage, AppError> {
        let records = self.records.read().await;
        let matching: Vec<&Record> = records
            .get(resource)
            .into_iter()
            .flatten()
            .rev()
            .filter(|r| query.search.as_deref().is_none_or(|s| r.matches(s)))
            .collect();

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let page = matching
            .iter()
            .skip(offset)
            .take(query.per_page as usize)
            .map(|r| (*r).clone())
            .collect();

        Ok(RecordPage {
            records: page,
            total: matching.len() as u64,
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn all(&self, resource: &str, limit: usize) -> Result<Vec<Record>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .get(resource)
            .into_iter()
            .flatten()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, resource: &str, id: Uuid) -> Result<Record, AppError> {
        let records = self.records.read().await;
        records
            .get(resource)
            .and_then(|list| list.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| record_not_found(resource, id))
    }

    async fn create(&self, resource: &str, data: Map<String, Value>) -> Result<Record, AppError> {
        let record = Record::new(resource, data);
        self.records
            .write()
            .await
            .entry(resource.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        resource: &str,
        id: Uuid,
        data: Map<String, Value>,
    ) -> Result<Record, AppError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(resource)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| record_not_found(resource, id))?;

        record.data.extend(data);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, resource: &str, id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let list = records
            .get_mut(resource)
            .ok_or_else(|| record_not_found(resource, id))?;
        let before = list.len();
        list.retain(|r| r.id != id);
        if list.len() == before {
            return Err(record_not_found(resource, id));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
