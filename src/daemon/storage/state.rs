use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::tracking::{categories::CategoryList, ledger::{usage_key, DayUsage}, weekly::WeeklySummary};

use super::key_value::{KeyValueStore, StoreError};

const CATEGORIES_INITIALIZED_KEY: &str = "categoriesInitialized";
const CATEGORY_LIST_KEY: &str = "categoryList";
const WEEKLY_SUMMARY_KEY: &str = "weeklySummary";

/// Typed view over a [KeyValueStore]. Absent values come back as their defaults.
pub struct StateStore {
    store: Box<dyn KeyValueStore>,
}

impl StateStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.store.read(key).await? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Decode {
                key: key.to_owned(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store.write(key, value).await
    }

    /// Writes the builtin lists once in the lifetime of the state directory. Returns whether
    /// anything was written.
    pub async fn initialize_categories_if_absent(&self) -> Result<bool, StoreError> {
        if self.get::<bool>(CATEGORIES_INITIALIZED_KEY).await? {
            return Ok(false);
        }
        info!("Writing default categories");
        self.put(CATEGORY_LIST_KEY, &CategoryList::builtin()).await?;
        self.put(CATEGORIES_INITIALIZED_KEY, &true).await?;
        Ok(true)
    }

    pub async fn categories(&self) -> Result<CategoryList, StoreError> {
        self.get(CATEGORY_LIST_KEY).await
    }

    pub async fn replace_categories(&self, categories: &CategoryList) -> Result<(), StoreError> {
        self.put(CATEGORY_LIST_KEY, categories).await
    }

    pub async fn day_usage(&self, date: NaiveDate) -> Result<DayUsage, StoreError> {
        self.get(&usage_key(date)).await
    }

    pub async fn write_day_usage(&self, date: NaiveDate, usage: &DayUsage) -> Result<(), StoreError> {
        self.put(&usage_key(date), usage).await
    }

    pub async fn weekly_summary(&self) -> Result<WeeklySummary, StoreError> {
        self.get(WEEKLY_SUMMARY_KEY).await
    }

    pub async fn write_weekly_summary(&self, summary: &WeeklySummary) -> Result<(), StoreError> {
        self.put(WEEKLY_SUMMARY_KEY, summary).await
    }
}
