mod store;

pub use store::*;

use async_trait::async_trait;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Error;

/// How many times the referral prompt is offered on one device
pub const MAX_REFERRAL_PROMPTS: i64 = 3;

/// Preferences remembered per browser device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePreferences {
    pub device_id: Uuid,
    pub referral_prompts_shown: i64,
    pub updated_at: OffsetDateTime,
}

impl DevicePreferences {
    pub fn new(device_id: Uuid) -> Self {
        Self {
            device_id,
            referral_prompts_shown: 0,
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn should_prompt_referral(&self) -> bool {
        self.referral_prompts_shown < MAX_REFERRAL_PROMPTS
    }
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Preferences for the device, defaults when nothing was stored yet
    async fn get(&self, device_id: Uuid) -> Result<DevicePreferences, Error>;

    /// Counts one more referral prompt as handled (submitted or dismissed)
    async fn record_referral_prompt(&self, device_id: Uuid) -> Result<DevicePreferences, Error>;

    async fn ping(&self) -> Result<(), Error>;
}

/// Non-persistent store, keeps preferences for the life of the process
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    records: RwLock<HashMap<Uuid, DevicePreferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, device_id: Uuid) -> Result<DevicePreferences, Error> {
        Ok(self
            .records
            .read()
            .await
            .get(&device_id)
            .cloned()
            .unwrap_or_else(|| DevicePreferences::new(device_id)))
    }

    async fn record_referral_prompt(&self, device_id: Uuid) -> Result<DevicePreferences, Error> {
        let mut records = self.records.write().await;
        let record = records
            .entry(device_id)
            .or_insert_with(|| DevicePreferences::new(device_id));
        record.referral_prompts_shown += 1;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn ping(&self) -> Result<(), Error> {
        Ok(())
    }
}
