use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use super::{DevicePreferences, PreferenceStore};
use crate::{
    domain::Error,
    infra::db::{parse_required_datetime, DBConnection},
};

impl FromRow<'_, SqliteRow> for DevicePreferences {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.get("device_id");
        Ok(DevicePreferences {
            device_id: Uuid::parse_str(&device_id).map_err(|e| sqlx::Error::ColumnDecode {
                index: String::from("device_id"),
                source: Box::new(e),
            })?,
            referral_prompts_shown: row.get("referral_prompts_shown"),
            updated_at: parse_required_datetime(row, "updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    db_connection: DBConnection,
}

impl SqlitePreferenceStore {
    pub fn new(db_connection: DBConnection) -> Self {
        Self { db_connection }
    }
}

fn timestamp() -> Result<String, Error> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| Error::DbError(sqlx::Error::Encode(Box::new(e))))
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, device_id: Uuid) -> Result<DevicePreferences, Error> {
        let preferences = sqlx::query_as::<_, DevicePreferences>(
            "SELECT device_id, referral_prompts_shown, updated_at
            FROM device_preferences
            WHERE device_id = ?",
        )
        .bind(device_id.to_string())
        .fetch_optional(self.db_connection.read())
        .await?;

        Ok(preferences.unwrap_or_else(|| DevicePreferences::new(device_id)))
    }

    async fn record_referral_prompt(&self, device_id: Uuid) -> Result<DevicePreferences, Error> {
        let now = timestamp()?;
        let preferences = sqlx::query_as::<_, DevicePreferences>(
            "INSERT INTO device_preferences (
                device_id,
                referral_prompts_shown,
                created_at,
                updated_at
            ) VALUES (?, 1, ?, ?)
            ON CONFLICT(device_id) DO UPDATE SET
                referral_prompts_shown = referral_prompts_shown + 1,
                updated_at = excluded.updated_at
            RETURNING device_id, referral_prompts_shown, updated_at",
        )
        .bind(device_id.to_string())
        .bind(&now)
        .bind(&now)
        .fetch_one(self.db_connection.write())
        .await?;

        Ok(preferences)
    }

    async fn ping(&self) -> Result<(), Error> {
        self.db_connection.ping().await.map_err(Error::from)
    }
}
