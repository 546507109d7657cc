use log::debug;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, Sqlite, SqlitePool,
};
use std::{
    hash::{DefaultHasher, Hash, Hasher},
    time::Duration as StdDuration,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::config::{DBSettings, SqliteConfigSerde};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteMode {
    ReadWriteCreate,
    ReadOnly,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    WAL,
    DELETE,
    MEMORY,
}

impl JournalMode {
    fn as_pragma(&self) -> &'static str {
        match self {
            JournalMode::WAL => "WAL",
            JournalMode::DELETE => "DELETE",
            JournalMode::MEMORY => "MEMORY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynchronousMode {
    OFF,
    NORMAL,
    FULL,
}

impl SynchronousMode {
    fn as_pragma(&self) -> &'static str {
        match self {
            SynchronousMode::OFF => "OFF",
            SynchronousMode::NORMAL => "NORMAL",
            SynchronousMode::FULL => "FULL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub mode: SqliteMode,
    pub busy_timeout_ms: u32,
    pub journal_mode: JournalMode,
    pub synchronous: SynchronousMode,
    pub foreign_keys: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            mode: SqliteMode::ReadWriteCreate,
            busy_timeout_ms: 5000,
            journal_mode: JournalMode::WAL,
            synchronous: SynchronousMode::NORMAL,
            foreign_keys: true,
        }
    }
}

impl SqliteConfig {
    pub fn read_only() -> Self {
        Self {
            mode: SqliteMode::ReadOnly,
            synchronous: SynchronousMode::OFF,
            foreign_keys: false,
            ..Default::default()
        }
    }

    pub fn build_connect_options(&self, database_path: &str) -> SqliteConnectOptions {
        let options = match self.mode {
            SqliteMode::Memory => {
                // Read and write pools must land on the same in-memory database,
                // so the name is derived from the path
                let mut hasher = DefaultHasher::new();
                database_path.hash(&mut hasher);
                let memory_uri = format!("file:memdb_{}?mode=memory&cache=shared", hasher.finish());
                SqliteConnectOptions::new()
                    .filename(&memory_uri)
                    .shared_cache(true)
            }
            SqliteMode::ReadOnly => {
                return SqliteConnectOptions::new()
                    .filename(database_path)
                    .read_only(true)
                    .busy_timeout(StdDuration::from_millis(self.busy_timeout_ms as u64));
            }
            SqliteMode::ReadWriteCreate => SqliteConnectOptions::new()
                .filename(database_path)
                .read_only(false)
                .create_if_missing(true),
        };

        let mut options = options
            .busy_timeout(StdDuration::from_millis(self.busy_timeout_ms as u64))
            .pragma("journal_mode", self.journal_mode.as_pragma())
            .pragma("synchronous", self.synchronous.as_pragma());

        if self.foreign_keys {
            options = options.pragma("foreign_keys", "true");
        }

        options
    }
}

impl From<SqliteConfigSerde> for SqliteConfig {
    fn from(config: SqliteConfigSerde) -> Self {
        Self {
            mode: match config.mode.as_str() {
                "ReadOnly" => SqliteMode::ReadOnly,
                "Memory" => SqliteMode::Memory,
                _ => SqliteMode::ReadWriteCreate,
            },
            busy_timeout_ms: config.busy_timeout_ms,
            journal_mode: match config.journal_mode.to_uppercase().as_str() {
                "DELETE" => JournalMode::DELETE,
                "MEMORY" => JournalMode::MEMORY,
                _ => JournalMode::WAL,
            },
            synchronous: match config.synchronous.to_uppercase().as_str() {
                "OFF" => SynchronousMode::OFF,
                "FULL" => SynchronousMode::FULL,
                _ => SynchronousMode::NORMAL,
            },
            foreign_keys: config.foreign_keys,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabasePoolConfig {
    pub read_max_connections: u32,
    pub read_min_connections: u32,
    pub write_max_connections: u32,
    pub write_min_connections: u32,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub sqlite_config: SqliteConfig,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        DBSettings::default().into()
    }
}

impl From<DBSettings> for DatabasePoolConfig {
    fn from(config: DBSettings) -> Self {
        Self {
            read_max_connections: config.read_max_connections,
            read_min_connections: config.read_min_connections,
            write_max_connections: config.write_max_connections,
            write_min_connections: config.write_min_connections,
            idle_timeout_secs: config.idle_timeout_secs,
            acquire_timeout_secs: config.acquire_timeout_secs,
            sqlite_config: config.sqlite_config.into(),
        }
    }
}

static PREFERENCES_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/preferences");

#[derive(Clone, Debug)]
pub struct DBConnection {
    pub database_name: String,
    pub database_path: String,
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl DBConnection {
    pub async fn new(
        path: &str,
        db_name: &str,
        database_pool_config: DatabasePoolConfig,
    ) -> Result<Self, sqlx::Error> {
        let database_path = format!("{}/{}.db", path, db_name);

        if database_pool_config.sqlite_config.mode != SqliteMode::Memory {
            let database_url = format!("sqlite:{}", database_path);
            if !Sqlite::database_exists(&database_url).await? {
                Sqlite::create_database(&database_url).await?;
            }
        }

        let (read_pool, write_pool) =
            Self::create_pools(&database_path, &database_pool_config).await?;

        PREFERENCES_MIGRATOR
            .run(&write_pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        Ok(Self {
            database_name: db_name.to_string(),
            database_path,
            read_pool,
            write_pool,
        })
    }

    pub fn new_with_pools(
        database_name: String,
        database_path: String,
        read_pool: SqlitePool,
        write_pool: SqlitePool,
    ) -> Self {
        Self {
            database_name,
            database_path,
            read_pool,
            write_pool,
        }
    }

    async fn create_pools(
        database_path: &str,
        database_pool_config: &DatabasePoolConfig,
    ) -> Result<(SqlitePool, SqlitePool), sqlx::Error> {
        let write_config = database_pool_config.sqlite_config.clone();
        let read_config = if write_config.mode == SqliteMode::Memory {
            SqliteConfig {
                synchronous: SynchronousMode::OFF,
                ..write_config.clone()
            }
        } else {
            SqliteConfig {
                busy_timeout_ms: write_config.busy_timeout_ms,
                ..SqliteConfig::read_only()
            }
        };

        let write_connection = write_config.build_connect_options(database_path);
        debug!("Write connection: {:?}", write_connection);

        let write_pool = SqlitePoolOptions::new()
            .max_connections(database_pool_config.write_max_connections)
            .min_connections(database_pool_config.write_min_connections)
            .acquire_timeout(StdDuration::from_secs(
                database_pool_config.acquire_timeout_secs,
            ))
            .idle_timeout(StdDuration::from_secs(
                database_pool_config.idle_timeout_secs,
            ))
            .connect_with(write_connection)
            .await?;

        let read_connection = read_config.build_connect_options(database_path);
        debug!("Read connection: {:?}", read_connection);

        let read_pool = SqlitePoolOptions::new()
            .max_connections(database_pool_config.read_max_connections)
            .min_connections(database_pool_config.read_min_connections)
            .acquire_timeout(StdDuration::from_secs(
                database_pool_config.acquire_timeout_secs,
            ))
            .idle_timeout(StdDuration::from_secs(
                database_pool_config.idle_timeout_secs,
            ))
            .connect_with(read_connection)
            .await?;

        Ok((read_pool, write_pool))
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let _: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.read_pool)
            .await?;
        let _: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.write_pool)
            .await?;

        Ok(())
    }

    pub fn read(&self) -> &SqlitePool {
        &self.read_pool
    }

    pub fn write(&self) -> &SqlitePool {
        &self.write_pool
    }
}

pub fn parse_required_datetime(
    row: &SqliteRow,
    column: &str,
) -> Result<OffsetDateTime, sqlx::Error> {
    let date_str: String = row.get(column);
    OffsetDateTime::parse(&date_str, &Rfc3339).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> DBSettings {
        DBSettings {
            sqlite_config: SqliteConfigSerde {
                mode: String::from("Memory"),
                busy_timeout_ms: 1000,
                journal_mode: String::from("memory"),
                synchronous: String::from("off"),
                foreign_keys: true,
            },
            ..DBSettings::default()
        }
    }

    #[test]
    fn test_settings_map_onto_sqlite_config() {
        let config = DatabasePoolConfig::from(memory_settings());
        assert_eq!(config.sqlite_config.mode, SqliteMode::Memory);
        assert_eq!(config.sqlite_config.journal_mode, JournalMode::MEMORY);
        assert_eq!(config.sqlite_config.synchronous, SynchronousMode::OFF);

        let fallback = SqliteConfig::from(SqliteConfigSerde {
            mode: String::from("unknown"),
            journal_mode: String::from("unknown"),
            synchronous: String::from("unknown"),
            ..SqliteConfigSerde::default()
        });
        assert_eq!(fallback.mode, SqliteMode::ReadWriteCreate);
        assert_eq!(fallback.journal_mode, JournalMode::WAL);
        assert_eq!(fallback.synchronous, SynchronousMode::NORMAL);
    }

    #[tokio::test]
    async fn test_memory_pools_share_one_migrated_database() {
        let db = DBConnection::new("memory", "preferences_pools", memory_settings().into())
            .await
            .unwrap();
        db.ping().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_preferences")
            .fetch_one(db.read())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
