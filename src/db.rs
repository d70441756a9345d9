use crate::books::Library;
use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;

const SCHEMA: &str = include_str!("schema.sql");

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    replica: bool,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn books(&self) -> Library<'_> {
        Library::new(&self.conn)
    }

    pub fn is_replica(turso_url: &Option<String>, turso_auth_token: &Option<String>) -> bool {
        turso_url.is_some() && turso_auth_token.is_some()
    }

    pub fn replicated(&self) -> bool {
        self.replica
    }

    pub async fn sync(&self) -> Result<()> {
        if self.replica {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        if cfg.app.is_in_memory() {
            tracing::info!("[db] running with an in-memory store, nothing will be persisted");
            return Self::memory().await;
        }

        let path = data_dir.join(cfg.app.get_db());
        let turso_url = cfg.app.turso_url.clone();
        let turso_auth_token = cfg.app.turso_auth_token.clone();
        let replica = Self::is_replica(&turso_url, &turso_auth_token);

        let db = match (turso_url, turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                Builder::new_synced_database(&path, url, token)
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => {
                tracing::info!(path = ?path, "[db] running in local mode");
                Builder::new_local(&path).build().await?
            }
        };

        Self::open(db, replica).await
    }

    pub async fn memory() -> Result<Self> {
        let db = Builder::new_local(crate::config::IN_MEMORY).build().await?;
        Self::open(db, false).await
    }

    async fn open(db: LibsqlDatabase, replica: bool) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        conn.execute_batch(SCHEMA)
            .await
            .map_err(|e| anyhow::anyhow!("failed to create schema: {e}"))?;

        Ok(Database { db, conn, replica })
    }
}
