use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::core::Config;
use crate::db::DbService;
use shared::SyncPayload;

/// Capacity of the in-process sync channel; slow consumers that lag behind
/// this many events fall back to a full refetch.
const SYNC_CHANNEL_CAPACITY: usize = 256;

/// Per-resource version counters
///
/// Lock-free via DashMap; every broadcast bumps the resource's version so
/// consumers can detect missed events.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the resource's version and return the new value (starts
    /// at 1 for an unseen resource).
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, 0 for an unseen resource.
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Server state — explicitly constructed at startup and handed to axum,
/// cloned cheaply per request (everything inside is a shallow handle).
///
/// There is deliberately no module-level singleton anywhere: the pool and
/// the sync channel live here and nowhere else.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Per-resource version counters for broadcast_sync
    pub resource_versions: Arc<ResourceVersions>,
    sync_tx: broadcast::Sender<SyncPayload>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let (sync_tx, _) = broadcast::channel(SYNC_CHANNEL_CAPACITY);
        Self {
            config,
            pool,
            resource_versions: Arc::new(ResourceVersions::new()),
            sync_tx,
        }
    }

    /// Initialize the server state: working directory layout, then the
    /// database (work_dir/database/comanda.db).
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("comanda.db");
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize database: {e}"))?;

        Ok(Self::new(config.clone(), db.pool))
    }

    /// Subscribe to resource change notifications (printer/notification
    /// consumers).
    pub fn subscribe_sync(&self) -> broadcast::Receiver<SyncPayload> {
        self.sync_tx.subscribe()
    }

    /// Broadcast a resource change to all subscribed consumers.
    ///
    /// Versions increase monotonically per resource. A send with no live
    /// subscriber is not an error.
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload::new(resource, version, action, id, data);
        if self.sync_tx.send(payload).is_err() {
            tracing::trace!(resource, action, "sync broadcast with no subscribers");
        }
    }

    /// Start background tasks. Currently a single consumer that mirrors
    /// sync traffic into the log at debug level.
    pub fn start_background_tasks(&self) {
        let mut rx = self.subscribe_sync();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => {
                        tracing::debug!(
                            resource = %payload.resource,
                            action = %payload.action,
                            id = %payload.id,
                            version = payload.version,
                            "sync"
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("sync logger lagged, skipped {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
