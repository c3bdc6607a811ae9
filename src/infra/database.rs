//! Lazily opened, process-wide database handle.
//!
//! A [`ConnectionManager`] caches one handle. The first caller to
//! [`ConnectionManager::get`] starts the connection attempt; callers that arrive
//! while it is in flight await that same attempt and all see its outcome. A failed
//! attempt is forgotten once it settles, so the next call starts a fresh one.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tokio::sync::OnceCell;
use tracing::log::LevelFilter;
use tracing::{error, info};

use crate::domain::ports::DatabaseProbe;
use crate::error::AppError;

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, AppError>;
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, Arc<AppError>>>>;

pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    handle: OnceCell<C::Handle>,
    pending: Mutex<Option<Attempt<C::Handle>>>,
    attempts: AtomicUsize,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            handle: OnceCell::new(),
            pending: Mutex::new(None),
            attempts: AtomicUsize::new(0),
        }
    }

    pub async fn get(&self) -> Result<C::Handle, AppError> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }

        let attempt = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(handle) = self.handle.get() {
                return Ok(handle.clone());
            }
            pending.get_or_insert_with(|| self.start_attempt()).clone()
        };

        let outcome = attempt.clone().await;

        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Ok(handle) = &outcome {
                let _ = self.handle.set(handle.clone());
            }
            if pending.as_ref().is_some_and(|current| current.ptr_eq(&attempt)) {
                *pending = None;
            }
        }

        outcome.map_err(|e| shared_error(&e))
    }

    fn start_attempt(&self) -> Attempt<C::Handle> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let connector = self.connector.clone();

        async move {
            info!(attempt, "Opening database connection...");
            match connector.connect().await {
                Ok(handle) => {
                    info!(attempt, "Database connected");
                    Ok(handle)
                }
                Err(e) => {
                    error!(attempt, "Database connection failed: {}", e);
                    Err(Arc::new(e))
                }
            }
        }
        .boxed()
        .shared()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Number of connection attempts started so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Every waiter of a failed attempt gets its own copy of the failure.
fn shared_error(err: &AppError) -> AppError {
    match err {
        AppError::Connection(msg) => AppError::Connection(msg.clone()),
        other => AppError::Connection(other.to_string()),
    }
}

#[async_trait]
impl<C: Connector> DatabaseProbe for ConnectionManager<C> {
    async fn ensure_connected(&self) -> Result<(), AppError> {
        self.get().await.map(|_| ())
    }

    fn is_connected(&self) -> bool {
        self.handle.initialized()
    }
}

pub struct SqliteConnector {
    url: String,
    max_connections: u32,
}

impl SqliteConnector {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self { url: url.into(), max_connections }
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Handle = SqlitePool;

    async fn connect(&self) -> Result<SqlitePool, AppError> {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| AppError::Connection(format!("Invalid SQLite connection string: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to run SQLite migrations: {}", e)))?;

        Ok(pool)
    }
}

pub struct PostgresConnector {
    url: String,
    max_connections: u32,
}

impl PostgresConnector {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self { url: url.into(), max_connections }
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, AppError> {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = self
            .url
            .parse()
            .map_err(|e| AppError::Connection(format!("Invalid Postgres URL: {}", e)))?;
        let opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to run Postgres migrations: {}", e)))?;

        Ok(pool)
    }
}

pub type SqliteDb = ConnectionManager<SqliteConnector>;
pub type PostgresDb = ConnectionManager<PostgresConnector>;
