use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::database::{ConnectionManager, PostgresConnector, SqliteConnector};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_post_repo::PostgresPostRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_post_repo::SqlitePostRepo,
};

/// Wires repositories around one shared connection manager. No connection is
/// opened here; the first repository call (or the warm-up task) does that.
pub fn bootstrap_state(config: &Config) -> AppState {
    if config.is_postgres() {
        info!("Using PostgreSQL backend");
        let db = Arc::new(ConnectionManager::new(PostgresConnector::new(
            config.database_url.clone(),
            config.max_connections,
        )));

        AppState {
            config: config.clone(),
            database: db.clone(),
            event_repo: Arc::new(PostgresEventRepo::new(db.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(db.clone())),
            post_repo: Arc::new(PostgresPostRepo::new(db)),
        }
    } else {
        info!("Using SQLite backend");
        let db = Arc::new(ConnectionManager::new(SqliteConnector::new(
            config.database_url.clone(),
            config.max_connections,
        )));

        AppState {
            config: config.clone(),
            database: db.clone(),
            event_repo: Arc::new(SqliteEventRepo::new(db.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(db.clone())),
            post_repo: Arc::new(SqlitePostRepo::new(db)),
        }
    }
}
