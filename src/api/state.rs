//! Application state for the HRMS API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

use crate::clock::Clock;
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the database pool, the loaded policy configuration and the clock
/// every handler reads "now" from.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    config: Arc<ConfigLoader>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(db: DatabaseConnection, config: ConfigLoader, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            clock,
        }
    }

    /// Returns the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared clock.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Office-local current time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Office-local current date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
