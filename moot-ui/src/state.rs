//! Shared application state for the API server.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use moot::core::wizard::Wizard;
use moot::io::transport::Transport;
use moot::library::{Library, calendar_day};
use tokio::sync::Mutex;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The single wizard session. Its draft lives only here.
#[derive(Debug)]
pub struct Session {
    pub wizard: Wizard,
    pub exercise_name: String,
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,
    pub transport: Arc<dyn Transport + Send + Sync>,
    /// At most one submission in progress.
    pub session: Arc<Mutex<Option<Session>>>,
    clock: Clock,
}

impl AppState {
    pub fn new(library: Library, transport: Arc<dyn Transport + Send + Sync>) -> Self {
        Self::with_clock(library, transport, Arc::new(Utc::now))
    }

    pub fn with_clock(
        library: Library,
        transport: Arc<dyn Transport + Send + Sync>,
        clock: Clock,
    ) -> Self {
        Self {
            library: Arc::new(library),
            transport,
            session: Arc::new(Mutex::new(None)),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Calendar day used for date windows.
    pub fn today(&self) -> NaiveDate {
        calendar_day(self.now())
    }
}
