// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::contact::Mailer;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Outbound email provider used by the contact endpoint
    pub mailer: Arc<dyn Mailer>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let cached_access_log = Arc::new(AtomicBool::new(config.logging.access_log));

        Self {
            config,
            mailer,
            cached_access_log,
        }
    }
}
