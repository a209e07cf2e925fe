//! Mock collaborators.

use std::sync::{Arc, Mutex, PoisonError};

use aura_terminal::AppLauncher;
use serde_json::Value;

/// One recorded launch.
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    /// Application id.
    pub app: String,
    /// Payload passed along, if any.
    pub payload: Option<Value>,
}

/// [`AppLauncher`] that records every launch.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launches: Arc<Mutex<Vec<Launch>>>,
}

impl RecordingLauncher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every launch so far, oldest first.
    #[must_use]
    pub fn launches(&self) -> Vec<Launch> {
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the app ids, oldest first.
    #[must_use]
    pub fn apps(&self) -> Vec<String> {
        self.launches().into_iter().map(|l| l.app).collect()
    }
}

impl AppLauncher for RecordingLauncher {
    fn launch(&self, app: &str, payload: Option<Value>) {
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Launch {
                app: app.to_owned(),
                payload,
            });
    }
}
