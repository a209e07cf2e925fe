//! The app-launcher collaborator.

use serde_json::Value;
use tracing::debug;

/// Opens an application window. Rendering is entirely up to the host.
pub trait AppLauncher: Send + Sync {
    /// Open `app`, optionally with a payload (for example a file to edit).
    fn launch(&self, app: &str, payload: Option<Value>);
}

/// Launcher that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLauncher;

impl AppLauncher for NoopLauncher {
    fn launch(&self, app: &str, payload: Option<Value>) {
        debug!(app, ?payload, "launch requested with no launcher attached");
    }
}
