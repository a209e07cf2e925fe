//! Interpreter session state.
//!
//! A [`Session`] is the injected, explicitly passed state object the
//! dispatcher mutates: current directory, display preferences, feature
//! flags and history. Every mutation is persisted under
//! [`keys::TERMINAL_STATE`](aura_storage::keys::TERMINAL_STATE).

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use aura_storage::{KvStore, KvStoreExt, StorageError, StorageResult, keys};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::settings::{DEFAULT_HOME, TerminalSettings};

/// Terminal color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    #[default]
    Dark,
    /// Translucent.
    Glassy,
}

impl Theme {
    /// Every theme, in display order.
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Glassy];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Glassy => "glassy",
        }
    }
}

/// Terminal font size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// 12px.
    Small,
    /// 14px.
    #[default]
    Medium,
    /// 18px.
    Large,
}

impl FontSize {
    /// Every size, in display order.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Rendered size in pixels.
    #[must_use]
    pub const fn pixels(self) -> u8 {
        match self {
            Self::Small => 12,
            Self::Medium => 14,
            Self::Large => 18,
        }
    }
}

/// State of the themed quantum core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantumState {
    /// Idle.
    #[default]
    Dormant,
    /// An algorithm is running.
    Processing,
    /// Final state.
    Superposition,
    /// Final state.
    Entangled,
    /// Final state.
    Coherent,
    /// Final state.
    QuantumFlux,
}

impl QuantumState {
    /// States an algorithm run can settle in.
    pub const OUTCOMES: [Self; 4] = [
        Self::Superposition,
        Self::Entangled,
        Self::Coherent,
        Self::QuantumFlux,
    ];

    /// Upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dormant => "DORMANT",
            Self::Processing => "PROCESSING",
            Self::Superposition => "SUPERPOSITION",
            Self::Entangled => "ENTANGLED",
            Self::Coherent => "COHERENT",
            Self::QuantumFlux => "QUANTUM_FLUX",
        }
    }
}

macro_rules! named_enum_impls {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("invalid {}: {s}", $what))
            }
        }
    };
}

named_enum_impls!(Theme, "theme");
named_enum_impls!(FontSize, "font size");

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of the simulated system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name.
    pub os: String,
    /// Release.
    pub version: String,
    /// Kernel description.
    pub kernel: String,
    /// Architecture.
    pub arch: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: "Aura OS".into(),
            version: "3.0.1".into(),
            kernel: "Neural-Quantum Hybrid".into(),
            arch: "x86_64-quantum".into(),
        }
    }
}

/// Everything the terminal remembers between commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    /// Working directory, in canonical trailing-slash form.
    pub current_directory: String,
    /// Color theme.
    pub theme: Theme,
    /// Font size.
    pub font_size: FontSize,
    /// Whether `write` encrypts new content.
    pub encryption_enabled: bool,
    /// Neural interface flag.
    pub is_neural_active: bool,
    /// Quantum core state.
    pub quantum_state: QuantumState,
    /// Applications launched this session, without duplicates.
    pub open_apps: Vec<String>,
    /// Submitted lines, oldest first.
    pub command_history: Vec<String>,
    /// Static system description.
    pub system_info: SystemInfo,
}

impl SessionState {
    /// Fresh state starting in `home`.
    #[must_use]
    pub fn with_home(home: impl Into<String>) -> Self {
        Self {
            current_directory: home.into(),
            theme: Theme::default(),
            font_size: FontSize::default(),
            encryption_enabled: false,
            is_neural_active: false,
            quantum_state: QuantumState::default(),
            open_apps: Vec::new(),
            command_history: Vec::new(),
            system_info: SystemInfo::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_home(DEFAULT_HOME)
    }
}

/// A partial update: every `Some` field replaces the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    /// New working directory.
    pub current_directory: Option<String>,
    /// New theme.
    pub theme: Option<Theme>,
    /// New font size.
    pub font_size: Option<FontSize>,
    /// New encryption flag.
    pub encryption_enabled: Option<bool>,
    /// New neural flag.
    pub is_neural_active: Option<bool>,
    /// New quantum state.
    pub quantum_state: Option<QuantumState>,
    /// New open-apps list.
    pub open_apps: Option<Vec<String>>,
}

impl SessionPatch {
    fn apply(self, state: &mut SessionState) {
        if let Some(v) = self.current_directory {
            state.current_directory = v;
        }
        if let Some(v) = self.theme {
            state.theme = v;
        }
        if let Some(v) = self.font_size {
            state.font_size = v;
        }
        if let Some(v) = self.encryption_enabled {
            state.encryption_enabled = v;
        }
        if let Some(v) = self.is_neural_active {
            state.is_neural_active = v;
        }
        if let Some(v) = self.quantum_state {
            state.quantum_state = v;
        }
        if let Some(v) = self.open_apps {
            state.open_apps = v;
        }
    }
}

/// Shared, persisted session state.
pub struct Session {
    store: Arc<dyn KvStore>,
    state: RwLock<SessionState>,
    /// Held across mutate-and-persist so writes reach the store in order.
    write_lock: Mutex<()>,
    home: String,
    history_limit: usize,
    started: Instant,
}

impl Session {
    /// Restore the session from `store`, or start fresh.
    ///
    /// A corrupt saved state is logged and replaced with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load(store: Arc<dyn KvStore>, settings: &TerminalSettings) -> StorageResult<Self> {
        let state = match store.load_json::<SessionState>(keys::TERMINAL_STATE) {
            Ok(Some(state)) => state,
            Ok(None) => SessionState::with_home(settings.home_directory.clone()),
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "discarding unreadable terminal state");
                SessionState::with_home(settings.home_directory.clone())
            },
            Err(e) => return Err(e),
        };
        debug!(
            cwd = %state.current_directory,
            history = state.command_history.len(),
            "terminal session loaded"
        );
        Ok(Self {
            store,
            state: RwLock::new(state),
            write_lock: Mutex::new(()),
            home: settings.home_directory.clone(),
            history_limit: settings.history_limit,
            started: Instant::now(),
        })
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn get(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `patch` and persist. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be persisted; the in-memory
    /// state keeps the update.
    pub fn update(&self, patch: SessionPatch) -> StorageResult<SessionState> {
        self.mutate(|state| patch.apply(state))
    }

    /// Append a submitted line to the history, dropping the oldest entries
    /// beyond the limit.
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update).
    pub fn push_history(&self, line: &str) -> StorageResult<()> {
        let limit = self.history_limit;
        self.mutate(|state| {
            state.command_history.push(line.to_owned());
            let excess = state.command_history.len().saturating_sub(limit);
            if excess > 0 {
                state.command_history.drain(..excess);
            }
        })?;
        Ok(())
    }

    /// Restore preferences, flags and the working directory to their
    /// defaults. History and open apps are kept.
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update).
    pub fn reset(&self) -> StorageResult<SessionState> {
        let fresh = SessionState::with_home(self.home.clone());
        self.update(SessionPatch {
            current_directory: Some(fresh.current_directory),
            theme: Some(fresh.theme),
            font_size: Some(fresh.font_size),
            encryption_enabled: Some(fresh.encryption_enabled),
            is_neural_active: Some(fresh.is_neural_active),
            quantum_state: Some(fresh.quantum_state),
            open_apps: None,
        })
    }

    /// Time since this session object was created. Not persisted.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// The home directory this session resets to.
    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    fn mutate(&self, f: impl FnOnce(&mut SessionState)) -> StorageResult<SessionState> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
            state.clone()
        };
        self.store.store_json(keys::TERMINAL_STATE, &snapshot)?;
        Ok(snapshot)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.get())
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_storage::MemoryKvStore;

    fn session(store: &Arc<MemoryKvStore>) -> Session {
        Session::load(
            Arc::clone(store) as Arc<dyn KvStore>,
            &TerminalSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let store = Arc::new(MemoryKvStore::new());
        let state = session(&store).get();
        assert_eq!(state.current_directory, "/home/aura/");
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.font_size, FontSize::Medium);
        assert_eq!(state.quantum_state, QuantumState::Dormant);
        assert_eq!(state.system_info.version, "3.0.1");
    }

    #[test]
    fn test_update_persists() {
        let store = Arc::new(MemoryKvStore::new());
        session(&store)
            .update(SessionPatch {
                theme: Some(Theme::Glassy),
                ..SessionPatch::default()
            })
            .unwrap();

        let restored = session(&store).get();
        assert_eq!(restored.theme, Theme::Glassy);

        let raw = store.get(keys::TERMINAL_STATE).unwrap().unwrap();
        assert!(raw.contains("\"theme\":\"glassy\""));
        assert!(raw.contains("\"quantumState\":\"DORMANT\""));
    }

    #[test]
    fn test_history_is_capped() {
        let store = Arc::new(MemoryKvStore::new());
        let settings = TerminalSettings {
            history_limit: 3,
            ..TerminalSettings::default()
        };
        let session = Session::load(store, &settings).unwrap();
        for i in 0..5 {
            session.push_history(&format!("cmd {i}")).unwrap();
        }
        assert_eq!(session.get().command_history, vec!["cmd 2", "cmd 3", "cmd 4"]);
    }

    #[test]
    fn test_reset_keeps_history() {
        let store = Arc::new(MemoryKvStore::new());
        let session = session(&store);
        session.push_history("theme light").unwrap();
        session
            .update(SessionPatch {
                theme: Some(Theme::Light),
                encryption_enabled: Some(true),
                current_directory: Some("/usr/".into()),
                ..SessionPatch::default()
            })
            .unwrap();

        let state = session.reset().unwrap();
        assert_eq!(state.theme, Theme::Dark);
        assert!(!state.encryption_enabled);
        assert_eq!(state.current_directory, "/home/aura/");
        assert_eq!(state.command_history, vec!["theme light"]);
    }

    #[test]
    fn test_corrupt_state_falls_back() {
        let store = Arc::new(MemoryKvStore::new());
        store.set(keys::TERMINAL_STATE, "{{{".into()).unwrap();
        assert_eq!(session(&store).get(), SessionState::default());
    }

    #[test]
    fn test_partial_state_fills_defaults() {
        let store = Arc::new(MemoryKvStore::new());
        store
            .set(keys::TERMINAL_STATE, r#"{"theme":"light"}"#.into())
            .unwrap();
        let state = session(&store).get();
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.font_size, FontSize::Medium);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("neon".parse::<Theme>().is_err());
        assert_eq!("large".parse::<FontSize>().unwrap().pixels(), 18);
        let json = serde_json::to_string(&QuantumState::QuantumFlux).unwrap();
        assert_eq!(json, "\"QUANTUM_FLUX\"");
    }
}
