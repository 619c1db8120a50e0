//! Session-scoped user state.
//!
//! Goals and milestones are threshold lines users draw on the charts.
//! They live in memory for the lifetime of a session and reset on
//! restart by design; only small UI preferences (the dark-mode flag)
//! survive, persisted client-side through a [`SettingsStore`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Threshold;

/// In-memory goal and milestone lines for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    goals: Vec<Threshold>,
    milestones: Vec<Threshold>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a goal line for the accounts chart.
    pub fn add_goal(&mut self, threshold: Threshold) {
        tracing::debug!(value = threshold.value, label = %threshold.label, "Goal added");
        self.goals.push(threshold);
    }

    /// Add a milestone line for the top-apps chart.
    pub fn add_milestone(&mut self, threshold: Threshold) {
        tracing::debug!(value = threshold.value, label = %threshold.label, "Milestone added");
        self.milestones.push(threshold);
    }

    /// Remove every goal with the given label. Returns how many were removed.
    pub fn remove_goal(&mut self, label: &str) -> usize {
        let before = self.goals.len();
        self.goals.retain(|t| t.label != label);
        before - self.goals.len()
    }

    /// Remove every milestone with the given label. Returns how many were removed.
    pub fn remove_milestone(&mut self, label: &str) -> usize {
        let before = self.milestones.len();
        self.milestones.retain(|t| t.label != label);
        before - self.milestones.len()
    }

    pub fn goals(&self) -> &[Threshold] {
        &self.goals
    }

    pub fn milestones(&self) -> &[Threshold] {
        &self.milestones
    }

    /// Drop all threshold lines.
    pub fn clear(&mut self) {
        self.goals.clear();
        self.milestones.clear();
    }
}

/// UI preferences that outlive a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiSettings {
    /// Dark color scheme toggle
    #[serde(default)]
    pub dark_mode: bool,
}

/// Persistence boundary for [`UiSettings`].
///
/// A missing backing file is not an error; `load` returns defaults.
pub trait SettingsStore {
    fn load(&self) -> Result<UiSettings>;
    fn save(&self, settings: &UiSettings) -> Result<()>;
}

/// TOML-file-backed settings store.
pub struct FileSettingsStore {
    path: std::path::PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default XDG state location.
    pub fn default_location() -> Self {
        Self::new(crate::config::Config::settings_path())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<UiSettings> {
        if !self.path.exists() {
            return Ok(UiSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Settings(format!("failed to parse {:?}: {}", self.path, e)))
    }

    fn save(&self, settings: &UiSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(settings)
            .map_err(|e| Error::Settings(format!("failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
