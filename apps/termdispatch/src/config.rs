//! User configuration
//!
//! Read from `config.json` in the platform config directory
//! (`~/.config/termdispatch/config.json` on Linux). Every field is optional.
//!
//! ```json
//! {
//!   "extra_terminals": [
//!     { "executable_name": "foot", "invocation_template": "{command}" }
//!   ],
//!   "themes": { "paper": { "foreground": "#000000", "background": "#ffffff" } },
//!   "quoting": "escaped",
//!   "probe": "shell"
//! }
//! ```

use crate::error::{DispatchError, Result};
use crate::terminal::{
    ProbeKind, QuotingMode, TerminalSpec, ThemeColors, INTERACTIVE_SHELL_MARKER,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Tried before the built-in candidates, in order
    pub extra_terminals: Vec<TerminalSpec>,
    /// Added to, or overriding, the built-in themes
    pub themes: BTreeMap<String, ThemeColors>,
    pub quoting: QuotingMode,
    /// `"path"` searches PATH directly, `"shell"` asks `shell` via `command -v`
    pub probe: ProbeKind,
    /// Interpreter the rendered command line is run through
    pub shell: String,
    pub interactive_shell_marker: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            extra_terminals: Vec::new(),
            themes: BTreeMap::new(),
            quoting: QuotingMode::default(),
            probe: ProbeKind::default(),
            shell: "sh".to_string(),
            interactive_shell_marker: INTERACTIVE_SHELL_MARKER.to_string(),
        }
    }
}

impl DispatcherConfig {
    /// Location of the user's config file, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "termdispatch").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from [`Self::default_path`], or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            extra_terminals = config.extra_terminals.len(),
            themes = config.themes.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Save to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for terminal in &self.extra_terminals {
            terminal.validate()?;
        }
        if self.shell.trim().is_empty() {
            return Err(DispatchError::config("shell cannot be empty"));
        }
        if self.interactive_shell_marker.trim().is_empty() {
            return Err(DispatchError::config(
                "interactive_shell_marker cannot be empty",
            ));
        }
        Ok(())
    }
}
