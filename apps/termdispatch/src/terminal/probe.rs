//! Terminal detection
//!
//! A probe answers one question: is this executable on PATH. Detection walks
//! the candidate list in order and stops at the first hit.

use super::catalog::TerminalSpec;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Presence check for an executable name
pub trait TerminalProbe: Send + Sync {
    fn is_available(&self, executable: &str) -> bool;
}

/// Which probe a configured dispatcher uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// [`PathProbe`] over the process's PATH
    #[default]
    Path,
    /// [`ShellProbe`] through the configured shell
    Shell,
}

impl ProbeKind {
    pub fn build(self, shell: &str) -> Arc<dyn TerminalProbe> {
        match self {
            ProbeKind::Path => Arc::new(PathProbe::new()),
            ProbeKind::Shell => Arc::new(ShellProbe::new(shell)),
        }
    }
}

/// PATH lookup via the `which` crate
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    /// Search this PATH instead of the process's own
    search_path: Option<OsString>,
}

impl PathProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe an explicit PATH-style list of directories
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl TerminalProbe for PathProbe {
    fn is_available(&self, executable: &str) -> bool {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(executable, Some(paths), cwd).is_ok()
            }
            None => which::which(executable).is_ok(),
        }
    }
}

/// `command -v` through the shell, matching what an interactive user would see
#[derive(Debug, Clone)]
pub struct ShellProbe {
    shell: String,
}

impl ShellProbe {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellProbe {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl TerminalProbe for ShellProbe {
    fn is_available(&self, executable: &str) -> bool {
        // Passed as a positional parameter so the name is never parsed as shell code
        Command::new(&self.shell)
            .args(["-c", "command -v \"$1\" > /dev/null", "termdispatch-probe", executable])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// First available candidate, in list order
pub fn detect<'a>(probe: &dyn TerminalProbe, candidates: &'a [TerminalSpec]) -> Option<&'a TerminalSpec> {
    candidates.iter().find(|spec| {
        let found = probe.is_available(&spec.executable_name);
        tracing::trace!(terminal = %spec.executable_name, found, "Probed terminal");
        found
    })
}

/// Every available candidate, in list order
pub fn detect_all<'a>(probe: &dyn TerminalProbe, candidates: &'a [TerminalSpec]) -> Vec<&'a TerminalSpec> {
    candidates
        .iter()
        .filter(|spec| probe.is_available(&spec.executable_name))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::terminal::catalog::{builtin_terminals, QuotingRule};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Probe that reports a fixed set of names and records every lookup
    #[derive(Default)]
    pub(crate) struct FixedProbe {
        installed: HashSet<String>,
        pub(crate) lookups: Mutex<Vec<String>>,
    }

    impl FixedProbe {
        pub(crate) fn with(names: &[&str]) -> Self {
            Self {
                installed: names.iter().map(|n| n.to_string()).collect(),
                lookups: Mutex::new(Vec::new()),
            }
        }
    }

    impl TerminalProbe for FixedProbe {
        fn is_available(&self, executable: &str) -> bool {
            self.lookups.lock().unwrap().push(executable.to_string());
            self.installed.contains(executable)
        }
    }

    #[cfg(unix)]
    fn install_fake(dir: &std::path::Path, name: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_detect_prefers_earlier_candidate() {
        let probe = FixedProbe::with(&["lxterminal", "konsole", "xterm"]);
        let found = detect(&probe, builtin_terminals()).unwrap();
        assert_eq!(found.executable_name, "xterm");
    }

    #[test]
    fn test_detect_stops_at_first_match() {
        let probe = FixedProbe::with(&["xterm", "konsole"]);
        detect(&probe, builtin_terminals());
        assert_eq!(*probe.lookups.lock().unwrap(), vec!["easyterm.py", "xterm"]);
    }

    #[test]
    fn test_detect_none_installed() {
        let probe = FixedProbe::default();
        assert!(detect(&probe, builtin_terminals()).is_none());
        assert_eq!(probe.lookups.lock().unwrap().len(), builtin_terminals().len());
    }

    #[test]
    fn test_detect_all_keeps_priority_order() {
        let probe = FixedProbe::with(&["tilix", "gnome-terminal", "easyterm.py"]);
        let names: Vec<&str> = detect_all(&probe, builtin_terminals())
            .into_iter()
            .map(|t| t.executable_name.as_str())
            .collect();
        assert_eq!(names, vec!["easyterm.py", "gnome-terminal", "tilix"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_path_probe_uses_search_path() {
        let dir = tempfile::tempdir().unwrap();
        install_fake(dir.path(), "konsole");

        let probe = PathProbe::with_search_path(dir.path());
        assert!(probe.is_available("konsole"));
        assert!(!probe.is_available("xterm"));

        let found = detect(&probe, builtin_terminals()).unwrap();
        assert_eq!(found.executable_name, "konsole");
    }

    #[cfg(unix)]
    #[test]
    fn test_path_probe_ignores_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("xterm"), "not a program").unwrap();

        let probe = PathProbe::with_search_path(dir.path());
        assert!(!probe.is_available("xterm"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_probe_finds_shell_builtins_and_rejects_garbage() {
        let probe = ShellProbe::default();
        assert!(probe.is_available("sh"));
        assert!(!probe.is_available("definitely-not-a-terminal-4f2a"));
        // Name is not evaluated by the shell
        assert!(!probe.is_available("sh; true"));
    }

    #[test]
    fn test_shell_probe_missing_shell_reports_absent() {
        let probe = ShellProbe::new("/nonexistent/shell");
        assert!(!probe.is_available("sh"));
    }

    #[test]
    fn test_detect_custom_candidates() {
        let candidates = vec![
            TerminalSpec::new("foot", "-e {command}", QuotingRule::SimpleWrap),
            TerminalSpec::new("xterm", "-e {command}", QuotingRule::SimpleWrap),
        ];
        let probe = FixedProbe::with(&["foot", "xterm"]);
        assert_eq!(detect(&probe, &candidates).unwrap().executable_name, "foot");
    }
}
