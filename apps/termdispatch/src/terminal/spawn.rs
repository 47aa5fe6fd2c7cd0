//! Process launching
//!
//! The rendered line is handed to a shell interpreter. The terminal it starts
//! is long-lived, so the spawn returns as soon as the process exists and a
//! background thread reaps it when the user closes the window.
//!
//! The terminal is resolved against the PATH the child will see right before
//! spawning. A terminal that vanished after detection, or that the caller's
//! own PATH hides, is a spawn failure rather than a shell exit status nobody
//! reads.

use super::render::EnvMode;
use crate::error::{DispatchError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Search path a shell falls back to when the environment has no PATH
const DEFAULT_SEARCH_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// A fully rendered launch, ready for the OS
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlan<'a> {
    /// Executable name of the selected terminal, for error reporting
    pub terminal: &'a str,
    pub command_line: &'a str,
    pub env: &'a HashMap<String, String>,
    pub env_mode: EnvMode,
}

/// Starts the process described by a [`SpawnPlan`]
pub trait Spawner: Send + Sync {
    fn spawn(&self, plan: &SpawnPlan<'_>) -> Result<()>;
}

/// Runs the command line through `<shell> -c`
#[derive(Debug, Clone)]
pub struct ShellSpawner {
    shell: String,
}

impl ShellSpawner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }
}

impl Default for ShellSpawner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl SpawnPlan<'_> {
    /// PATH of the child: the caller's, else the inherited one unless replaced
    fn effective_path(&self) -> OsString {
        if let Some(path) = self.env.get("PATH") {
            return path.into();
        }
        match self.env_mode {
            EnvMode::Overlay => std::env::var_os("PATH"),
            EnvMode::Replace => None,
        }
        .unwrap_or_else(|| DEFAULT_SEARCH_PATH.into())
    }

    /// Locate the terminal the way the child's shell will
    fn resolve_terminal(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(self.terminal, Some(self.effective_path()), cwd).map_err(|e| {
            DispatchError::spawn(
                self.terminal,
                std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
            )
        })
    }
}

impl Spawner for ShellSpawner {
    fn spawn(&self, plan: &SpawnPlan<'_>) -> Result<()> {
        let resolved = plan.resolve_terminal()?;
        tracing::trace!(terminal = %plan.terminal, path = %resolved.display(), "Resolved terminal");

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(plan.command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null());

        if plan.env_mode == EnvMode::Replace {
            cmd.env_clear();
        }
        cmd.envs(plan.env);

        let mut child = cmd
            .spawn()
            .map_err(|e| DispatchError::spawn(plan.terminal, e))?;

        let pid = child.id();
        tracing::debug!(pid, terminal = %plan.terminal, "Terminal process started");

        let reaper = std::thread::Builder::new()
            .name("termdispatch-reaper".to_string())
            .spawn(move || match child.wait() {
                Ok(status) => tracing::debug!(pid, %status, "Terminal process exited"),
                Err(e) => tracing::warn!(pid, error = %e, "Failed to wait for terminal process"),
            });
        if let Err(e) = reaper {
            tracing::warn!(pid, error = %e, "Could not start reaper thread");
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Spawner that records plans instead of starting processes
    #[derive(Default)]
    pub(crate) struct RecordingSpawner {
        pub(crate) launched: Mutex<Vec<(String, HashMap<String, String>, EnvMode)>>,
    }

    impl Spawner for RecordingSpawner {
        fn spawn(&self, plan: &SpawnPlan<'_>) -> Result<()> {
            self.launched.lock().unwrap().push((
                plan.command_line.to_string(),
                plan.env.clone(),
                plan.env_mode,
            ));
            Ok(())
        }
    }

    fn wait_for_file(path: &std::path::Path) -> String {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Ok(contents) = std::fs::read_to_string(path) {
                if contents.ends_with('\n') {
                    return contents;
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("{} was never written", path.display());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_spawner_applies_env_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let line = format!(
            "printf '%s:%s\\n' \"$TERMDISPATCH_TEST_VAR\" \"${{PATH:+inherited}}\" > '{}'",
            out.display()
        );
        let env = HashMap::from([("TERMDISPATCH_TEST_VAR".to_string(), "overlay".to_string())]);

        ShellSpawner::default()
            .spawn(&SpawnPlan {
                terminal: "sh",
                command_line: &line,
                env: &env,
                env_mode: EnvMode::Overlay,
            })
            .unwrap();

        assert_eq!(wait_for_file(&out), "overlay:inherited\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_spawner_replaces_env() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let line = format!(
            "printf '%s:%s\\n' \"$ONLY_VAR\" \"${{HOME:-unset}}\" > '{}'",
            out.display()
        );
        let env = HashMap::from([("ONLY_VAR".to_string(), "alone".to_string())]);

        ShellSpawner::new("/bin/sh")
            .spawn(&SpawnPlan {
                terminal: "sh",
                command_line: &line,
                env: &env,
                env_mode: EnvMode::Replace,
            })
            .unwrap();

        assert_eq!(wait_for_file(&out), "alone:unset\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_shell_is_spawn_failure() {
        let env = HashMap::new();
        let err = ShellSpawner::new("/nonexistent/termdispatch-shell")
            .spawn(&SpawnPlan {
                terminal: "sh",
                command_line: "sh -c true",
                env: &env,
                env_mode: EnvMode::Overlay,
            })
            .unwrap_err();

        assert!(err.is_spawn_failure());
        assert!(err.to_string().starts_with("Failed to launch sh"));
    }

    #[test]
    fn test_missing_terminal_is_spawn_failure() {
        let env = HashMap::new();
        let err = ShellSpawner::default()
            .spawn(&SpawnPlan {
                terminal: "ghost-term-4f2a",
                command_line: "ghost-term-4f2a -e 'bash -c ls'",
                env: &env,
                env_mode: EnvMode::Overlay,
            })
            .unwrap_err();

        assert!(err.is_spawn_failure());
        assert!(err.to_string().starts_with("Failed to launch ghost-term-4f2a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_terminal_hidden_by_caller_path_is_spawn_failure() {
        let empty = tempfile::tempdir().unwrap();
        let env = HashMap::from([("PATH".to_string(), empty.path().display().to_string())]);

        let err = ShellSpawner::new("/bin/sh")
            .spawn(&SpawnPlan {
                terminal: "sh",
                command_line: "sh -c true",
                env: &env,
                env_mode: EnvMode::Overlay,
            })
            .unwrap_err();

        assert!(err.is_spawn_failure());
    }
}
