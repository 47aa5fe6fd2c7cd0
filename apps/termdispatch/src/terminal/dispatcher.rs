//! Terminal dispatcher
//!
//! Entry point for "run this command visibly in a terminal". Every call
//! detects afresh, so a terminal installed or removed between calls is
//! picked up without any invalidation. Nothing is shared mutably between
//! calls, and one dispatcher can serve many threads.

use super::catalog::{builtin_terminals, TerminalSpec};
use super::probe::{self, PathProbe, TerminalProbe};
use super::render::{self, LaunchRequest, QuotingMode, RenderContext, INTERACTIVE_SHELL_MARKER};
use super::sink::{DiagnosticSink, TracingSink};
use super::spawn::{ShellSpawner, SpawnPlan, Spawner};
use super::theme::ThemeColorSet;
use crate::config::DispatcherConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::Level;

/// Message emitted when no candidate is installed
pub const NO_TERMINAL_MESSAGE: &str = "Terminal not supported.";

/// Detects a terminal emulator and launches commands in it
pub struct TerminalDispatcher {
    candidates: Vec<TerminalSpec>,
    themes: ThemeColorSet,
    quoting: QuotingMode,
    marker: String,
    probe: Arc<dyn TerminalProbe>,
    spawner: Arc<dyn Spawner>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for TerminalDispatcher {
    fn default() -> Self {
        Self {
            candidates: builtin_terminals().to_vec(),
            themes: ThemeColorSet::default(),
            quoting: QuotingMode::default(),
            marker: INTERACTIVE_SHELL_MARKER.to_string(),
            probe: Arc::new(PathProbe::new()),
            spawner: Arc::new(ShellSpawner::default()),
            sink: Arc::new(TracingSink),
        }
    }
}

impl TerminalDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dispatcher from validated configuration
    pub fn from_config(config: &DispatcherConfig) -> Result<Self> {
        config.validate()?;

        let mut candidates = config.extra_terminals.clone();
        candidates.extend(builtin_terminals().iter().cloned());

        let mut themes = ThemeColorSet::default();
        themes.extend(config.themes.clone());

        Ok(Self {
            candidates,
            themes,
            quoting: config.quoting,
            marker: config.interactive_shell_marker.clone(),
            probe: config.probe.build(&config.shell),
            spawner: Arc::new(ShellSpawner::new(config.shell.clone())),
            sink: Arc::new(TracingSink),
        })
    }

    pub fn with_candidates(mut self, candidates: Vec<TerminalSpec>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_themes(mut self, themes: ThemeColorSet) -> Self {
        self.themes = themes;
        self
    }

    pub fn with_quoting(mut self, quoting: QuotingMode) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn TerminalProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn candidates(&self) -> &[TerminalSpec] {
        &self.candidates
    }

    pub fn themes(&self) -> &ThemeColorSet {
        &self.themes
    }

    /// First installed candidate
    pub fn detect(&self) -> Option<&TerminalSpec> {
        probe::detect(self.probe.as_ref(), &self.candidates)
    }

    /// Every installed candidate, in priority order
    pub fn detect_all(&self) -> Vec<&TerminalSpec> {
        probe::detect_all(self.probe.as_ref(), &self.candidates)
    }

    /// Render the command line `request` would launch with `spec`, without spawning
    pub fn render_for(&self, spec: &TerminalSpec, request: &LaunchRequest) -> String {
        let ctx = RenderContext {
            command: &request.command,
            colors: self.themes.resolve(&request.theme),
            interactive_shell: request.sees_env_var(&self.marker),
            quoting: self.quoting,
        };
        render::render(spec, &ctx)
    }

    /// Launch `request` in the first available terminal
    ///
    /// Returns `Ok(false)` when no supported terminal is installed, after
    /// logging one warning. Returns `Ok(true)` once the terminal process has
    /// started, whatever later happens inside it. Spawn failures are errors.
    pub fn execute(&self, request: &LaunchRequest) -> Result<bool> {
        let _span = crate::operation_span!("execute", theme = %request.theme).entered();

        let Some(terminal) = self.detect() else {
            self.sink.log(Level::WARN, NO_TERMINAL_MESSAGE);
            return Ok(false);
        };

        let command_line = self.render_for(terminal, request);
        self.sink.log(
            Level::DEBUG,
            &format!("Launching {}: {}", terminal.executable_name, command_line),
        );

        self.spawner.spawn(&SpawnPlan {
            terminal: &terminal.executable_name,
            command_line: &command_line,
            env: &request.env,
            env_mode: request.env_mode,
        })?;

        Ok(true)
    }
}

impl std::fmt::Debug for TerminalDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDispatcher")
            .field("candidates", &self.candidates)
            .field("themes", &self.themes)
            .field("quoting", &self.quoting)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}
