//! Known terminal emulators
//!
//! The built-in candidate list, in priority order, together with the
//! quoting rule each emulator needs to receive a wrapped command.

use crate::error::{DispatchError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the wrapped command
pub const COMMAND_SLOT: &str = "{command}";

/// Placeholder replaced with the `"fg bg"` color pair
pub const COLORS_SLOT: &str = "{colors}";

/// How an emulator expects the caller's command to be wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotingRule {
    /// `'bash -c <command>'` dropped into the command slot
    SimpleWrap,
    /// Color pair as first argument, `bash -c '<command>'` as second
    CustomColored,
    /// `sh -c "<command>"`, single-quoted, dropped into the command slot
    DoubleNestedShell,
}

impl QuotingRule {
    /// Number of `{command}` and `{colors}` slots the rule fills
    pub fn slot_counts(self) -> (usize, usize) {
        match self {
            Self::SimpleWrap | Self::DoubleNestedShell => (1, 0),
            Self::CustomColored => (1, 1),
        }
    }
}

/// A terminal emulator the dispatcher knows how to drive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSpec {
    /// Name looked up on PATH
    pub executable_name: String,
    /// Arguments following the executable, with `{command}`/`{colors}` slots
    pub invocation_template: String,
    #[serde(default = "default_rule")]
    pub rule: QuotingRule,
}

fn default_rule() -> QuotingRule {
    QuotingRule::SimpleWrap
}

impl TerminalSpec {
    pub fn new(
        executable_name: impl Into<String>,
        invocation_template: impl Into<String>,
        rule: QuotingRule,
    ) -> Self {
        Self {
            executable_name: executable_name.into(),
            invocation_template: invocation_template.into(),
            rule,
        }
    }

    /// Check that the template has exactly the slots its rule consumes
    pub fn validate(&self) -> Result<()> {
        if self.executable_name.trim().is_empty() {
            return Err(DispatchError::validation(
                "Terminal executable name cannot be empty",
            ));
        }

        let (commands, colors) = self.rule.slot_counts();
        let found_commands = self.invocation_template.matches(COMMAND_SLOT).count();
        let found_colors = self.invocation_template.matches(COLORS_SLOT).count();

        if found_commands != commands || found_colors != colors {
            return Err(DispatchError::config(format!(
                "template for {} has {} {} and {} {} slots, {:?} needs {} and {}",
                self.executable_name,
                found_commands,
                COMMAND_SLOT,
                found_colors,
                COLORS_SLOT,
                self.rule,
                commands,
                colors,
            )));
        }

        Ok(())
    }
}

/// Built-in terminal emulators, earlier entries preferred
/// Format: (executable, invocation_template, rule)
const KNOWN_TERMINALS: &[(&str, &str, QuotingRule)] = &[
    // Bundled lightweight terminal, takes the theme colors
    (
        "easyterm.py",
        "-d -p \"{colors}\" -c {command}",
        QuotingRule::CustomColored,
    ),
    ("xterm", "-e {command}", QuotingRule::SimpleWrap),
    // Konsole (KDE)
    ("konsole", "-e {command}", QuotingRule::SimpleWrap),
    // GNOME Terminal
    ("gnome-terminal", "-- {command}", QuotingRule::SimpleWrap),
    // xfce4-terminal runs its -e argument through another shell
    (
        "xfce4-terminal",
        "-e {command}",
        QuotingRule::DoubleNestedShell,
    ),
    ("mate-terminal", "--command {command}", QuotingRule::SimpleWrap),
    ("tilix", "-- {command}", QuotingRule::SimpleWrap),
    ("qterminal", "--execute {command}", QuotingRule::SimpleWrap),
    ("lxterminal", "-e {command}", QuotingRule::SimpleWrap),
];

static BUILTIN_TERMINALS: Lazy<Vec<TerminalSpec>> = Lazy::new(|| {
    KNOWN_TERMINALS
        .iter()
        .map(|(exe, template, rule)| TerminalSpec::new(*exe, *template, *rule))
        .collect()
});

/// The built-in candidate list in priority order
pub fn builtin_terminals() -> &'static [TerminalSpec] {
    &BUILTIN_TERMINALS
}
