//! Command-line rendering
//!
//! Turns a launch request into the single shell line that starts the
//! selected terminal. Each [`QuotingRule`] has its own wrapping function.
//!
//! [`QuotingMode::Compatible`] keeps the established quoting byte-for-byte,
//! which does not escape quotes inside the caller's command: a `'` in the
//! command closes the outer quote early and the rest is seen by the shell.
//! [`QuotingMode::Escaped`] quotes every nesting level with `shell_words`
//! so the command reaches the inner shell unchanged. The theme colors are
//! quoted the same way.

use super::catalog::{QuotingRule, TerminalSpec, COLORS_SLOT, COMMAND_SLOT};
use super::theme::{ThemeColors, DEFAULT_THEME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable that swaps the caller's command for a bare `bash`
/// in the custom-colored terminal
pub const INTERACTIVE_SHELL_MARKER: &str = "ENABLE_BASH";

/// Quoting strategy for the wrapped command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotingMode {
    #[default]
    Compatible,
    Escaped,
}

/// How the request's environment is applied to the child
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvMode {
    /// Caller's variables on top of the inherited environment
    #[default]
    Overlay,
    /// Caller's variables are the complete environment
    Replace,
}

/// A single "run this in a terminal" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub command: String,
    pub env: HashMap<String, String>,
    pub env_mode: EnvMode,
    pub theme: String,
}

impl LaunchRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            env: HashMap::new(),
            env_mode: EnvMode::Overlay,
            theme: DEFAULT_THEME.to_string(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Use the request's variables as the whole child environment
    pub fn replacing_env(mut self) -> Self {
        self.env_mode = EnvMode::Replace;
        self
    }

    /// Whether `key` is set in the environment the child will see
    pub fn sees_env_var(&self, key: &str) -> bool {
        self.env.contains_key(key)
            || (self.env_mode == EnvMode::Overlay && std::env::var_os(key).is_some())
    }
}

/// Everything a rendering rule needs, already resolved
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub command: &'a str,
    pub colors: &'a ThemeColors,
    /// Replace the command with a bare interactive shell where supported
    pub interactive_shell: bool,
    pub quoting: QuotingMode,
}

/// Render the full command line for `spec`
pub fn render(spec: &TerminalSpec, ctx: &RenderContext<'_>) -> String {
    let wrapped = match spec.rule {
        QuotingRule::SimpleWrap => simple_wrap(ctx),
        QuotingRule::CustomColored => custom_colored(ctx),
        QuotingRule::DoubleNestedShell => double_nested_shell(ctx),
    };

    let args = match ctx.quoting {
        QuotingMode::Compatible => {
            fill_slots(&spec.invocation_template, &ctx.colors.as_arg(), &wrapped)
        }
        QuotingMode::Escaped => {
            // The quoted pair replaces any double quotes the template put around the slot
            let quoted_slot = format!("\"{}\"", COLORS_SLOT);
            let template = spec.invocation_template.replace(&quoted_slot, COLORS_SLOT);
            let colors = shell_words::quote(&ctx.colors.as_arg()).into_owned();
            fill_slots(&template, &colors, &wrapped)
        }
    };

    let program = match ctx.quoting {
        QuotingMode::Compatible => spec.executable_name.clone(),
        QuotingMode::Escaped => shell_words::quote(&spec.executable_name).into_owned(),
    };

    format!("{} {}", program, args)
}

/// Substitute both slots in one left-to-right pass, so text inserted for
/// one slot is never scanned for the other
fn fill_slots(template: &str, colors: &str, command: &str) -> String {
    let mut out = String::with_capacity(template.len() + colors.len() + command.len());
    let mut rest = template;

    loop {
        let next = [(COMMAND_SLOT, command), (COLORS_SLOT, colors)]
            .into_iter()
            .filter_map(|(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, slot, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + slot.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// `'bash -c <command>'`
fn simple_wrap(ctx: &RenderContext<'_>) -> String {
    match ctx.quoting {
        QuotingMode::Compatible => format!("'bash -c {}'", ctx.command),
        QuotingMode::Escaped => {
            let inner = format!("bash -c {}", shell_words::quote(ctx.command));
            shell_words::quote(&inner).into_owned()
        }
    }
}

/// `bash -c '<command>'`, or `bash` alone when the marker is set
fn custom_colored(ctx: &RenderContext<'_>) -> String {
    if ctx.interactive_shell {
        return "bash".to_string();
    }
    match ctx.quoting {
        QuotingMode::Compatible => format!("bash -c '{}'", ctx.command),
        QuotingMode::Escaped => format!("bash -c {}", shell_words::quote(ctx.command)),
    }
}

/// `'sh -c "<command>"'`
fn double_nested_shell(ctx: &RenderContext<'_>) -> String {
    match ctx.quoting {
        QuotingMode::Compatible => format!("'sh -c \"{}\"'", ctx.command),
        QuotingMode::Escaped => {
            let inner = format!("sh -c {}", shell_words::quote(ctx.command));
            shell_words::quote(&inner).into_owned()
        }
    }
}
