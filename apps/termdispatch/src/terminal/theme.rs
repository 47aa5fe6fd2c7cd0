//! Color themes for the custom-colored terminal

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the theme every set contains
pub const DEFAULT_THEME: &str = "default";

/// Built-in themes
/// Format: (name, foreground, background)
const BUILTIN_THEMES: &[(&str, &str, &str)] = &[
    ("default", "#00ffff", "#2b2d2e"),
    ("debug", "#ff9800", "#2e2c2b"),
];

/// A foreground/background pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub foreground: String,
    pub background: String,
}

impl ThemeColors {
    pub fn new(foreground: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            foreground: foreground.into(),
            background: background.into(),
        }
    }

    /// The pair as the single `"fg bg"` argument the terminal expects
    pub fn as_arg(&self) -> String {
        format!("{} {}", self.foreground, self.background)
    }
}

/// Named color pairs, always containing [`DEFAULT_THEME`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColorSet {
    default: ThemeColors,
    named: BTreeMap<String, ThemeColors>,
}

impl Default for ThemeColorSet {
    fn default() -> Self {
        let mut set = Self {
            default: ThemeColors::new("", ""),
            named: BTreeMap::new(),
        };
        for (name, fg, bg) in BUILTIN_THEMES {
            set.insert(*name, ThemeColors::new(*fg, *bg));
        }
        set
    }
}

impl ThemeColorSet {
    /// Add or replace a theme. Replacing `default` is allowed, removing it is not.
    pub fn insert(&mut self, name: impl Into<String>, colors: ThemeColors) {
        let name = name.into();
        if name == DEFAULT_THEME {
            self.default = colors;
        } else {
            self.named.insert(name, colors);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        name == DEFAULT_THEME || self.named.contains_key(name)
    }

    /// Look up a theme, falling back to `default` for unknown names
    pub fn resolve(&self, name: &str) -> &ThemeColors {
        self.named.get(name).unwrap_or(&self.default)
    }

    /// Theme names, `default` first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_THEME).chain(self.named.keys().map(String::as_str))
    }
}

impl Extend<(String, ThemeColors)> for ThemeColorSet {
    fn extend<I: IntoIterator<Item = (String, ThemeColors)>>(&mut self, iter: I) {
        for (name, colors) in iter {
            self.insert(name, colors);
        }
    }
}
