//! Terminal emulator detection and launching
//!
//! - `catalog`: known emulators and their quoting rules
//! - `theme`: color pairs for the custom-colored terminal
//! - `probe`: PATH presence checks and candidate selection
//! - `render`: building the quoted command line
//! - `spawn`: starting the process
//! - `sink`: where diagnostics go
//! - `dispatcher`: ties the above together behind `execute`

pub mod catalog;
pub mod dispatcher;
pub mod probe;
pub mod render;
pub mod sink;
pub mod spawn;
pub mod theme;

pub use catalog::{builtin_terminals, QuotingRule, TerminalSpec};
pub use dispatcher::{TerminalDispatcher, NO_TERMINAL_MESSAGE};
pub use probe::{PathProbe, ProbeKind, ShellProbe, TerminalProbe};
pub use render::{EnvMode, LaunchRequest, QuotingMode, INTERACTIVE_SHELL_MARKER};
pub use sink::{DiagnosticSink, TracingSink};
pub use spawn::{ShellSpawner, SpawnPlan, Spawner};
pub use theme::{ThemeColorSet, ThemeColors, DEFAULT_THEME};
