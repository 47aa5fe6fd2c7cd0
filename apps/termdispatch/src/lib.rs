//! termdispatch - run a command visibly in whichever terminal emulator is installed
//!
//! ```no_run
//! use termdispatch_lib::terminal::{LaunchRequest, TerminalDispatcher};
//!
//! let dispatcher = TerminalDispatcher::new();
//! let launched = dispatcher
//!     .execute(&LaunchRequest::new("htop").with_theme("debug"))
//!     .expect("terminal failed to start");
//! if !launched {
//!     eprintln!("No supported terminal installed");
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

pub use config::DispatcherConfig;
pub use error::{DispatchError, Result};
pub use terminal::{LaunchRequest, TerminalDispatcher};
