//! Diagnostic output for the dispatcher
//!
//! The dispatcher never logs through a global directly. It is handed a sink
//! at construction, which by default forwards to `tracing`.

use tracing::Level;

/// Receiver for dispatcher diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "termdispatch", "{}", message),
            Level::WARN => tracing::warn!(target: "termdispatch", "{}", message),
            Level::INFO => tracing::info!(target: "termdispatch", "{}", message),
            Level::DEBUG => tracing::debug!(target: "termdispatch", "{}", message),
            _ => tracing::trace!(target: "termdispatch", "{}", message),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sink that keeps every message for assertions
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) entries: Mutex<Vec<(Level, String)>>,
    }

    impl RecordingSink {
        pub(crate) fn at(&self, level: Level) -> Vec<String> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn log(&self, level: Level, message: &str) {
            self.entries
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }

    #[test]
    fn test_tracing_sink_accepts_every_level() {
        crate::logging::init_test();
        let sink = TracingSink;
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            sink.log(level, "sink message");
        }
    }

    #[test]
    fn test_recording_sink_filters_by_level() {
        let sink = RecordingSink::default();
        sink.log(Level::WARN, "first");
        sink.log(Level::DEBUG, "second");
        sink.log(Level::WARN, "third");
        assert_eq!(sink.at(Level::WARN), vec!["first", "third"]);
        assert_eq!(sink.at(Level::DEBUG), vec!["second"]);
    }
}
