//! Output sinks for scenario reports.
//!
//! Scenarios never print directly. They write lines to a [ReportSink] passed by the caller,
//! which keeps them testable and leaves the destination to the binary.
use std::cell::RefCell;

/// The severity of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Regular progress and results
    Info,
    /// Failures
    Error,
}

/// A line-oriented output channel
pub trait ReportSink {
    /// Write an informational line
    fn info(&self, line: &str);
    /// Write an error line
    fn error(&self, line: &str);
}

impl<S: ReportSink + ?Sized> ReportSink for &S {
    fn info(&self, line: &str) {
        (**self).info(line)
    }

    fn error(&self, line: &str) {
        (**self).error(line)
    }
}

/// Forwards every line to [tracing], tagged with the scenario name
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    scenario: &'static str,
}

impl TracingSink {
    /// A sink tagging its events with `scenario`
    pub fn new(scenario: &'static str) -> Self {
        TracingSink { scenario }
    }
}

impl ReportSink for TracingSink {
    fn info(&self, line: &str) {
        tracing::info!(scenario = self.scenario, "{}", line);
    }

    fn error(&self, line: &str) {
        tracing::error!(scenario = self.scenario, "{}", line);
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingSink {
    /// An empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written so far, with its level
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }

    /// The text of every line written so far
    pub fn text(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Whether some line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|(_, line)| line.contains(needle))
    }

    /// Position of the first line containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.lines
            .borrow()
            .iter()
            .position(|(_, line)| line.contains(needle))
    }
}

impl ReportSink for RecordingSink {
    fn info(&self, line: &str) {
        self.lines.borrow_mut().push((Level::Info, line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lines.borrow_mut().push((Level::Error, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, RecordingSink, ReportSink};

    #[test]
    fn records_lines_in_order() {
        let sink = RecordingSink::new();
        sink.info("first");
        (&sink).error("second");
        assert_eq!(
            sink.lines(),
            vec![
                (Level::Info, "first".to_string()),
                (Level::Error, "second".to_string())
            ]
        );
        assert_eq!(sink.position("second"), Some(1));
        assert!(!sink.contains("third"));
    }
}
