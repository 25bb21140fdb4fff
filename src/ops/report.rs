//! User-facing reports from the operators.
//!
//! Operators surface conditions such as a missing UV channel through a
//! [`Reporter`] callback, leaving it to the caller to print them, show them
//! in a status bar, or collect them.
//!
//! # Example
//!
//! ```
//! use cellsnap::ops::{Reporter, Severity};
//!
//! let reporter = Reporter::new(|severity, message| {
//!     eprintln!("{}: {}", severity, message);
//! });
//! reporter.report(Severity::Warning, "No selected UVs found");
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

/// How serious a report is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Processing of a mesh (or the whole invocation) was aborted.
    Error,
    /// Something was skipped; processing continued.
    Warning,
    /// Informational.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        })
    }
}

/// One collected report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity of the report.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Shared list filled by [`Reporter::collecting`].
pub type ReportLog = Arc<Mutex<Vec<Report>>>;

/// A callback receiving operator reports.
pub struct Reporter {
    callback: Box<dyn Fn(Severity, &str) + Send + Sync>,
}

impl Reporter {
    /// Create a reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Severity, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Create a reporter that stores every report in a shared list.
    pub fn collecting() -> (Self, ReportLog) {
        let log: ReportLog = Arc::default();
        let sink = Arc::clone(&log);
        let reporter = Self::new(move |severity, message| {
            if let Ok(mut reports) = sink.lock() {
                reports.push(Report {
                    severity,
                    message: message.to_string(),
                });
            }
        });
        (reporter, log)
    }

    /// Send a report.
    #[inline]
    pub fn report(&self, severity: Severity, message: &str) {
        (self.callback)(severity, message);
    }

    /// Create a reporter that discards all reports.
    pub fn none() -> Self {
        Self::new(|_, _| {})
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting() {
        let (reporter, log) = Reporter::collecting();
        reporter.report(Severity::Error, "UV channel 'ch3' not found");
        reporter.report(Severity::Info, "done");

        let reports = log.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].severity, Severity::Error);
        assert_eq!(reports[1].message, "done");
    }

    #[test]
    fn test_none_discards() {
        Reporter::default().report(Severity::Warning, "ignored");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert!(Severity::Error < Severity::Info);
    }
}
