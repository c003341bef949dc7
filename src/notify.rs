//! Transient user-facing notices.
//!
//! Mutation outcomes surface to the user through a notification sink rather
//! than the log: the sink is injected so embedders can route notices into
//! their own toast/banner machinery and tests can substitute a capturing
//! stub. Only two message classes exist, success and failure.

use chrono::{DateTime, Utc};
use log::*;

/// Severity classes for notices.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Success,
    Failure,
}

/// A single transient message for display to the user.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    /// Return a success notice stamped with the current time.
    ///
    pub fn success(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Success,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Return a failure notice stamped with the current time.
    ///
    pub fn failure(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Failure,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Format a notice into a string for display
///
pub fn format_notice(notice: &Notice) -> String {
    let timestamp = notice.at.format("%Y-%m-%d %H:%M:%S%.3f");
    let severity_str = match notice.severity {
        Severity::Success => "SUCCESS",
        Severity::Failure => "FAILURE",
    };
    format!("{} {} {}", timestamp, severity_str, notice.message)
}

/// Receives notices for display.
///
/// Called from the network worker thread, so implementations must be `Send`.
pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);
}

/// Forwards notices to the `log` facade. The default sink when the embedder
/// does not supply one.
///
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Success => info!("{}", notice.message),
            Severity::Failure => error!("{}", notice.message),
        }
    }
}

/// Buffers notices in memory. Used as the capturing test double, and usable
/// by embedders that drain notices once per frame.
///
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Vec<Notice>,
}

impl MemoryNotifier {
    pub fn new() -> MemoryNotifier {
        MemoryNotifier::default()
    }

    /// Notices received so far, oldest first.
    ///
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return all buffered notices.
    ///
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
