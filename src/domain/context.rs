//! Host context a track observes, and the console it reports to.

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// Owner of the tracks' surroundings (a document, a player session, ...).
///
/// Tracks hold it weakly and only call into it while it reports itself live.
pub trait HostContext {
    fn is_live(&self) -> bool {
        true
    }

    fn add_console_message(&self, severity: Severity, message: String);
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub emitted_at: DateTime<Local>,
}

/// Keeps every console message so it can be shown later.
///
/// Messages are logged as well when they arrive.
#[derive(Debug)]
pub struct ConsoleBuffer {
    live: Cell<bool>,
    messages: RefCell<Vec<Diagnostic>>,
}

impl Default for ConsoleBuffer {
    fn default() -> Self {
        Self {
            live: Cell::new(true),
            messages: RefCell::new(Vec::new()),
        }
    }
}

impl ConsoleBuffer {
    /// marks the context as torn down, tracks stop reporting to it
    pub fn shut_down(&self) {
        self.live.set(false);
    }

    pub fn messages(&self) -> Vec<Diagnostic> {
        self.messages.borrow().clone()
    }

    pub fn take_messages(&self) -> Vec<Diagnostic> {
        self.messages.take()
    }
}

impl HostContext for ConsoleBuffer {
    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn add_console_message(&self, severity: Severity, message: String) {
        log::log!(severity.into(), "{message}");
        self.messages.borrow_mut().push(Diagnostic {
            severity,
            message,
            emitted_at: Local::now(),
        });
    }
}
