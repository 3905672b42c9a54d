//! Terminal notifier.
//!
//! Notices print to stderr so command output stays pipeable. The
//! terminal cannot retract a printed line, so "dismiss" drops the
//! pending notice slot instead: only the most recent notice per
//! attempt is ever shown.

use std::sync::Mutex;

use devmart_client::notify::{NoticeLevel, Notifier};

pub struct ConsoleNotifier {
    pending: Mutex<Option<String>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let prefix = match level {
            NoticeLevel::Info => "·",
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
        };
        eprintln!("{prefix} {message}");
        *self.pending.lock().expect("notifier lock poisoned") = Some(message.to_string());
    }

    fn dismiss(&self) {
        self.pending.lock().expect("notifier lock poisoned").take();
    }
}
