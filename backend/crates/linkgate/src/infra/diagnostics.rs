//! Diagnostic Sinks
//!
//! Best-effort records of each attempt. Write failures are dropped so that
//! diagnostics can never change a login decision.
//!
//! The file sink appends one short line per event with a synchronous write;
//! an attempt records at most three events.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};

use crate::domain::ports::{DiagnosticEvent, DiagnosticSink};

/// Appends one timestamped line per event to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        // Refuse symlinks at open(2); the default path lives in /tmp
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options
                .mode(0o600)
                .custom_flags(libc::O_NOFOLLOW | libc::O_CLOEXEC);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl DiagnosticSink for FileSink {
    fn record(&self, event: &DiagnosticEvent) {
        let line = format!(
            "{} {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            event
        );
        if let Err(e) = self.append(&line) {
            tracing::debug!(path = %self.path.display(), error = %e, "Diagnostic write dropped");
        }
    }
}

/// Emits events as tracing records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &DiagnosticEvent) {
        tracing::info!(
            target: "linkgate::diagnostic",
            attempt = %event.attempt,
            username = %event.username,
            "{}",
            event.kind.message()
        );
    }
}
