//! Optional log sink used by the gate.
//!
//! The gate emits at most one message per request, at one of three levels.
//! When no logger is configured the gate holds a [`NoopLogger`], so the
//! decision code never checks for presence.

/// Log capability with the three levels the gate needs.
pub trait GateLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl GateLogger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards gate messages to `tracing` under the `jwt_gate` target.
///
/// Filter with e.g. `RUST_LOG=info,jwt_gate=warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl GateLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "jwt_gate", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "jwt_gate", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "jwt_gate", "{message}");
    }
}

/// Severity of a recorded gate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Keeps every message in memory. Useful for asserting on the log contract.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: std::sync::Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages, oldest first.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, level: LogLevel, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((level, message.to_owned()));
    }
}

impl GateLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
