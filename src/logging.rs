//! Diagnostic logging.
//!
//! Every line carries the `webpushkit log:` tag and a timestamp, and is emitted
//! through `tracing` with the metadata attached as a JSON field. Browser builds
//! mirror the line to the console since there is no stderr to read.

use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_TAG: &str = "webpushkit log";

#[derive(Debug, Clone, Default)]
pub struct LogEntry {
    pub message: String,
    pub metadata: Map<String, Value>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            metadata: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Info,
    Warn,
    Error,
}

/// Side-effecting logger; a disabled logger drops every entry.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    enabled: bool,
}

impl Default for Logger {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Logger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn log(&self, entry: LogEntry) {
        self.emit(Severity::Info, entry);
    }

    pub fn warn(&self, entry: LogEntry) {
        self.emit(Severity::Warn, entry);
    }

    pub fn error(&self, entry: LogEntry) {
        self.emit(Severity::Error, entry);
    }

    fn emit(&self, severity: Severity, entry: LogEntry) {
        if !self.enabled {
            return;
        }
        let line = format_line(OffsetDateTime::now_utc(), &entry.message);
        let metadata = Value::Object(entry.metadata);
        match severity {
            Severity::Info => tracing::info!(target: "webpushkit", %metadata, "{line}"),
            Severity::Warn => tracing::warn!(target: "webpushkit", %metadata, "{line}"),
            Severity::Error => tracing::error!(target: "webpushkit", %metadata, "{line}"),
        }
        #[cfg(target_arch = "wasm32")]
        console::write(severity, &line, &metadata);
    }
}

fn format_line(now: OffsetDateTime, message: &str) -> String {
    let timestamp = now
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| "unknown time".to_string());
    format!("{LOG_TAG}: [{timestamp}] {message}")
}

#[cfg(target_arch = "wasm32")]
mod console {
    use super::Severity;
    use serde_json::Value;
    use wasm_bindgen::JsValue;

    pub(super) fn write(severity: Severity, line: &str, metadata: &Value) {
        let line = JsValue::from_str(line);
        let metadata = js_sys::JSON::parse(&metadata.to_string()).unwrap_or(JsValue::NULL);
        match severity {
            Severity::Info => web_sys::console::log_2(&line, &metadata),
            Severity::Warn => web_sys::console::warn_2(&line, &metadata),
            Severity::Error => web_sys::console::error_2(&line, &metadata),
        }
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides `default_level`.
/// A subscriber installed earlier wins; this never fails.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
