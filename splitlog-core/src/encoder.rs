use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use log::Level;
use serde_json::{Map, Number, Value};

use crate::LogEntry;

/// How the entry timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Floating-point seconds since the Unix epoch.
    Epoch,
    /// Floating-point milliseconds since the Unix epoch.
    EpochMillis,
    /// `2024-05-01T12:00:00.000Z`
    Iso8601,
    /// RFC 3339 with nanosecond precision.
    Rfc3339Nano,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    Lowercase,
    Capital,
    CapitalColor,
}

/// Key names and value formats shared by the encoders. An empty key omits
/// that element from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub time: TimeEncoding,
    pub level: LevelEncoding,
}

impl EncoderConfig {
    pub fn production() -> Self {
        Self {
            message_key: "msg".into(),
            level_key: "level".into(),
            time_key: "ts".into(),
            caller_key: "caller".into(),
            stacktrace_key: "stacktrace".into(),
            time: TimeEncoding::Epoch,
            level: LevelEncoding::Lowercase,
        }
    }

    pub fn development() -> Self {
        Self {
            message_key: "M".into(),
            level_key: "L".into(),
            time_key: "T".into(),
            caller_key: "C".into(),
            stacktrace_key: "S".into(),
            time: TimeEncoding::Iso8601,
            level: LevelEncoding::CapitalColor,
        }
    }

    fn level_text(&self, level: Level) -> String {
        let lower = match level {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        match self.level {
            LevelEncoding::Lowercase => lower.to_string(),
            LevelEncoding::Capital => lower.to_uppercase(),
            LevelEncoding::CapitalColor => {
                let upper = lower.to_uppercase();
                let colored = match level {
                    Level::Error => upper.red(),
                    Level::Warn => upper.yellow(),
                    Level::Info => upper.green(),
                    Level::Debug => upper.blue(),
                    Level::Trace => upper.purple(),
                };
                colored.to_string()
            }
        }
    }

    fn time_value(&self, time: &DateTime<Utc>) -> Value {
        let seconds = |divisor: f64| {
            let value = time.timestamp_micros() as f64 / divisor;
            Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(value.to_string()))
        };
        match self.time {
            TimeEncoding::Epoch => seconds(1_000_000.0),
            TimeEncoding::EpochMillis => seconds(1_000.0),
            TimeEncoding::Iso8601 => {
                Value::String(time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
            TimeEncoding::Rfc3339Nano => {
                Value::String(time.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Turns an entry into a single output line, without the trailing newline.
pub trait Encoder: Send {
    fn encode(&self, entry: &LogEntry) -> String;
}

/// One JSON object per entry: level, time, caller, message, the entry
/// fields in call order, then the stacktrace.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &LogEntry) -> String {
        let config = &self.config;
        let mut object = Map::new();
        if !config.level_key.is_empty() {
            object.insert(
                config.level_key.clone(),
                Value::String(config.level_text(entry.level)),
            );
        }
        if !config.time_key.is_empty() {
            object.insert(config.time_key.clone(), config.time_value(&entry.time));
        }
        if let Some(caller) = &entry.caller
            && !config.caller_key.is_empty()
        {
            object.insert(config.caller_key.clone(), Value::String(caller.short()));
        }
        if !config.message_key.is_empty() {
            object.insert(
                config.message_key.clone(),
                Value::String(entry.message.clone()),
            );
        }
        for field in &entry.fields {
            object.insert(field.key.clone(), field.value.clone());
        }
        if let Some(stack) = &entry.stack
            && !config.stacktrace_key.is_empty()
        {
            object.insert(config.stacktrace_key.clone(), Value::String(stack.clone()));
        }
        Value::Object(object).to_string()
    }
}

/// Human readable `[time LEVEL caller] message {fields}` lines.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::development())
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &LogEntry) -> String {
        let config = &self.config;
        let mut header = Vec::with_capacity(3);
        if !config.time_key.is_empty() {
            match config.time_value(&entry.time) {
                Value::String(time) => header.push(time),
                other => header.push(other.to_string()),
            }
        }
        if !config.level_key.is_empty() {
            header.push(config.level_text(entry.level));
        }
        if let Some(caller) = &entry.caller
            && !config.caller_key.is_empty()
        {
            header.push(caller.short());
        }
        let mut line = format!("[{}] {}", header.join(" "), entry.message);
        if !entry.fields.is_empty() {
            let fields: Map<String, Value> = entry
                .fields
                .iter()
                .map(|f| (f.key.clone(), f.value.clone()))
                .collect();
            line.push(' ');
            line.push_str(&Value::Object(fields).to_string());
        }
        if let Some(stack) = &entry.stack
            && !config.stacktrace_key.is_empty()
        {
            line.push('\n');
            line.push_str(stack);
        }
        line
    }
}
