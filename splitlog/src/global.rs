use log::{
    LevelFilter, Log, Metadata, Record, SetLoggerError,
    kv::{self, Key, Source, Value as KvValue, VisitSource},
};
use serde_json::{Number, Value};
use splitlog_core::{Caller, Field, LogEntry};

use crate::SplitLogger;

/// Collects `log` key-values as structured fields, keeping numbers and
/// booleans typed.
struct FieldCollector(Vec<Field>);

impl<'kvs> VisitSource<'kvs> for FieldCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: KvValue<'kvs>) -> Result<(), kv::Error> {
        self.0.push(Field::new(key.as_str(), to_json(&value)));
        Ok(())
    }
}

fn to_json(value: &KvValue<'_>) -> Value {
    if let Some(b) = value.to_bool() {
        Value::Bool(b)
    } else if let Some(n) = value.to_i64() {
        Value::from(n)
    } else if let Some(n) = value.to_u64() {
        Value::from(n)
    } else if let Some(n) = value.to_f64() {
        Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string()))
    } else {
        Value::String(value.to_string())
    }
}

impl Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.enabled(metadata.level())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.level()) {
            return;
        }
        let mut fields = FieldCollector(Vec::new());
        let _ = record.key_values().visit(&mut fields);
        let mut entry =
            LogEntry::new(record.level(), record.args().to_string()).with_fields(fields.0);
        if self.caller
            && let (Some(file), Some(line)) = (record.file(), record.line())
        {
            entry = entry.with_caller(Caller::new(file, line));
        }
        self.dispatch(entry);
    }

    fn flush(&self) {
        let _ = self.sync();
    }
}

/// Installs `logger` as the process-wide `log` backend.
///
/// The returned handle lives for the rest of the process; call
/// [`SplitLogger::sync`] on it before exiting so buffered lines reach disk.
pub fn init_global(
    logger: SplitLogger,
    max_level: LevelFilter,
) -> Result<&'static SplitLogger, SetLoggerError> {
    let logger: &'static SplitLogger = Box::leak(Box::new(logger));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(logger)
}
