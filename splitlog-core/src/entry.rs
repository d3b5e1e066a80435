use std::{fmt, panic::Location};

use chrono::{DateTime, Utc};
use log::Level;

use crate::Field;

/// Source position of a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// `dir/file.rs:line`, keeping only the last directory of the path.
    pub fn short(&self) -> String {
        let file = self.file.replace('\\', "/");
        let mut parts = file.rsplitn(3, '/');
        let name = parts.next().unwrap_or_default();
        match parts.next().filter(|dir| !dir.is_empty()) {
            Some(dir) => format!("{dir}/{name}:{}", self.line),
            None => format!("{name}:{}", self.line),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// A single log record, timestamped when it is created.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: String,
    pub fields: Vec<Field>,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Utc::now(),
            message: message.into(),
            fields: Vec::new(),
            caller: None,
            stack: None,
        }
    }

    pub fn with_fields(self, fields: Vec<Field>) -> Self {
        Self { fields, ..self }
    }

    pub fn with_caller(self, caller: Caller) -> Self {
        Self {
            caller: Some(caller),
            ..self
        }
    }

    pub fn with_stack(self, stack: String) -> Self {
        Self {
            stack: Some(stack),
            ..self
        }
    }
}

#[test]
fn test_caller_short() {
    assert_eq!(
        Caller::new("/home/me/app/src/server.rs", 42).short(),
        "src/server.rs:42"
    );
    assert_eq!(Caller::new("main.rs", 7).short(), "main.rs:7");
    assert_eq!(Caller::new("/main.rs", 9).short(), "main.rs:9");
    assert_eq!(Caller::new("src//lib.rs", 5).short(), "lib.rs:5");
    assert_eq!(Caller::new("src\\lib.rs", 3).to_string(), "src/lib.rs:3");
}
