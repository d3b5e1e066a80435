//! # splitlog-core
//! Core building blocks shared by splitlog loggers: level enablers, encoders,
//! writer threads and the sinks that route entries to them.

mod config;
mod encoder;
mod entry;
mod field;
mod level;
mod log_writer;
mod sink;
mod utils;

pub use config::{SPLITLOG_CONFIG, SplitlogConfig};
pub use encoder::{
    ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder, LevelEncoding, TimeEncoding,
};
pub use entry::{Caller, LogEntry};
pub use field::Field;
pub use level::{ExactLevel, LevelEnabler, LevelFn};
pub use log_writer::{LogFile, LogStdout, LogWriter, WriteSyncer};
pub use sink::{Sink, Tee};
pub use utils::{LogMessage, LogSender, spawn_log_thread};
