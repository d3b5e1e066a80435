//! # splitlog
//! Structured logger writing JSON either to stdout or to one log file per level.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! splitlog = "0.1.0"
//! ```
//!
//! ```rust
//! use splitlog::{Field, Logger, SplitLogger};
//!
//! // stdout mode: one JSON stream, info and above
//! let logger = SplitLogger::new("/tmp/unused", "app", true).unwrap();
//! logger.info("server started", &[Field::new("port", 8080)]);
//! logger.debug("not printed", &[]);
//! logger.sync().unwrap();
//! ```
//!
//! ## Logging to files
//! In file mode the directory is created if needed and every level gets its
//! own file: `info_<name>.log`, `error_<name>.log` and `debug_<name>.log`.
//! A file only receives records of exactly its level; warnings and traces
//! are dropped.
//!
//! ```rust
//! use splitlog::{Field, Logger, SplitLogger};
//!
//! let _ = std::fs::remove_dir_all("/tmp/splitlog_doc");
//! let logger = SplitLogger::new("/tmp/splitlog_doc/logs", "api", false)
//!     .expect("Unable to create log files");
//!
//! logger.info("request served", &[Field::new("status", 200)]);
//! logger.error("upstream timed out", &[]);
//! logger.println(&[&"cache", &"warm"]);
//! logger.sync().unwrap();
//!
//! let info = std::fs::read_to_string("/tmp/splitlog_doc/logs/info_api.log").unwrap();
//! assert!(info.contains(r#""msg":"request served""#));
//! assert!(!info.contains("upstream"));
//! let debug = std::fs::read_to_string("/tmp/splitlog_doc/logs/debug_api.log").unwrap();
//! assert!(debug.contains(r#""msg":"cache warm\n""#));
//! ```
//!
//! ## As the `log` backend
//! ```rust
//! use splitlog::{LevelFilter, logger_config};
//!
//! let logger = splitlog::init_global(logger_config().build_stdout(), LevelFilter::Info)
//!     .expect("a logger is already installed");
//! log::info!(user = "bob", attempt = 2; "signed in");
//! logger.sync().unwrap();
//! ```

mod global;
mod utils;

use std::{backtrace::Backtrace, fmt, io, panic::Location, path::Path, sync::Arc};

pub use global::init_global;
pub use log::{Level, LevelFilter};
pub use splitlog_core::{
    Caller, ConsoleEncoder, Encoder, EncoderConfig, ExactLevel, Field, JsonEncoder, LevelEnabler,
    LevelEncoding, LevelFn, LogEntry, LogFile, LogStdout, LogWriter, Sink, Tee, TimeEncoding,
    WriteSyncer,
};
pub use utils::{LogPaths, ensure_dir, sprintln};

/// The logging capability handed to application code.
///
/// The logging methods are `#[track_caller]`, so caller capture reports the
/// call site even through `dyn Logger`.
pub trait Logger: Send + Sync {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]);
    /// Space-joins `values`, appends a newline and logs at debug level.
    #[track_caller]
    fn println(&self, values: &[&dyn fmt::Display]);
    /// Logs the formatted arguments at debug level.
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>);
    /// Flushes every output, returning the first error.
    fn sync(&self) -> io::Result<()>;
}

/// Logger backed by a [`Tee`] of sinks.
pub struct SplitLogger {
    core: Tee,
    caller: bool,
    stacktrace: Option<Level>,
}

impl SplitLogger {
    /// Builds a stdout logger when `use_stdout` is set, otherwise the three
    /// per-level files under `path`, creating the directory first.
    pub fn new<P: AsRef<Path>>(path: P, name: &str, use_stdout: bool) -> io::Result<Self> {
        logger_config().build(path, name, use_stdout)
    }

    pub fn from_core(core: Tee) -> Self {
        Self {
            core,
            caller: false,
            stacktrace: None,
        }
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        let mut entry = LogEntry::new(level, msg).with_fields(fields.to_vec());
        if self.caller {
            entry = entry.with_caller(Caller::from_location(Location::caller()));
        }
        self.dispatch(entry);
    }

    fn dispatch(&self, mut entry: LogEntry) {
        if let Some(min) = self.stacktrace
            && entry.level <= min
        {
            entry = entry.with_stack(Backtrace::force_capture().to_string());
        }
        self.core.write(&Arc::new(entry));
    }

    pub fn sync(&self) -> io::Result<()> {
        self.core.sync()
    }
}

impl Logger for SplitLogger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, msg, fields);
    }

    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, msg, fields);
    }

    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, msg, fields);
    }

    #[track_caller]
    fn println(&self, values: &[&dyn fmt::Display]) {
        if self.enabled(Level::Debug) {
            self.log(Level::Debug, &sprintln(values), &[]);
        }
    }

    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Debug) {
            self.log(Level::Debug, &args.to_string(), &[]);
        }
    }

    fn sync(&self) -> io::Result<()> {
        SplitLogger::sync(self)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn info(&self, _: &str, _: &[Field]) {}
    fn error(&self, _: &str, _: &[Field]) {}
    fn debug(&self, _: &str, _: &[Field]) {}
    fn println(&self, _: &[&dyn fmt::Display]) {}
    fn printf(&self, _: fmt::Arguments<'_>) {}
    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Console,
}

/// Builder for configuring a [`SplitLogger`].
///
/// Defaults to the production preset: JSON, info and above, caller on every
/// entry, stacktrace on errors.
pub struct ConfigBuilder {
    level: LevelFilter,
    encoding: Encoding,
    encoder: EncoderConfig,
    caller: bool,
    stacktrace: Option<Level>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            encoding: Encoding::Json,
            encoder: EncoderConfig::production(),
            caller: true,
            stacktrace: Some(Level::Error),
        }
    }
}

impl ConfigBuilder {
    fn encoder(&self) -> Box<dyn Encoder> {
        match self.encoding {
            Encoding::Json => Box::new(JsonEncoder::new(self.encoder.clone())),
            Encoding::Console => Box::new(ConsoleEncoder::new(self.encoder.clone())),
        }
    }

    fn finish(self, core: Tee) -> SplitLogger {
        SplitLogger {
            core,
            caller: self.caller,
            stacktrace: self.stacktrace,
        }
    }

    /// Sets the minimum level of stream loggers. File loggers ignore it.
    pub fn with_level(self, level: LevelFilter) -> Self {
        Self { level, ..self }
    }
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        Self { encoding, ..self }
    }
    pub fn with_encoder_config(self, encoder: EncoderConfig) -> Self {
        Self { encoder, ..self }
    }
    /// Dynamically set the caller flag.
    pub fn with_caller(self, yes: bool) -> Self {
        Self {
            caller: yes,
            ..self
        }
    }
    pub fn no_caller(self) -> Self {
        self.with_caller(false)
    }
    /// Attaches a stacktrace to entries at `level` or more severe; `None` disables it.
    pub fn with_stacktrace(self, level: Option<Level>) -> Self {
        Self {
            stacktrace: level,
            ..self
        }
    }

    /// One stream on stdout at the configured minimum level.
    pub fn build_stdout(self) -> SplitLogger {
        self.build_with_writer(LogStdout)
    }

    /// One stream on `writer` at the configured minimum level.
    pub fn build_with_writer<W>(self, writer: W) -> SplitLogger
    where
        W: LogWriter + Send + 'static,
    {
        let sink = Sink::new(writer, self.encoder(), self.level);
        self.finish(Tee::new(vec![sink]))
    }

    /// Three files under `dir`, each receiving exactly one level.
    pub fn build_files<P: AsRef<Path>>(self, dir: P, name: &str) -> io::Result<SplitLogger> {
        ensure_dir(&dir)?;
        let paths = LogPaths::new(&dir, name);
        // all three must open before any writer thread starts; an early
        // return closes whatever was already opened
        let info = LogFile::open(&paths.info)?;
        let error = LogFile::open(&paths.error)?;
        let debug = LogFile::open(&paths.debug)?;
        let core = Tee::new(vec![
            Sink::new(info, self.encoder(), ExactLevel(Level::Info)),
            Sink::new(error, self.encoder(), ExactLevel(Level::Error)),
            Sink::new(debug, self.encoder(), ExactLevel(Level::Debug)),
        ]);
        Ok(self.finish(core))
    }

    /// Stdout with the production preset, or the per-level files with caller
    /// and stacktrace turned off.
    pub fn build<P: AsRef<Path>>(
        self,
        dir: P,
        name: &str,
        use_stdout: bool,
    ) -> io::Result<SplitLogger> {
        if use_stdout {
            Ok(self.build_stdout())
        } else {
            self.no_caller().with_stacktrace(None).build_files(dir, name)
        }
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::Write,
        path::PathBuf,
        sync::{Arc, Mutex},
    };

    use serde_json::Value;

    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from(format!("/tmp/splitlog_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn read_records(path: PathBuf) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn messages(records: &[Value]) -> Vec<&str> {
        records.iter().map(|r| r["msg"].as_str().unwrap()).collect()
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn records(&self) -> Vec<Value> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_file_mode_creates_directory() {
        let dir = test_dir("creates_dir").join("nested/logs");
        let logger = SplitLogger::new(&dir, "svc", false).unwrap();
        assert!(dir.is_dir());
        let paths = LogPaths::new(&dir, "svc");
        assert!(paths.info.is_file());
        assert!(paths.error.is_file());
        assert!(paths.debug.is_file());
        logger.sync().unwrap();
    }

    #[test]
    fn test_file_mode_routes_exact_levels() {
        let dir = test_dir("exact_levels");
        let logger = SplitLogger::new(&dir, "svc", false).unwrap();
        logger.info("info record", &[Field::new("k", "v")]);
        logger.error("error record", &[]);
        logger.debug("debug record", &[]);
        logger.sync().unwrap();

        let paths = LogPaths::new(&dir, "svc");
        let info = read_records(paths.info);
        let error = read_records(paths.error);
        let debug = read_records(paths.debug);
        assert_eq!(messages(&info), ["info record"]);
        assert_eq!(info[0]["level"], "info");
        assert_eq!(info[0]["k"], "v");
        assert_eq!(messages(&error), ["error record"]);
        assert_eq!(error[0]["level"], "error");
        assert_eq!(messages(&debug), ["debug record"]);
        assert_eq!(debug[0]["level"], "debug");
    }

    #[test]
    fn test_file_mode_drops_warn_and_trace() {
        let dir = test_dir("drops_warn");
        let logger = SplitLogger::new(&dir, "svc", false).unwrap();
        assert!(!logger.enabled(Level::Warn));
        assert!(!logger.enabled(Level::Trace));
        logger.log(Level::Warn, "warned", &[]);
        logger.log(Level::Trace, "traced", &[]);
        logger.sync().unwrap();
        let paths = LogPaths::new(&dir, "svc");
        for path in [paths.info, paths.error, paths.debug] {
            assert_eq!(fs::read_to_string(path).unwrap(), "");
        }
    }

    #[test]
    fn test_file_mode_has_no_caller_or_stacktrace() {
        let dir = test_dir("plain_core");
        let logger = SplitLogger::new(&dir, "svc", false).unwrap();
        logger.error("boom", &[]);
        logger.sync().unwrap();
        let error = read_records(LogPaths::new(&dir, "svc").error);
        assert!(error[0].get("caller").is_none());
        assert!(error[0].get("stacktrace").is_none());
        assert!(error[0]["ts"].is_f64());
    }

    #[test]
    fn test_file_mode_appends() {
        let dir = test_dir("appends");
        for run in ["first", "second"] {
            let logger = SplitLogger::new(&dir, "svc", false).unwrap();
            logger.info(run, &[]);
        }
        let info = read_records(LogPaths::new(&dir, "svc").info);
        assert_eq!(messages(&info), ["first", "second"]);
    }

    #[test]
    fn test_two_names_share_directory() {
        let dir = test_dir("two_names");
        let a = SplitLogger::new(&dir, "alpha", false).unwrap();
        let b = SplitLogger::new(&dir, "beta", false).unwrap();
        a.info("from alpha", &[]);
        b.info("from beta", &[]);
        a.error("alpha failed", &[]);
        b.debug("beta details", &[]);
        a.sync().unwrap();
        b.sync().unwrap();

        assert_eq!(fs::read_dir(&dir).unwrap().count(), 6);
        let alpha = LogPaths::new(&dir, "alpha");
        let beta = LogPaths::new(&dir, "beta");
        assert_eq!(messages(&read_records(alpha.info)), ["from alpha"]);
        assert_eq!(messages(&read_records(beta.info)), ["from beta"]);
        assert_eq!(messages(&read_records(alpha.error)), ["alpha failed"]);
        assert!(read_records(beta.error).is_empty());
        assert!(read_records(alpha.debug).is_empty());
        assert_eq!(messages(&read_records(beta.debug)), ["beta details"]);
    }

    #[test]
    fn test_println_and_printf_log_at_debug() {
        let dir = test_dir("print_debug");
        let logger = SplitLogger::new(&dir, "svc", false).unwrap();
        logger.println(&[&"a", &"b"]);
        logger.printf(format_args!("{}% done, {}", 50, "%d"));
        logger.sync().unwrap();

        let paths = LogPaths::new(&dir, "svc");
        let debug = read_records(paths.debug);
        assert_eq!(messages(&debug), ["a b\n", "50% done, %d"]);
        assert!(read_records(paths.info).is_empty());
    }

    #[test]
    fn test_file_mode_fails_when_dir_is_a_file() {
        let base = test_dir("dir_is_file");
        fs::create_dir_all(&base).unwrap();
        let file = base.join("taken");
        fs::write(&file, "").unwrap();
        assert!(SplitLogger::new(&file, "svc", false).is_err());
        assert!(SplitLogger::new(file.join("below"), "svc", false).is_err());
    }

    #[test]
    fn test_file_mode_fails_when_a_log_path_is_a_directory() {
        let dir = test_dir("log_path_is_dir");
        let paths = LogPaths::new(&dir, "svc");
        fs::create_dir_all(&paths.debug).unwrap();
        let err = SplitLogger::new(&dir, "svc", false).err().unwrap();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
        // the two files opened before the failure were created and closed
        assert!(paths.info.is_file());
        assert!(paths.error.is_file());
    }

    #[test]
    fn test_stream_mode_filters_below_info() {
        let out = Capture::default();
        let logger = logger_config().build_with_writer(WriteSyncer(out.clone()));
        logger.debug("hidden", &[]);
        logger.println(&[&"hidden", &"too"]);
        logger.info("shown", &[]);
        logger.log(Level::Warn, "warned", &[]);
        logger.error("failed", &[]);
        logger.sync().unwrap();

        let records = out.records();
        assert_eq!(messages(&records), ["shown", "warned", "failed"]);
        assert_eq!(records[2]["level"], "error");
    }

    #[test]
    fn test_stream_mode_caller_and_stacktrace() {
        let out = Capture::default();
        let logger = logger_config().build_with_writer(WriteSyncer(out.clone()));
        logger.info("with caller", &[]);
        logger.error("with stack", &[Field::new("code", 7)]);
        logger.sync().unwrap();

        let records = out.records();
        assert_eq!(records[0]["caller"], format!("src/lib.rs:{}", line!() - 5));
        assert!(records[0].get("stacktrace").is_none());
        assert!(records[1]["caller"].as_str().unwrap().starts_with("src/lib.rs:"));
        assert!(records[1]["stacktrace"].is_string());
        let keys: Vec<_> = records[1].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["level", "ts", "caller", "msg", "code", "stacktrace"]);
    }

    #[test]
    fn test_stream_mode_custom_level_and_console() {
        let out = Capture::default();
        let logger = logger_config()
            .with_level(LevelFilter::Debug)
            .with_encoding(Encoding::Console)
            .with_encoder_config(EncoderConfig {
                level: LevelEncoding::Capital,
                ..EncoderConfig::development()
            })
            .no_caller()
            .with_stacktrace(None)
            .build_with_writer(WriteSyncer(out.clone()));
        logger.printf(format_args!("x = {}", 1));
        logger.sync().unwrap();
        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains(" DEBUG] x = 1"));
    }

    #[test]
    fn test_stdout_mode_touches_no_files() {
        let dir = test_dir("stdout_mode");
        let logger = SplitLogger::new(&dir, "svc", true).unwrap();
        logger.info("to stdout", &[]);
        logger.sync().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_empty_core() {
        let logger = SplitLogger::from_core(Tee::default());
        logger.info("nowhere", &[]);
        assert!(logger.sync().is_ok());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_sync_reports_unwritable_file() {
        let sink = Sink::new(
            LogFile::open("/dev/full").unwrap(),
            Box::new(JsonEncoder::default()),
            ExactLevel(Level::Info),
        );
        let logger = SplitLogger::from_core(Tee::new(vec![sink]));
        logger.info("no room", &[]);
        assert!(logger.sync().is_err());
    }

    #[test]
    fn test_logger_trait_objects() {
        let dir = test_dir("trait_objects");
        let loggers: Vec<Box<dyn Logger>> = vec![
            Box::new(NopLogger),
            Box::new(SplitLogger::new(&dir, "svc", false).unwrap()),
        ];
        for logger in &loggers {
            logger.info("hello", &[]);
            logger.println(&[&1, &2]);
            logger.sync().unwrap();
        }
        let debug = read_records(LogPaths::new(&dir, "svc").debug);
        assert_eq!(messages(&debug), ["1 2\n"]);
    }

    #[test]
    fn test_trait_object_reports_call_site() {
        let out = Capture::default();
        let logger: Box<dyn Logger> = Box::new(
            logger_config()
                .with_level(LevelFilter::Debug)
                .with_stacktrace(None)
                .build_with_writer(WriteSyncer(out.clone())),
        );
        let line = line!();
        logger.info("via dyn", &[]);
        logger.error("via dyn", &[]);
        logger.debug("via dyn", &[]);
        logger.println(&[&"via", &"dyn"]);
        logger.printf(format_args!("via {}", "dyn"));
        logger.sync().unwrap();

        let callers: Vec<_> = out
            .records()
            .iter()
            .map(|r| r["caller"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<_> = (1..=5).map(|n| format!("src/lib.rs:{}", line + n)).collect();
        assert_eq!(callers, expected);
    }

    #[test]
    fn test_concurrent_logging() {
        let dir = test_dir("concurrent");
        let logger = Arc::new(SplitLogger::new(&dir, "svc", false).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        logger.info("tick", &[Field::new("thread", i), Field::new("n", j)]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        logger.sync().unwrap();
        let info = read_records(LogPaths::new(&dir, "svc").info);
        assert_eq!(info.len(), 400);
        for i in 0..8 {
            let ns: Vec<_> = info
                .iter()
                .filter(|r| r["thread"] == i)
                .map(|r| r["n"].as_i64().unwrap())
                .collect();
            assert_eq!(ns, (0..50).collect::<Vec<_>>());
        }
    }
}
