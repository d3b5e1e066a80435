use std::{io, sync::Arc};

use log::Level;

use crate::{Encoder, LevelEnabler, LogEntry, LogSender, LogWriter, spawn_log_thread};

/// A writer thread paired with the level policy that gates it.
pub struct Sink {
    enabler: Box<dyn LevelEnabler>,
    sender: LogSender,
}

impl Sink {
    pub fn new<W, L>(writer: W, encoder: Box<dyn Encoder>, enabler: L) -> Self
    where
        W: LogWriter + Send + 'static,
        L: LevelEnabler + 'static,
    {
        Self {
            enabler: Box::new(enabler),
            sender: spawn_log_thread(writer, encoder),
        }
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.enabler.enabled(level)
    }

    /// Queues the entry if this sink accepts its level.
    pub fn write(&self, entry: &Arc<LogEntry>) {
        if self.enabled(entry.level) {
            self.sender.send(Arc::clone(entry));
        }
    }

    pub fn sync(&self) -> io::Result<()> {
        self.sender.sync()
    }
}

/// Fans every entry out to each sink whose enabler accepts it.
#[derive(Default)]
pub struct Tee {
    sinks: Vec<Sink>,
}

impl Tee {
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self { sinks }
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    pub fn write(&self, entry: &Arc<LogEntry>) {
        for sink in &self.sinks {
            sink.write(entry);
        }
    }

    /// Syncs every sink, returning the first error.
    pub fn sync(&self) -> io::Result<()> {
        let mut first = Ok(());
        for sink in &self.sinks {
            if let Err(err) = sink.sync()
                && first.is_ok()
            {
                first = Err(err);
            }
        }
        first
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
