use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use chrono::Utc;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded, unbounded};

use crate::{Encoder, LogEntry, config::SPLITLOG_CONFIG, log_writer::LogWriter};

/// Messages understood by a writer thread.
#[derive(Debug)]
pub enum LogMessage {
    /// An entry to encode and write.
    Entry(Arc<LogEntry>),
    /// Flush and sync the writer, then report the outcome on the channel.
    Sync(Sender<io::Result<()>>),
    /// Flush and stop.
    Shutdown,
}

/// Handle to a writer thread. Dropping it flushes and joins the thread.
pub struct LogSender {
    sender: Sender<LogMessage>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for LogSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "log writer thread has shut down")
}

impl LogSender {
    pub fn new(sender: Sender<LogMessage>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    pub fn send(&self, entry: Arc<LogEntry>) {
        // a stopped thread means the sink is closed; the entry is dropped
        let _ = self.sender.send(LogMessage::Entry(entry));
    }

    /// Blocks until everything queued before this call is written and synced.
    pub fn sync(&self) -> io::Result<()> {
        let (reply, outcome) = bounded(1);
        self.sender
            .send(LogMessage::Sync(reply))
            .map_err(|_| closed())?;
        outcome.recv().map_err(|_| closed())?
    }

    pub fn shutdown(&self) {
        let mut guard = self
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            // Send shutdown message - ignore error if channel is already closed
            let _ = self.sender.send(LogMessage::Shutdown);
            if handle.join().is_err() {
                eprintln!("{} log writer thread panicked", Utc::now());
            }
        }
    }
}

/// Internal write failures go to stderr; there is nowhere else to put them.
fn report_write_error(err: &io::Error) {
    eprintln!("{} write error: {err}", Utc::now());
}

/// Keeps the first failure until the next sync picks it up.
fn record(failure: &mut Option<io::Error>, result: io::Result<()>) {
    if let Err(err) = result {
        report_write_error(&err);
        failure.get_or_insert(err);
    }
}

pub fn spawn_log_thread<W>(mut writer: W, encoder: Box<dyn Encoder>) -> LogSender
where
    W: LogWriter + Send + 'static,
{
    let (sender, receiver) = unbounded::<LogMessage>();
    let handler = std::thread::spawn(move || {
        let batch_size = SPLITLOG_CONFIG.BATCH_SIZE.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let flush_interval = Duration::from_millis(SPLITLOG_CONFIG.FLUSH_INTERVAL_MS);
        let mut last_flush = Instant::now();
        let mut failure = None;
        loop {
            let timeout = flush_interval
                .saturating_sub(last_flush.elapsed())
                .max(Duration::from_millis(1));

            match receiver.recv_timeout(timeout) {
                Ok(msg) => {
                    batch.push(msg);
                    while batch.len() < batch_size {
                        match receiver.try_recv() {
                            Ok(msg) => batch.push(msg),
                            Err(_) => break,
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if last_flush.elapsed() >= flush_interval {
                        record(&mut failure, writer.flush());
                        last_flush = Instant::now();
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    record(&mut failure, writer.flush());
                    break;
                }
            }

            let mut should_shutdown = false;
            for msg in batch.drain(..) {
                match msg {
                    LogMessage::Entry(entry) => {
                        let line = encoder.encode(&entry);
                        record(&mut failure, writer.write_line(&line));
                    }
                    LogMessage::Sync(reply) => {
                        let synced = writer.sync();
                        last_flush = Instant::now();
                        let outcome = match failure.take() {
                            Some(err) => Err(err),
                            None => synced,
                        };
                        let _ = reply.send(outcome);
                    }
                    LogMessage::Shutdown => {
                        should_shutdown = true;
                        break;
                    }
                }
            }

            if should_shutdown || last_flush.elapsed() >= flush_interval {
                record(&mut failure, writer.flush());
                last_flush = Instant::now();
            }

            if should_shutdown {
                break;
            }
        }
    });
    LogSender::new(sender, handler)
}
