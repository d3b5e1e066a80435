use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Destination for encoded log lines.
pub trait LogWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    /// Pushes buffered lines down to the underlying medium.
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Buffered, append-only log file.
pub struct LogFile {
    file: BufWriter<File>,
    path: PathBuf,
}

impl LogFile {
    /// Opens `path` for appending, creating it with mode `0o644` if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut options = File::options();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(&path)?;
        Ok(Self {
            file: BufWriter::new(file),
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogWriter for LogFile {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.get_ref().sync_data()
    }
}

#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Adapts any `io::Write` into a [`LogWriter`].
#[derive(Debug)]
pub struct WriteSyncer<W>(pub W);

impl<W: Write> LogWriter for WriteSyncer<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.0, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
