use std::{
    fmt::{self, Write},
    fs, io,
    path::{Path, PathBuf},
};

/// Creates `dir` and any missing parents, mode `0o755`. An existing directory is fine.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

/// Paths of the three per-level files for a logger name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub info: PathBuf,
    pub error: PathBuf,
    pub debug: PathBuf,
}

impl LogPaths {
    pub fn new<P: AsRef<Path>>(dir: P, name: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            info: dir.join(format!("info_{name}.log")),
            error: dir.join(format!("error_{name}.log")),
            debug: dir.join(format!("debug_{name}.log")),
        }
    }
}

/// Joins values with single spaces and appends a newline.
pub fn sprintln(values: &[&dyn fmt::Display]) -> String {
    let mut line = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{value}");
    }
    line.push('\n');
    line
}
