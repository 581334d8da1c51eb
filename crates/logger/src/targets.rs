use std::any::Any;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A destination for formatted log lines. Implementations append the line
/// terminator themselves and must never propagate write failures: a sink
/// that cannot write reports to stderr and drops the line.
pub trait LogTarget {
    fn log(&mut self, message: &str);
    fn as_any(&self) -> &dyn Any;
}

pub struct NoopLogTarget;

impl LogTarget for NoopLogTarget {
    fn log(&mut self, _message: &str) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ConsoleLogTarget;

impl LogTarget for ConsoleLogTarget {
    fn log(&mut self, message: &str) {
        if let Err(err) = writeln!(io::stdout(), "{}", message) {
            eprintln!("logfile: failed to write to stdout: {}", err);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct FileLogTarget {
    file: File,
    path: PathBuf,
}

impl FileLogTarget {
    /// Opens `path` for appending, creating it if missing. The parent
    /// directory must already exist.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;

        Ok(FileLogTarget {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogTarget for FileLogTarget {
    fn log(&mut self, message: &str) {
        if let Err(err) = writeln!(self.file, "{}", message) {
            eprintln!(
                "logfile: failed to write to {}: {}",
                self.path.display(),
                err
            );
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
