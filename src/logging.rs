//! Directory-creating file log sink.
//!
//! A standard append/write file sink for `tracing-subscriber`, with one
//! extra guarantee: the target file's directory tree is created before the
//! file is opened, so hosts can point logs at paths that do not exist yet.
//! Directory creation is idempotent; only filesystem errors other than
//! "already exists" propagate.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// How the log file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Append to an existing file (the default)
    #[default]
    Append,

    /// Truncate the file on open
    Truncate,
}

/// File log sink that creates missing parent directories on construction.
///
/// Implements [`MakeWriter`], so it plugs straight into a fmt subscriber:
///
/// ```rust,ignore
/// let appender = DirFileAppender::new("logs/run/patchbay.log")?;
/// tracing_subscriber::fmt().with_writer(appender).init();
/// ```
///
/// With `delay_open`, the file itself is only created on the first write;
/// the directory tree is created eagerly either way.
#[derive(Debug)]
pub struct DirFileAppender {
    path: PathBuf,
    mode: OpenMode,
    file: Mutex<Option<File>>,
}

impl DirFileAppender {
    /// Create an appender for `path`, opening the file immediately in
    /// append mode.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_options(path, OpenMode::Append, false)
    }

    /// Create an appender with an explicit open mode and delayed-open flag.
    ///
    /// Missing parent directories are always created here; pre-existing
    /// ones are not an error. Constructing two appenders for the same path
    /// is fine (append mode interleaves writes at the OS level).
    pub fn with_options(
        path: impl AsRef<Path>,
        mode: OpenMode,
        delay_open: bool,
    ) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = if delay_open {
            None
        } else {
            Some(Self::open(&path, mode)?)
        };

        Ok(Self {
            path,
            mode,
            file: Mutex::new(file),
        })
    }

    /// The target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path, mode: OpenMode) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        match mode {
            OpenMode::Append => options.append(true),
            OpenMode::Truncate => options.truncate(true),
        };
        options.open(path)
    }

    /// Acquire the sink's writer. Writers serialize through an internal
    /// lock, so log lines from concurrent threads do not interleave
    /// mid-record.
    pub fn writer(&self) -> FileWriter<'_> {
        FileWriter {
            guard: self.file.lock().unwrap_or_else(PoisonError::into_inner),
            path: &self.path,
            mode: self.mode,
        }
    }
}

impl<'a> MakeWriter<'a> for DirFileAppender {
    type Writer = FileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// Exclusive write handle to the underlying log file.
///
/// Opens the file on first use when the appender was constructed with
/// `delay_open`.
pub struct FileWriter<'a> {
    guard: MutexGuard<'a, Option<File>>,
    path: &'a Path,
    mode: OpenMode,
}

impl Write for FileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = match &mut *self.guard {
            Some(file) => file,
            slot => slot.insert(DirFileAppender::open(self.path, self.mode)?),
        };
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.guard {
            Some(file) => file.flush(),
            // nothing written yet on a delayed appender
            None => Ok(()),
        }
    }
}
