use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;

/// Log file writer that creates its file on the first write
///
/// Embedding the serializer must not leave empty log files behind when nothing is
/// ever logged.
#[derive(Debug, Clone)]
pub struct LazyFileWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyFileWriter {
    /// Writer for `path`; nothing is created yet
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Arc::new(Mutex::new(None)),
        }
    }

    /// Target log file
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

/// Handle returned by [`LazyFileWriter`] for one log event
#[derive(Debug)]
pub struct LazyWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyWriter {
    fn open(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl Write for LazyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file_guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Log file mutex poisoned"))?;

        // Reopen if never opened or removed underneath us
        if file_guard.is_none() || !self.path.exists() {
            *file_guard = Some(self.open()?);
        }

        if let Some(Ok(bytes)) = file_guard.as_mut().map(|file| file.write(buf)) {
            return Ok(bytes);
        }

        // Stale handle
        let mut file = self.open()?;
        let bytes = file.write(buf)?;
        *file_guard = Some(file);
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file_guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Log file mutex poisoned"))?;

        if !self.path.exists() {
            *file_guard = None;
            return Ok(());
        }

        match file_guard.as_mut().map(Write::flush) {
            Some(Err(_)) => {
                *file_guard = Some(self.open()?);
                Ok(())
            },
            Some(Ok(())) | None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LazyFileWriter {
    type Writer = LazyWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LazyWriter {
            path: self.path.clone(),
            file: Arc::clone(&self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_created_on_first_write() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let path = dir.path().join("snapshot.log");

        let writer = LazyFileWriter::new(&path);
        let mut handle = writer.make_writer();
        assert!(handle.flush().is_ok());
        assert!(!path.exists());

        assert!(handle.write_all(b"cycle detected\n").is_ok());
        assert!(handle.flush().is_ok());
        assert_eq!(
            std::fs::read_to_string(&path).ok().as_deref(),
            Some("cycle detected\n")
        );
    }

    #[test]
    fn test_recreates_deleted_file() {
        let Ok(dir) = tempfile::tempdir() else { return };
        let path = dir.path().join("snapshot.log");
        let writer = LazyFileWriter::new(&path);

        assert!(writer.make_writer().write_all(b"first\n").is_ok());
        assert!(std::fs::remove_file(&path).is_ok());
        assert!(writer.make_writer().write_all(b"second\n").is_ok());

        assert_eq!(std::fs::read_to_string(&path).ok().as_deref(), Some("second\n"));
    }
}
