//! Re-openable line sources.
//!
//! Every section extraction re-opens its source and scans it from the first
//! line, so a source is something that can hand out a fresh reader on demand
//! rather than a reader itself.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{MeshError, Result};

/// A source of text lines that can be opened any number of times.
pub trait LineSource {
    /// Open a new reader positioned at the start of the source.
    fn open(&self) -> Result<Box<dyn BufRead + '_>>;

    /// Human readable description, used in log messages.
    fn describe(&self) -> String;
}

/// A mesh file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a file source, failing with [`MeshError::FileNotFound`] if the
    /// path does not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MeshError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        // The file may have been removed since construction.
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MeshError::FileNotFound {
                path: self.path.clone(),
            },
            _ => MeshError::Io(e),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Mesh text held in memory.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    /// Wrap the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl LineSource for TextSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.mail");
        match FileSource::new(&missing) {
            Err(MeshError::FileNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_file_reopens_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_lines.mail");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let source = FileSource::new(&path).unwrap();
        for _ in 0..2 {
            let mut reader = source.open().unwrap();
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            assert_eq!(line.trim(), "first");
        }
    }

    #[test]
    fn test_file_removed_after_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mail");
        File::create(&path).unwrap();
        let source = FileSource::new(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(source.open(), Err(MeshError::FileNotFound { .. })));
    }

    #[test]
    fn test_text_source() {
        let source = TextSource::new("a\nb\n");
        let lines: Vec<String> = source.open().unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a", "b"]);
        assert!(source.describe().contains("4 bytes"));
    }
}
