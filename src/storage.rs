//! Whole-document JSON persistence for the course collection.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Course;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle on the single JSON document holding every course.
///
/// The document is read and replaced as a whole on every mutation; there is
/// no incremental update path.
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default document location under the user's home directory.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".studyposts").join("db.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole collection. A missing, unreadable, or corrupt document
    /// yields an empty collection; the failure is logged, not surfaced.
    pub fn read(&self) -> Vec<Course> {
        if !self.path.exists() {
            return Vec::new();
        }
        match self.try_read() {
            Ok(courses) => courses,
            Err(err) => {
                tracing::error!("error reading database: {err}");
                Vec::new()
            }
        }
    }

    fn try_read(&self) -> Result<Vec<Course>, StorageError> {
        let mut contents = String::new();
        File::open(&self.path)?.read_to_string(&mut contents)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the whole document through a temporary file and an atomic
    /// rename, so a crash mid-write cannot leave a truncated document.
    pub fn write(&self, courses: &[Course]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp = self.path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        let content = serde_json::to_string_pretty(courses)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Post;

    fn course(id: &str, title: &str) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            posts: vec![Post {
                id: format!("{id}-p1"),
                title: "p1".to_string(),
                image_url: "data:image/png;base64,AAAA".to_string(),
                description: "first".to_string(),
            }],
        }
    }

    #[test]
    fn missing_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("db.json"));
        assert!(db.read().is_empty());
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{not json").unwrap();
        let db = Database::new(&path);
        assert!(db.read().is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("db.json"));
        let courses = vec![course("c1", "Biology"), course("c2", "Chemistry")];
        db.write(&courses).unwrap();
        assert_eq!(db.read(), courses);
    }

    #[test]
    fn rewriting_what_was_read_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("db.json"));
        db.write(&[course("c1", "Biology")]).unwrap();

        let first = db.read();
        db.write(&first).unwrap();
        assert_eq!(db.read(), first);
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("nested").join("db.json"));
        db.write(&[]).unwrap();
        assert!(db.path().exists());
    }
}
