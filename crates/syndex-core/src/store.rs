//! Document store
//!
//! Binds one feed file and moves [`Document`]s between it and memory.
//! Every operation reads the file fresh; nothing is cached between calls.
//!
//! ## Usage
//!
//! ```ignore
//! let store = DocumentStore::new("bookmarks.xml");
//! let mut doc = store.load()?;  // Scaffolds a new feed if the file is missing
//!
//! editor::insert_bookmark(&mut doc, "https://example.com", None, None);
//! store.save(&doc)?;
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{Document, DocumentError};
use crate::error::{SyndexError, SyndexResult};

/// File-backed storage for one feed
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the feed file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the feed
    ///
    /// A missing file yields a new empty feed. A channel without a title is
    /// repaired in memory; the file itself is only touched by [`save`].
    ///
    /// [`save`]: DocumentStore::save
    pub fn load(&self) -> SyndexResult<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No feed at {:?}, starting a new one", self.path);
                return Ok(Document::new());
            }
            Err(e) => return Err(SyndexError::io(&self.path, e)),
        };

        let content = String::from_utf8(bytes).map_err(|e| SyndexError::MalformedXml {
            path: self.path.clone(),
            details: e.to_string(),
        })?;

        let doc = Document::from_xml(&content).map_err(|e| match e {
            DocumentError::Xml(details) => SyndexError::MalformedXml {
                path: self.path.clone(),
                details: details.to_string(),
            },
            DocumentError::MissingChannel => SyndexError::InvalidSchema {
                path: self.path.clone(),
            },
        })?;

        debug!("Loaded {} item(s) from {:?}", doc.item_count(), self.path);
        Ok(doc)
    }

    /// Write the feed, replacing the file atomically
    pub fn save(&self, doc: &Document) -> SyndexResult<()> {
        let content = self.render(doc)?;
        atomic_write(&self.path, content.as_bytes())?;
        debug!("Saved {} item(s) to {:?}", doc.item_count(), self.path);
        Ok(())
    }

    /// Serialized form of the feed, identical to what [`save`] writes
    ///
    /// [`save`]: DocumentStore::save
    pub fn render(&self, doc: &Document) -> SyndexResult<String> {
        doc.to_pretty_xml().map_err(SyndexError::Serialize)
    }

    /// Load and save once, so the file exists and is well-formatted
    pub fn normalize(&self) -> SyndexResult<Document> {
        let doc = self.load()?;
        self.save(&doc)?;
        Ok(doc)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> SyndexResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SyndexError::io(parent, e))?;
        }
    }

    let temp_path = temp_path_for(path);

    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(SyndexError::io(&temp_path, e));
    }

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        SyndexError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })
}

/// Hidden sibling used as the write target before the rename
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feed".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
