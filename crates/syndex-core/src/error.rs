//! Error handling for document operations
//!
//! Typed errors for loading, validating and saving the bookmark feed.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::xml::XmlError;

/// Errors that can occur while loading or saving a feed
#[derive(Error, Debug)]
pub enum SyndexError {
    /// The file exists but is not well-formed XML
    #[error("{path} is not a valid XML file: {details}")]
    MalformedXml { path: PathBuf, details: String },

    /// The file parses but has no `<channel>`
    #[error("{path} is not a valid RSS file: missing <channel>")]
    InvalidSchema { path: PathBuf },

    /// Failed to read or write the feed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not replace the feed
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The in-memory document could not be serialized
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] XmlError),
}

impl SyndexError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyndexError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from the feed's content rather than the filesystem
    pub fn is_corrupt_document(&self) -> bool {
        matches!(
            self,
            SyndexError::MalformedXml { .. } | SyndexError::InvalidSchema { .. }
        )
    }
}

/// Result type for document operations
pub type SyndexResult<T> = Result<T, SyndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = SyndexError::MalformedXml {
            path: PathBuf::from("/feeds/links.xml"),
            details: "unclosed element <rss>".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("/feeds/links.xml"));
        assert!(msg.contains("not a valid XML file"));
        assert!(msg.contains("unclosed element <rss>"));
        assert!(err.is_corrupt_document());
    }

    #[test]
    fn test_invalid_schema_display() {
        let err = SyndexError::InvalidSchema {
            path: PathBuf::from("links.xml"),
        };
        assert_eq!(
            err.to_string(),
            "links.xml is not a valid RSS file: missing <channel>"
        );
    }

    #[test]
    fn test_io_is_not_corrupt() {
        let err = SyndexError::io(
            "links.xml",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_corrupt_document());
        assert!(err.to_string().contains("denied"));
    }
}
