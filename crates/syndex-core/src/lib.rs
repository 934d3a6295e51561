//! syndex core library
//!
//! This crate provides the document model behind syndex, a bookmark list
//! kept as an RSS 2.0 feed on disk.
//!
//! # Architecture
//!
//! Every operation is read-modify-write: load the feed from disk (or
//! scaffold a new one), edit it in memory, write it back. There is no
//! long-lived state between operations.
//!
//! # Quick Start
//!
//! ```text
//! let store = DocumentStore::new("bookmarks.xml");
//! let mut doc = store.load()?;
//!
//! editor::insert_bookmark(&mut doc, "https://example.com", Some("Example"), None);
//! store.save(&doc)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Loading and atomically saving the feed file
//! - `editor`: Insert and edit operations on a loaded document
//! - `document`: The in-memory feed
//! - `models`: Field values and bookmark snapshots
//! - `xml`: Owned XML element tree
//! - `config`: Application configuration

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod models;
pub mod store;
pub mod xml;

pub use config::Config;
pub use document::{Document, DocumentError};
pub use editor::{EditTarget, ItemField, UnknownField};
pub use error::{SyndexError, SyndexResult};
pub use models::{Bookmark, FieldValue};
pub use store::DocumentStore;
