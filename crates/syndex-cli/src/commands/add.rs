//! Add command handler

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use syndex_core::{editor, DocumentStore};

use crate::output::Output;
use crate::reachability::check_url;

/// Options for adding a bookmark
pub struct AddOptions<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub message: Option<&'a str>,
    /// Reachability check timeout, `None` to skip the check
    pub check_timeout: Option<Duration>,
}

/// Add a bookmark to the feed at `path`
pub async fn add(path: &Path, options: AddOptions<'_>, output: &Output) -> Result<()> {
    if let Some(timeout) = options.check_timeout {
        check_url(options.url, timeout).await?;
    }

    let store = DocumentStore::new(path);
    let mut doc = store.load()?;

    let bookmark = editor::insert_bookmark(&mut doc, options.url, options.title, options.message);
    store
        .save(&doc)
        .with_context(|| format!("Failed to save bookmark to {}", path.display()))?;
    info!("Feed {:?} now has {} item(s)", path, doc.item_count());

    output.success(&format!("Added bookmark to {}: {}", path.display(), options.url));
    output.print_bookmark(&bookmark);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use syndex_core::FieldValue;
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[tokio::test]
    async fn test_add_without_check() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.xml");

        let options = AddOptions {
            url: "https://example.com",
            title: Some("Example"),
            message: Some("worth reading"),
            check_timeout: None,
        };
        add(&path, options, &quiet()).await.unwrap();

        let bookmarks = DocumentStore::new(&path).load().unwrap().bookmarks();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].title, FieldValue::Present("Example".to_string()));
        assert_eq!(
            bookmarks[0].description,
            FieldValue::Present("worth reading".to_string())
        );
    }

    #[tokio::test]
    async fn test_add_unreachable_leaves_feed_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.xml");

        let options = AddOptions {
            url: "not a url",
            title: None,
            message: None,
            check_timeout: Some(Duration::from_secs(1)),
        };
        let err = add(&path, options, &quiet()).await.unwrap_err();
        assert!(err.to_string().contains("not a valid or accessible URL"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_add_to_malformed_feed_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.xml");
        std::fs::write(&path, "<rss>").unwrap();

        let options = AddOptions {
            url: "https://example.com",
            title: None,
            message: None,
            check_timeout: None,
        };
        let err = add(&path, options, &quiet()).await.unwrap_err();
        assert!(err.to_string().contains("not a valid XML file"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<rss>");
    }
}
