//! Data models for syndex
//!
//! Typed views over the RSS elements: the two-state [`FieldValue`] used by
//! every text field, and [`Bookmark`], a read-only snapshot of one item.

use serde::{Serialize, Serializer};

use crate::xml::Element;

/// Element and attribute names of the persisted feed
pub mod tags {
    pub const RSS: &str = "rss";
    pub const CHANNEL: &str = "channel";
    pub const ITEM: &str = "item";

    pub const TITLE: &str = "title";
    pub const LINK: &str = "link";
    pub const PUB_DATE: &str = "pubDate";
    pub const DESCRIPTION: &str = "description";

    pub const VERSION: &str = "version";
    pub const RSS_VERSION: &str = "2.0";

    /// Marker attribute for a field with no value
    pub const UNSPECIFIED: &str = "unspecified";
    pub const UNSPECIFIED_VALUE: &str = "true";
}

/// A text field that is either set or explicitly unspecified
///
/// In the feed, `Present` is an element with text and no marker, and
/// `Unspecified` is an element with `unspecified="true"` and no text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    Present(String),
    #[default]
    Unspecified,
}

impl FieldValue {
    /// Map user input to a field value; absent or empty means unspecified
    pub fn from_input(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => FieldValue::Present(v.to_string()),
            _ => FieldValue::Unspecified,
        }
    }

    /// Read the value of an element
    pub fn read(element: &Element) -> Self {
        let text = element.text();
        if text.is_empty() {
            FieldValue::Unspecified
        } else {
            FieldValue::Present(text)
        }
    }

    /// Write this value into an element, replacing its text and marker
    pub fn write(&self, element: &mut Element) {
        match self {
            FieldValue::Present(text) => {
                element.set_text(text.as_str());
                element.remove_attribute(tags::UNSPECIFIED);
            }
            FieldValue::Unspecified => {
                element.clear_text();
                element.set_attribute(tags::UNSPECIFIED, tags::UNSPECIFIED_VALUE);
            }
        }
    }

    /// Build a fresh element holding this value
    pub fn to_element(&self, name: &str) -> Element {
        let mut element = Element::new(name);
        self.write(&mut element);
        element
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Present(text) => Some(text),
            FieldValue::Unspecified => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, FieldValue::Unspecified)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_deref().serialize(serializer)
    }
}

/// Snapshot of one bookmark item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub title: FieldValue,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub description: FieldValue,
}

impl Bookmark {
    /// Read a bookmark from an `<item>` element
    ///
    /// Missing children read as unspecified (or empty for `link` and `pubDate`).
    pub fn from_element(item: &Element) -> Self {
        let field = |name: &str| {
            item.child(name)
                .map(FieldValue::read)
                .unwrap_or(FieldValue::Unspecified)
        };
        let text = |name: &str| item.child(name).map(Element::text).unwrap_or_default();

        Self {
            title: field(tags::TITLE),
            link: text(tags::LINK),
            pub_date: text(tags::PUB_DATE),
            description: field(tags::DESCRIPTION),
        }
    }

    /// Build the `<item>` element for this bookmark
    pub fn to_element(&self) -> Element {
        Element::new(tags::ITEM)
            .with_child(self.title.to_element(tags::TITLE))
            .with_child(Element::new(tags::LINK).with_text(self.link.as_str()))
            .with_child(Element::new(tags::PUB_DATE).with_text(self.pub_date.as_str()))
            .with_child(self.description.to_element(tags::DESCRIPTION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input() {
        assert_eq!(FieldValue::from_input(None), FieldValue::Unspecified);
        assert_eq!(FieldValue::from_input(Some("")), FieldValue::Unspecified);
        assert_eq!(
            FieldValue::from_input(Some("Rust")),
            FieldValue::Present("Rust".to_string())
        );
    }

    #[test]
    fn test_write_present_clears_marker() {
        let mut el = FieldValue::Unspecified.to_element(tags::TITLE);
        assert_eq!(el.attribute(tags::UNSPECIFIED), Some("true"));

        FieldValue::Present("Hello".to_string()).write(&mut el);
        assert_eq!(el.text(), "Hello");
        assert_eq!(el.attribute(tags::UNSPECIFIED), None);
    }

    #[test]
    fn test_write_unspecified_clears_text() {
        let mut el = Element::new(tags::TITLE).with_text("Hello");
        FieldValue::Unspecified.write(&mut el);
        assert_eq!(el.text(), "");
        assert_eq!(el.attribute(tags::UNSPECIFIED), Some("true"));
        assert!(FieldValue::read(&el).is_unspecified());
    }

    #[test]
    fn test_bookmark_element_roundtrip() {
        let bookmark = Bookmark {
            title: FieldValue::Present("Example".to_string()),
            link: "https://example.com".to_string(),
            pub_date: "Mon, 01 Jan 2024 12:00:00 +0000".to_string(),
            description: FieldValue::Unspecified,
        };

        let element = bookmark.to_element();
        let names: Vec<_> = element.elements().map(Element::name).collect();
        assert_eq!(names, vec!["title", "link", "pubDate", "description"]);
        assert_eq!(Bookmark::from_element(&element), bookmark);
    }

    #[test]
    fn test_bookmark_from_sparse_item() {
        let item = Element::new(tags::ITEM)
            .with_child(Element::new(tags::LINK).with_text("https://example.com"));
        let bookmark = Bookmark::from_element(&item);

        assert_eq!(bookmark.link, "https://example.com");
        assert!(bookmark.title.is_unspecified());
        assert!(bookmark.description.is_unspecified());
        assert_eq!(bookmark.pub_date, "");
    }
}
