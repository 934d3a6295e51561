//! Bookmark editing
//!
//! Pure operations over an in-memory [`Document`]. Nothing here touches
//! the filesystem; callers persist through [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::store::DocumentStore

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::document::Document;
use crate::models::{tags, Bookmark, FieldValue};
use crate::xml::Node;

/// `pubDate` layout. The offset is a literal: times are local wall-clock.
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Field name that selects the channel title in an edit request
pub const CHANNEL_TITLE_FIELD: &str = "channel_title";

/// An editable child of an item
///
/// The four fields syndex writes have their own cases; any other child
/// (`guid`, `category`, ...) is addressed by element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Link,
    PubDate,
    Description,
    Other(String),
}

impl ItemField {
    /// Element name of the field inside `<item>`
    pub fn tag(&self) -> &str {
        match self {
            ItemField::Title => tags::TITLE,
            ItemField::Link => tags::LINK,
            ItemField::PubDate => tags::PUB_DATE,
            ItemField::Description => tags::DESCRIPTION,
            ItemField::Other(name) => name,
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error for a field name that cannot name an element
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0:?}")]
pub struct UnknownField(pub String);

/// What an edit request changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    ChannelTitle,
    Item(ItemField),
}

impl FromStr for EditTarget {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            CHANNEL_TITLE_FIELD => Ok(EditTarget::ChannelTitle),
            tags::TITLE => Ok(EditTarget::Item(ItemField::Title)),
            tags::LINK => Ok(EditTarget::Item(ItemField::Link)),
            tags::PUB_DATE => Ok(EditTarget::Item(ItemField::PubDate)),
            tags::DESCRIPTION => Ok(EditTarget::Item(ItemField::Description)),
            other if is_element_name(other) => {
                Ok(EditTarget::Item(ItemField::Other(other.to_string())))
            }
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Loose check for a name that could appear as an element tag
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')),
        _ => false,
    }
}

/// Add a bookmark stamped with the current time
///
/// See [`insert_bookmark_at`].
pub fn insert_bookmark(
    doc: &mut Document,
    link: &str,
    title: Option<&str>,
    message: Option<&str>,
) -> Bookmark {
    insert_bookmark_at(doc, link, title, message, Local::now().naive_local())
}

/// Add a bookmark as the newest item
///
/// Empty or absent `title` and `message` become unspecified fields. The
/// item goes in front of every existing item, or at the end of the channel
/// when it has none.
pub fn insert_bookmark_at(
    doc: &mut Document,
    link: &str,
    title: Option<&str>,
    message: Option<&str>,
    at: NaiveDateTime,
) -> Bookmark {
    let bookmark = Bookmark {
        title: FieldValue::from_input(title),
        link: link.to_string(),
        pub_date: at.format(PUB_DATE_FORMAT).to_string(),
        description: FieldValue::from_input(message),
    };

    let channel = doc.channel_mut();
    let index = channel
        .position_of(tags::ITEM)
        .unwrap_or(channel.children().len());
    channel.insert_child(index, Node::Element(bookmark.to_element()));

    debug!("Inserted bookmark {} at {}", bookmark.link, bookmark.pub_date);
    bookmark
}

/// Set or clear the channel title
///
/// A non-empty value sets the text and drops the unspecified marker;
/// anything else clears the text and sets the marker.
pub fn edit_channel_title(doc: &mut Document, value: Option<&str>) {
    doc.set_channel_title(&FieldValue::from_input(value));
}

/// Set or clear one field of the first item whose `pubDate` matches
///
/// Returns `false` without touching the document when no item matches or
/// the matched item has no such child.
pub fn edit_item_field(
    doc: &mut Document,
    match_pub_date: &str,
    field: &ItemField,
    value: Option<&str>,
) -> bool {
    let item = doc.items_mut().find(|item| {
        item.child(tags::PUB_DATE)
            .is_some_and(|date| date.text() == match_pub_date)
    });

    let Some(item) = item else {
        debug!("No item with pubDate {:?}", match_pub_date);
        return false;
    };

    match item.child_mut(field.tag()) {
        Some(element) => {
            FieldValue::from_input(value).write(element);
            true
        }
        None => {
            debug!("Item {:?} has no <{}>", match_pub_date, field);
            false
        }
    }
}

/// Apply an edit request to the document
///
/// Item edits without a `pubDate` match nothing. Returns whether the
/// document changed.
pub fn apply_edit(
    doc: &mut Document,
    target: EditTarget,
    pub_date: Option<&str>,
    value: Option<&str>,
) -> bool {
    match target {
        EditTarget::ChannelTitle => {
            edit_channel_title(doc, value);
            true
        }
        EditTarget::Item(field) => match pub_date {
            Some(pub_date) => edit_item_field(doc, pub_date, &field, value),
            None => false,
        },
    }
}
