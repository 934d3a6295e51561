//! RSS document handling
//!
//! A [`Document`] is the whole feed held in memory: the `<rss>` root and its
//! single `<channel>`. Construction guarantees the channel exists and has a
//! `<title>`, so the rest of the crate never has to check.

use thiserror::Error;

use crate::models::{tags, Bookmark, FieldValue};
use crate::xml::{self, Element, Node, XmlError};

/// Errors that can occur when building a document from XML
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("{0}")]
    Xml(#[from] XmlError),

    #[error("missing <channel> element")]
    MissingChannel,
}

/// An RSS feed of bookmarks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The `<rss>` root without its channel
    root: Element,
    /// The channel, detached from `root` while in memory
    channel: Element,
    /// Node index the channel is written back at
    channel_index: usize,
}

impl Document {
    /// Create an empty feed with an unspecified channel title
    pub fn new() -> Self {
        let root = Element::new(tags::RSS).with_attribute(tags::VERSION, tags::RSS_VERSION);
        let channel =
            Element::new(tags::CHANNEL).with_child(FieldValue::Unspecified.to_element(tags::TITLE));

        Self {
            root,
            channel,
            channel_index: 0,
        }
    }

    /// Parse a feed, adding a channel title if it is missing
    pub fn from_xml(input: &str) -> Result<Self, DocumentError> {
        let root = xml::parse(input)?;
        Self::from_element(root)
    }

    /// Build a document from a parsed root element
    pub fn from_element(mut root: Element) -> Result<Self, DocumentError> {
        let (channel_index, mut channel) = root
            .take_child(tags::CHANNEL)
            .ok_or(DocumentError::MissingChannel)?;

        if channel.child(tags::TITLE).is_none() {
            channel.push_child(FieldValue::Unspecified.to_element(tags::TITLE));
        }

        Ok(Self {
            root,
            channel,
            channel_index,
        })
    }

    /// Reassemble the full element tree
    pub fn to_element(&self) -> Element {
        let mut root = self.root.clone();
        root.insert_child(self.channel_index, Node::Element(self.channel.clone()));
        root
    }

    /// Pretty-printed XML, as written to disk
    pub fn to_pretty_xml(&self) -> Result<String, XmlError> {
        xml::to_pretty_string(&self.to_element())
    }

    pub fn channel(&self) -> &Element {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut Element {
        &mut self.channel
    }

    /// Write the channel title, adding the element if it went missing
    pub fn set_channel_title(&mut self, value: &FieldValue) {
        match self.channel.child_mut(tags::TITLE) {
            Some(title) => value.write(title),
            None => self.channel.push_child(value.to_element(tags::TITLE)),
        }
    }

    pub fn channel_title(&self) -> FieldValue {
        self.channel
            .child(tags::TITLE)
            .map(FieldValue::read)
            .unwrap_or_default()
    }

    /// Item elements, newest first
    pub fn items(&self) -> impl Iterator<Item = &Element> {
        self.channel.children_named(tags::ITEM)
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.channel
            .elements_mut()
            .filter(|el| el.name() == tags::ITEM)
    }

    /// Snapshot of all bookmarks, newest first
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.items().map(Bookmark::from_element).collect()
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
