//! PageStore trait: the knowledge-base capabilities the repository needs.
//!
//! The types in this module mirror the Notion API's JSON shapes closely
//! enough to be (de)serialized directly: read-side types (`Page`, `Block`,
//! `PropertyValue`, `RichText`) match what Notion returns, write-side types
//! (`PropertyWrite`, `NewBlock`, `TextInput`) match what it accepts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Property values to write on create/update, keyed by property name.
pub type PropertyMap = BTreeMap<String, PropertyWrite>;

// --- Read side ---

/// A database page as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub created_time: String,

    #[serde(default)]
    pub last_edited_time: String,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub parent: Parent,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// Where a page lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl Parent {
    pub fn database(database_id: impl Into<String>) -> Self {
        Self {
            kind: "database_id".into(),
            database_id: Some(database_id.into()),
            page_id: None,
        }
    }
}

/// A typed page property value. Types the repository never reads
/// deserialize as `Unsupported`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    #[serde(other)]
    Unsupported,
}

/// One rich-text span; only its plain-text projection is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

impl SelectOption {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

/// A content block under a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    #[serde(flatten)]
    pub content: BlockContent,
}

/// Block payloads the repository understands; everything else is
/// `Unsupported` and contributes nothing when content is flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockContent {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBlock },

    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBlock },

    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBlock },

    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBlock },

    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

// --- Write side ---

/// A property value in the shape the store accepts on create/update.
///
/// Externally tagged, so `Select(..)` serializes as `{"select": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyWrite {
    Title(Vec<TextInput>),
    Select(SelectOption),
    MultiSelect(Vec<SelectOption>),
    Date(DateValue),
}

impl PropertyWrite {
    pub fn title(text: impl Into<String>) -> Self {
        Self::Title(vec![TextInput::text(text)])
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::Select(SelectOption::named(name))
    }

    pub fn multi_select<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiSelect(names.into_iter().map(SelectOption::named).collect())
    }

    pub fn date(start: impl Into<String>) -> Self {
        Self::Date(DateValue {
            start: start.into(),
        })
    }
}

/// A rich-text span to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextInput {
    Text { text: TextContent },
}

impl TextInput {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Text { text } => &text.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// A child block to append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlock {
    pub object: String,

    #[serde(flatten)]
    pub content: NewBlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NewBlockContent {
    Paragraph { paragraph: TextInputBlock },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInputBlock {
    pub rich_text: Vec<TextInput>,
}

impl NewBlock {
    /// A paragraph holding `text` verbatim as a single span.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            object: "block".into(),
            content: NewBlockContent::Paragraph {
                paragraph: TextInputBlock {
                    rich_text: vec![TextInput::text(text)],
                },
            },
        }
    }
}

/// A database query: one page of results, optionally filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseQuery {
    pub page_size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<PropertyFilter>,
}

/// An equality filter on a select property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub property: String,
    pub select: SelectCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCondition {
    pub equals: String,
}

impl PropertyFilter {
    pub fn select_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            select: SelectCondition {
                equals: value.into(),
            },
        }
    }
}

/// The knowledge-base store.
///
/// Implementations: the Notion HTTP client and an in-memory store for tests.
/// Every method is a single round trip; none of them retry.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// A human-readable name for this store (e.g., "notion").
    fn name(&self) -> &str;

    /// Query one page of non-archived pages in a database.
    async fn query_database(
        &self,
        database_id: &str,
        query: DatabaseQuery,
    ) -> Result<Vec<Page>, StoreError>;

    /// Fetch a page by id, archived or not.
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError>;

    /// Create a page in a database with the given properties and children.
    async fn create_page(
        &self,
        database_id: &str,
        properties: PropertyMap,
        children: Vec<NewBlock>,
    ) -> Result<Page, StoreError>;

    /// Overwrite the given properties; others are left untouched.
    async fn update_page_properties(
        &self,
        page_id: &str,
        properties: PropertyMap,
    ) -> Result<Page, StoreError>;

    /// Flag a page as archived.
    async fn archive_page(&self, page_id: &str) -> Result<Page, StoreError>;

    /// List the first page of child blocks.
    async fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError>;

    /// Append blocks after the existing children.
    async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<NewBlock>,
    ) -> Result<(), StoreError>;

    /// Delete a single block.
    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError>;

    /// Workspace-wide text search restricted to pages.
    async fn search_pages(&self, query: &str) -> Result<Vec<Page>, StoreError>;
}
