//! In-memory page store used by the test suites.
//!
//! Behaves like the Notion API where the repository can observe it:
//! database queries skip archived pages, archived pages stay retrievable
//! by id, search is unscoped, and children are listed in append order.
//! Every call is recorded so tests can count round trips.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use metodo_core::error::StoreError;
use metodo_core::store::{
    Block, BlockContent, DatabaseQuery, NewBlock, NewBlockContent, Page, PageStore, Parent,
    PropertyMap, PropertyValue, PropertyWrite, RichText, TextBlock,
};
use tokio::sync::RwLock;

struct StoredPage {
    page: Page,
    blocks: Vec<Block>,
}

#[derive(Default)]
struct State {
    pages: Vec<StoredPage>,
    next_id: u64,
    failing: HashSet<String>,
    calls: Vec<String>,
}

impl State {
    fn next_id(&mut self, prefix: u32) -> String {
        self.next_id += 1;
        format!("{prefix:08x}-0000-4000-8000-{:012x}", self.next_id)
    }

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn check_failing(&self, id: &str) -> Result<(), StoreError> {
        if self.failing.contains(id) {
            Err(StoreError::Network(format!("injected failure for {id}")))
        } else {
            Ok(())
        }
    }

    fn page_mut(&mut self, id: &str) -> Result<&mut StoredPage, StoreError> {
        self.pages
            .iter_mut()
            .find(|p| p.page.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Could not find page with ID: {id}")))
    }
}

/// A page store that keeps everything in memory.
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Insert a page with pre-built blocks, bypassing the write path.
    /// Returns the assigned page id.
    pub async fn insert_page(
        &self,
        database_id: &str,
        properties: PropertyMap,
        blocks: Vec<BlockContent>,
    ) -> String {
        let mut state = self.state.write().await;
        let id = state.next_id(0xa);
        let blocks = blocks
            .into_iter()
            .map(|content| Block {
                id: state.next_id(0xb),
                content,
            })
            .collect();
        let page = new_page(&id, Parent::database(database_id), properties);
        state.pages.push(StoredPage { page, blocks });
        id
    }

    /// Make every call touching `id` fail with a network error.
    pub async fn fail_on(&self, id: &str) {
        self.state.write().await.failing.insert(id.to_string());
    }

    /// Current children of a page, in order.
    pub async fn blocks_of(&self, page_id: &str) -> Vec<Block> {
        let state = self.state.read().await;
        state
            .pages
            .iter()
            .find(|p| p.page.id == page_id)
            .map(|p| p.blocks.clone())
            .unwrap_or_default()
    }

    /// Current state of a page, archived or not.
    pub async fn page(&self, page_id: &str) -> Option<Page> {
        let state = self.state.read().await;
        state
            .pages
            .iter()
            .find(|p| p.page.id == page_id)
            .map(|p| p.page.clone())
    }

    /// Operation log, e.g. `["retrieve_page p1", "list_block_children p1"]`.
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_page(id: &str, parent: Parent, properties: PropertyMap) -> Page {
    let created = now();
    Page {
        id: id.to_string(),
        url: format!("https://www.notion.so/{}", id.replace('-', "")),
        created_time: created.clone(),
        last_edited_time: created,
        archived: false,
        parent,
        properties: properties
            .into_iter()
            .map(|(name, value)| (name, to_value(value)))
            .collect(),
    }
}

/// What the store would return after accepting a property write.
fn to_value(write: PropertyWrite) -> PropertyValue {
    match write {
        PropertyWrite::Title(spans) => PropertyValue::Title {
            title: spans.iter().map(|s| RichText::plain(s.content())).collect(),
        },
        PropertyWrite::Select(option) => PropertyValue::Select {
            select: Some(option),
        },
        PropertyWrite::MultiSelect(options) => PropertyValue::MultiSelect {
            multi_select: options,
        },
        PropertyWrite::Date(date) => PropertyValue::Date { date: Some(date) },
    }
}

fn to_block(id: String, block: NewBlock) -> Block {
    let content = match block.content {
        NewBlockContent::Paragraph { paragraph } => BlockContent::Paragraph {
            paragraph: TextBlock {
                rich_text: paragraph
                    .rich_text
                    .iter()
                    .map(|s| RichText::plain(s.content()))
                    .collect(),
            },
        },
    };
    Block { id, content }
}

fn title_text(page: &Page) -> String {
    page.properties
        .values()
        .find_map(|value| match value {
            PropertyValue::Title { title } => {
                Some(title.iter().map(|t| t.plain_text.as_str()).collect::<String>())
            }
            _ => None,
        })
        .unwrap_or_default()
}

fn matches_filter(page: &Page, query: &DatabaseQuery) -> bool {
    let Some(filter) = &query.filter else {
        return true;
    };
    match page.property(&filter.property) {
        Some(PropertyValue::Select {
            select: Some(option),
        }) => option.name == filter.select.equals,
        _ => false,
    }
}

#[async_trait]
impl PageStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: DatabaseQuery,
    ) -> Result<Vec<Page>, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("query_database {database_id}"));
        state.check_failing(database_id)?;

        Ok(state
            .pages
            .iter()
            .map(|p| &p.page)
            .filter(|p| !p.archived)
            .filter(|p| p.parent.database_id.as_deref() == Some(database_id))
            .filter(|p| matches_filter(p, &query))
            .take(query.page_size as usize)
            .cloned()
            .collect())
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("retrieve_page {page_id}"));
        state.check_failing(page_id)?;
        Ok(state.page_mut(page_id)?.page.clone())
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: PropertyMap,
        children: Vec<NewBlock>,
    ) -> Result<Page, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("create_page {database_id}"));
        state.check_failing(database_id)?;

        let id = state.next_id(0xa);
        let blocks = children
            .into_iter()
            .map(|b| to_block(state.next_id(0xb), b))
            .collect();
        let page = new_page(&id, Parent::database(database_id), properties);
        state.pages.push(StoredPage {
            page: page.clone(),
            blocks,
        });
        Ok(page)
    }

    async fn update_page_properties(
        &self,
        page_id: &str,
        properties: PropertyMap,
    ) -> Result<Page, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("update_page_properties {page_id}"));
        state.check_failing(page_id)?;

        let stored = state.page_mut(page_id)?;
        for (name, value) in properties {
            stored.page.properties.insert(name, to_value(value));
        }
        stored.page.last_edited_time = now();
        Ok(stored.page.clone())
    }

    async fn archive_page(&self, page_id: &str) -> Result<Page, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("archive_page {page_id}"));
        state.check_failing(page_id)?;

        let stored = state.page_mut(page_id)?;
        stored.page.archived = true;
        stored.page.last_edited_time = now();
        Ok(stored.page.clone())
    }

    async fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("list_block_children {block_id}"));
        state.check_failing(block_id)?;
        Ok(state.page_mut(block_id)?.blocks.clone())
    }

    async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<NewBlock>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("append_block_children {block_id}"));
        state.check_failing(block_id)?;

        // Ids first: `page_mut` holds the state borrow.
        let blocks: Vec<Block> = children
            .into_iter()
            .map(|b| to_block(state.next_id(0xb), b))
            .collect();
        state.page_mut(block_id)?.blocks.extend(blocks);
        Ok(())
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("delete_block {block_id}"));
        state.check_failing(block_id)?;

        for stored in &mut state.pages {
            if let Some(pos) = stored.blocks.iter().position(|b| b.id == block_id) {
                stored.blocks.remove(pos);
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!(
            "Could not find block with ID: {block_id}"
        )))
    }

    async fn search_pages(&self, query: &str) -> Result<Vec<Page>, StoreError> {
        let mut state = self.state.write().await;
        state.record(format!("search_pages {query}"));

        let needle = query.to_lowercase();
        Ok(state
            .pages
            .iter()
            .map(|p| &p.page)
            .filter(|p| !p.archived)
            .filter(|p| title_text(p).to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
