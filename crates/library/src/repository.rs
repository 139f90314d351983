//! The entry repository: CRUD over one knowledge-base database.

use std::sync::Arc;

use metodo_core::entry::{CreatedEntry, Entry, EntryPatch, NewEntry};
use metodo_core::error::StoreError;
use metodo_core::store::{DatabaseQuery, NewBlock, PageStore, PropertyFilter};
use tracing::debug;

use crate::mapping;

/// Largest `limit` accepted by [`EntryRepository::list`].
pub const MAX_LIMIT: u32 = 100;

/// Reads and writes entries in a single database of a [`PageStore`].
///
/// Every operation is a short sequence of store calls; nothing is cached
/// and nothing is retried.
#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn PageStore>,
    database_id: String,
}

impl EntryRepository {
    pub fn new(store: Arc<dyn PageStore>, database_id: impl Into<String>) -> Self {
        Self {
            store,
            database_id: database_id.into(),
        }
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// List entries in summary form, optionally filtered by `Tipo`.
    ///
    /// `limit` is clamped to `1..=100`; only the first result page is read.
    pub async fn list(&self, tipo: Option<&str>, limit: u32) -> Result<Vec<Entry>, StoreError> {
        let query = DatabaseQuery {
            page_size: limit.clamp(1, MAX_LIMIT),
            filter: tipo
                .filter(|t| !t.is_empty())
                .map(|t| PropertyFilter::select_equals(mapping::TYPE, t)),
        };
        let pages = self.store.query_database(&self.database_id, query).await?;
        debug!(count = pages.len(), "Listed entries");
        Ok(pages.iter().map(mapping::parse_entry).collect())
    }

    /// Fetch one entry in full form, including its flattened body.
    pub async fn get(&self, id: &str) -> Result<Entry, StoreError> {
        let page = self.store.retrieve_page(id).await?;
        let blocks = self.store.list_block_children(id).await?;

        let mut entry = mapping::parse_entry(&page);
        entry.contenido = Some(mapping::extract_content(&blocks));
        Ok(entry)
    }

    /// Create an entry. A non-empty body becomes a single paragraph block.
    pub async fn create(&self, entry: NewEntry) -> Result<CreatedEntry, StoreError> {
        let page = self
            .store
            .create_page(
                &self.database_id,
                mapping::create_properties(&entry),
                mapping::create_children(&entry),
            )
            .await?;
        debug!(id = %page.id, "Created entry");
        Ok(CreatedEntry {
            id: page.id,
            url: page.url,
        })
    }

    /// Apply a partial update.
    ///
    /// Properties are patched in one call when any apply. A non-empty
    /// `contenido` replaces the body: each existing child block is deleted,
    /// then one paragraph is appended. The replacement is not atomic; a
    /// failure part-way leaves the page with some blocks removed.
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Result<(), StoreError> {
        let properties = mapping::patch_properties(&patch);
        if !properties.is_empty() {
            self.store.update_page_properties(id, properties).await?;
        }

        if let Some(contenido) = patch.contenido_change() {
            let existing = self.store.list_block_children(id).await?;
            debug!(id, blocks = existing.len(), "Replacing entry content");
            for block in &existing {
                self.store.delete_block(&block.id).await?;
            }
            self.store
                .append_block_children(id, vec![NewBlock::paragraph(contenido)])
                .await?;
        }
        Ok(())
    }

    /// Archive an entry. It stays retrievable by id but leaves listings.
    pub async fn archive(&self, id: &str) -> Result<(), StoreError> {
        self.store.archive_page(id).await?;
        Ok(())
    }

    /// Text search restricted to pages of this database, in store order.
    pub async fn search(&self, text: &str) -> Result<Vec<Entry>, StoreError> {
        let pages = self.store.search_pages(text).await?;
        Ok(pages
            .iter()
            .filter(|page| {
                page.parent
                    .database_id
                    .as_deref()
                    .is_some_and(|db| mapping::same_database(db, &self.database_id))
            })
            .map(mapping::parse_entry)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metodo_core::store::{BlockContent, PropertyMap, PropertyWrite, RichText, TextBlock};
    use metodo_notion::InMemoryStore;

    const DB: &str = "d9824bdc-8445-4327-be8b-5b47500af6ce";

    fn setup() -> (Arc<InMemoryStore>, EntryRepository) {
        let store = Arc::new(InMemoryStore::new());
        let repo = EntryRepository::new(store.clone(), DB);
        (store, repo)
    }

    fn paragraph(s: &str) -> BlockContent {
        BlockContent::Paragraph {
            paragraph: TextBlock {
                rich_text: vec![RichText::plain(s)],
            },
        }
    }

    fn titled(title: &str) -> PropertyMap {
        PropertyMap::from([(mapping::TITLE.to_string(), PropertyWrite::title(title))])
    }

    #[tokio::test]
    async fn create_without_content_has_no_blocks() {
        let (store, repo) = setup();
        let created = repo.create(NewEntry::new("X")).await.unwrap();

        assert!(store.blocks_of(&created.id).await.is_empty());
        let entry = repo.get(&created.id).await.unwrap();
        assert_eq!(entry.titulo, "X");
        assert_eq!(entry.contenido.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn create_with_content_has_one_paragraph() {
        let (store, repo) = setup();
        let created = repo
            .create(NewEntry {
                contenido: "línea 1\nlínea 2".into(),
                tipo: Some("Nota".into()),
                tags: Some(vec!["a".into()]),
                fecha: Some("2024-05-01".into()),
                ..NewEntry::new("X")
            })
            .await
            .unwrap();

        assert_eq!(store.blocks_of(&created.id).await.len(), 1);
        let entry = repo.get(&created.id).await.unwrap();
        assert_eq!(entry.contenido.as_deref(), Some("línea 1\nlínea 2"));
        assert_eq!(entry.tipo.as_deref(), Some("Nota"));
        assert_eq!(entry.tags, vec!["a"]);
        assert_eq!(entry.fecha.as_deref(), Some("2024-05-01"));
        assert_eq!(entry.url, created.url);
    }

    #[tokio::test]
    async fn get_flattens_mixed_blocks() {
        let (store, repo) = setup();
        let id = store
            .insert_page(
                DB,
                titled("EJEMPLO"),
                vec![
                    BlockContent::Heading1 {
                        heading_1: TextBlock {
                            rich_text: vec![RichText::plain("T")],
                        },
                    },
                    paragraph("p"),
                    BlockContent::Unsupported,
                    BlockContent::BulletedListItem {
                        bulleted_list_item: TextBlock {
                            rich_text: vec![RichText::plain("x")],
                        },
                    },
                ],
            )
            .await;

        let entry = repo.get(&id).await.unwrap();
        assert_eq!(entry.contenido.as_deref(), Some("# T\n\np\n\n- x"));
        assert_eq!(
            store.calls().await,
            vec![format!("retrieve_page {id}"), format!("list_block_children {id}")]
        );
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_, repo) = setup();
        assert!(matches!(
            repo.get("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_tipo_and_clamps_limit() {
        let (store, repo) = setup();
        for i in 0..3 {
            let mut props = titled(&format!("n{i}"));
            props.insert(mapping::TYPE.into(), PropertyWrite::select("Nota"));
            store.insert_page(DB, props, vec![]).await;
        }
        store.insert_page(DB, titled("sin tipo"), vec![]).await;

        assert_eq!(repo.list(None, 100).await.unwrap().len(), 4);
        assert_eq!(repo.list(Some("Nota"), 100).await.unwrap().len(), 3);
        assert_eq!(repo.list(None, 0).await.unwrap().len(), 1);
        assert_eq!(repo.list(None, 500).await.unwrap().len(), 4);

        let entries = repo.list(None, 100).await.unwrap();
        assert!(entries.iter().all(|e| e.contenido.is_none()));
    }

    #[tokio::test]
    async fn empty_tags_clear_but_absent_tags_keep() {
        let (_, repo) = setup();
        let created = repo
            .create(NewEntry {
                tags: Some(vec!["a".into(), "b".into()]),
                ..NewEntry::new("X")
            })
            .await
            .unwrap();

        repo.update(&created.id, EntryPatch::default()).await.unwrap();
        assert_eq!(repo.get(&created.id).await.unwrap().tags, vec!["a", "b"]);

        let patch = EntryPatch {
            tags: Some(vec![]),
            ..Default::default()
        };
        repo.update(&created.id, patch).await.unwrap();
        assert!(repo.get(&created.id).await.unwrap().tags.is_empty());
    }

    // Empty scalars mean "leave unchanged" while an empty tag list means
    // "clear". The two rules differ on purpose and are both kept.
    #[tokio::test]
    async fn empty_scalars_leave_entry_untouched() {
        let (store, repo) = setup();
        let created = repo
            .create(NewEntry {
                tipo: Some("Nota".into()),
                contenido: "cuerpo".into(),
                ..NewEntry::new("X")
            })
            .await
            .unwrap();
        store.clear_calls().await;

        let patch = EntryPatch {
            titulo: Some(String::new()),
            tipo: Some(String::new()),
            contenido: Some(String::new()),
            tags: None,
        };
        repo.update(&created.id, patch).await.unwrap();
        assert!(store.calls().await.is_empty());

        let entry = repo.get(&created.id).await.unwrap();
        assert_eq!(entry.titulo, "X");
        assert_eq!(entry.tipo.as_deref(), Some("Nota"));
        assert_eq!(entry.contenido.as_deref(), Some("cuerpo"));
    }

    #[tokio::test]
    async fn content_update_replaces_every_block() {
        let (store, repo) = setup();
        let id = store
            .insert_page(DB, titled("X"), vec![paragraph("a"), paragraph("b")])
            .await;

        let patch = EntryPatch {
            contenido: Some("nuevo".into()),
            ..Default::default()
        };
        repo.update(&id, patch).await.unwrap();

        // list + one delete per block + append
        let calls = store.calls().await;
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], format!("list_block_children {id}"));
        assert!(calls[1].starts_with("delete_block"));
        assert!(calls[2].starts_with("delete_block"));
        assert_eq!(calls[3], format!("append_block_children {id}"));

        let entry = repo.get(&id).await.unwrap();
        assert_eq!(entry.contenido.as_deref(), Some("nuevo"));
    }

    #[tokio::test]
    async fn archived_entries_leave_listing_but_stay_readable() {
        let (_, repo) = setup();
        let created = repo.create(NewEntry::new("X")).await.unwrap();
        repo.archive(&created.id).await.unwrap();

        assert!(repo.list(None, 100).await.unwrap().is_empty());
        assert_eq!(repo.get(&created.id).await.unwrap().titulo, "X");
    }

    #[tokio::test]
    async fn search_keeps_only_this_database() {
        let (store, repo) = setup();
        store.insert_page(DB, titled("EJEMPLO uno"), vec![]).await;
        store
            .insert_page("d9824bdc84454327be8b5b47500af6ce", titled("EJEMPLO dos"), vec![])
            .await;
        store.insert_page("otra-base", titled("EJEMPLO tres"), vec![]).await;

        let results = repo.search("ejemplo").await.unwrap();
        let titles: Vec<_> = results.iter().map(|e| e.titulo.as_str()).collect();
        assert_eq!(titles, vec!["EJEMPLO uno", "EJEMPLO dos"]);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let (store, repo) = setup();
        store.fail_on(DB).await;
        assert!(matches!(
            repo.list(None, 10).await,
            Err(StoreError::Network(_))
        ));
    }
}
