//! Translation between store pages and [`Entry`] records.

use metodo_core::entry::{Entry, EntryPatch, NewEntry};
use metodo_core::store::{
    Block, BlockContent, NewBlock, Page, PropertyMap, PropertyValue, PropertyWrite, RichText,
};

/// Property names in the knowledge-base database.
pub const TITLE: &str = "Nombre";
pub const TYPE: &str = "Tipo";
pub const TAGS: &str = "Tags";
pub const DATE: &str = "Fecha";

/// Build the summary form of an entry (no `contenido`).
pub fn parse_entry(page: &Page) -> Entry {
    let titulo = match page.property(TITLE) {
        Some(PropertyValue::Title { title }) => title
            .first()
            .map(|span| span.plain_text.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let tipo = match page.property(TYPE) {
        Some(PropertyValue::Select {
            select: Some(option),
        }) => Some(option.name.clone()),
        _ => None,
    };

    let tags = match page.property(TAGS) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.iter().map(|o| o.name.clone()).collect()
        }
        _ => Vec::new(),
    };

    let fecha = match page.property(DATE) {
        Some(PropertyValue::Date { date: Some(date) }) => Some(date.start.clone()),
        _ => None,
    };

    Entry {
        id: page.id.clone(),
        titulo,
        tipo,
        tags,
        fecha,
        contenido: None,
        url: page.url.clone(),
        created_time: page.created_time.clone(),
        last_edited_time: page.last_edited_time.clone(),
    }
}

fn join_spans(spans: &[RichText]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}

/// Flatten child blocks into plain text.
///
/// Paragraphs, level-1/2 headings and bulleted items are kept (headings and
/// bullets get a markdown-style prefix); every other block is dropped.
pub fn extract_content(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match &block.content {
            BlockContent::Paragraph { paragraph } => Some(join_spans(&paragraph.rich_text)),
            BlockContent::Heading1 { heading_1 } => {
                Some(format!("# {}", join_spans(&heading_1.rich_text)))
            }
            BlockContent::Heading2 { heading_2 } => {
                Some(format!("## {}", join_spans(&heading_2.rich_text)))
            }
            BlockContent::BulletedListItem { bulleted_list_item } => {
                Some(format!("- {}", join_spans(&bulleted_list_item.rich_text)))
            }
            BlockContent::Unsupported => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Properties for a new page. Optional fields are omitted when empty.
pub fn create_properties(entry: &NewEntry) -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.insert(TITLE.into(), PropertyWrite::title(&entry.titulo));

    if let Some(tipo) = entry.tipo.as_deref().filter(|t| !t.is_empty()) {
        properties.insert(TYPE.into(), PropertyWrite::select(tipo));
    }
    if let Some(tags) = entry.tags.as_ref().filter(|t| !t.is_empty()) {
        properties.insert(TAGS.into(), PropertyWrite::multi_select(tags.iter().cloned()));
    }
    if let Some(fecha) = entry.fecha.as_deref().filter(|f| !f.is_empty()) {
        properties.insert(DATE.into(), PropertyWrite::date(fecha));
    }
    properties
}

/// Children for a new page: one paragraph holding the body, or none.
pub fn create_children(entry: &NewEntry) -> Vec<NewBlock> {
    if entry.contenido.is_empty() {
        Vec::new()
    } else {
        vec![NewBlock::paragraph(&entry.contenido)]
    }
}

/// The property patch for an update; empty when nothing should be written.
pub fn patch_properties(patch: &EntryPatch) -> PropertyMap {
    let mut properties = PropertyMap::new();
    if let Some(titulo) = patch.titulo_change() {
        properties.insert(TITLE.into(), PropertyWrite::title(titulo));
    }
    if let Some(tipo) = patch.tipo_change() {
        properties.insert(TYPE.into(), PropertyWrite::select(tipo));
    }
    if let Some(tags) = patch.tags_change() {
        properties.insert(TAGS.into(), PropertyWrite::multi_select(tags.iter().cloned()));
    }
    properties
}

/// Database ids compare equal with or without dashes, in any case.
pub fn same_database(a: &str, b: &str) -> bool {
    let normalize = |id: &str| id.replace('-', "").to_ascii_lowercase();
    normalize(a) == normalize(b)
}
