//! Entry domain types.
//!
//! An [`Entry`] is the normalized view of one page in the knowledge-base
//! database. It is what the HTTP surface and the prompt assembler see;
//! the Notion page/property/block shapes stay behind the repository.

use serde::{Deserialize, Serialize};

/// A normalized knowledge-base record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque page id, assigned by the store at creation
    pub id: String,

    /// Title (first span of the `Nombre` title property)
    pub titulo: String,

    /// Category (`Tipo` select), e.g. "Nota", "Análisis"
    #[serde(default)]
    pub tipo: Option<String>,

    /// Labels (`Tags` multi-select), in store order
    #[serde(default)]
    pub tags: Vec<String>,

    /// ISO-8601 date (`Fecha` start)
    #[serde(default)]
    pub fecha: Option<String>,

    /// Flattened body text; only present in full form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contenido: Option<String>,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub created_time: String,

    #[serde(default)]
    pub last_edited_time: String,
}

/// Input for creating an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub titulo: String,

    #[serde(default)]
    pub tipo: Option<String>,

    #[serde(default)]
    pub contenido: String,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub fecha: Option<String>,
}

impl NewEntry {
    pub fn new(titulo: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            ..Self::default()
        }
    }
}

/// A partial update to an existing entry.
///
/// Scalar fields (`titulo`, `tipo`, `contenido`) apply only when non-empty:
/// an empty string means "leave unchanged". `tags` applies whenever it is
/// present, so `Some(vec![])` clears the stored tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub titulo: Option<String>,

    #[serde(default)]
    pub tipo: Option<String>,

    #[serde(default)]
    pub contenido: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl EntryPatch {
    /// The new title, if one should be written.
    pub fn titulo_change(&self) -> Option<&str> {
        non_empty(&self.titulo)
    }

    /// The new category, if one should be written.
    pub fn tipo_change(&self) -> Option<&str> {
        non_empty(&self.tipo)
    }

    /// The new body, if the content blocks should be replaced.
    pub fn contenido_change(&self) -> Option<&str> {
        non_empty(&self.contenido)
    }

    /// The replacement tag set, if one should be written (may be empty).
    pub fn tags_change(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Identifier and URL of a freshly created entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub id: String,
    pub url: String,
}
