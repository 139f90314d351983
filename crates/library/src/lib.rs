//! Metodo Library: the knowledge base as a set of [`Entry`] records.
//!
//! [`EntryRepository`] hides Notion's page/property/block model behind
//! list/get/create/update/archive/search operations.
//!
//! [`Entry`]: metodo_core::Entry

pub mod mapping;
pub mod repository;

pub use repository::{EntryRepository, MAX_LIMIT};
