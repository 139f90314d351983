//! Page store implementations for Metodo.
//!
//! Both implement `metodo_core::PageStore`:
//! - [`NotionClient`] talks to the Notion REST API
//! - [`InMemoryStore`] keeps pages in a Vec, for tests

pub mod client;
pub mod in_memory;

pub use client::NotionClient;
pub use in_memory::InMemoryStore;
