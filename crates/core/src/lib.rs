//! # Metodo Core
//!
//! Domain types, traits, and error definitions for the Metodo backend.
//! This crate has **no HTTP dependencies**: it defines the model the
//! other crates implement against.
//!
//! Two seams are defined here as traits:
//! - [`PageStore`]: the Notion capability set the entry repository needs
//! - [`Provider`]: a chat-completion backend
//!
//! Implementations live in `metodo-notion` and `metodo-providers`, which
//! keeps the repository and the prompt assembler testable against
//! in-memory stand-ins.

pub mod entry;
pub mod error;
pub mod message;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use entry::{CreatedEntry, Entry, EntryPatch, NewEntry};
pub use error::{Error, ProviderError, Result, StoreError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::{Block, BlockContent, Page, PageStore, PropertyValue, RichText};
