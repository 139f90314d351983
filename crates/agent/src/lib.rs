//! The joke-writing assistant.
//!
//! Every request follows the same shape:
//!
//! 1. **System prompt** describing the analysis method
//! 2. **Library context** (optional): entries whose titles mark them as
//!    examples, catalogues or principles, with their full bodies
//! 3. **User message**, either free text or one of the fixed templates
//!
//! The assembled list goes to the provider in a single completion call.

pub mod assistant;
pub mod prompts;

pub use assistant::{Assistant, LIBRARY_SCAN_LIMIT};
