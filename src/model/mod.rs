//! Document model types for bulletin content.
//!
//! These types mirror the JSON content shape delivered by the content
//! provider. The export pipeline only reads them: to compute how many
//! pages each section occupies and to name the captured files.

mod document;
mod pagination;

pub use document::{Block, Document, Field, FieldType, Section};
pub use pagination::{pages_for_section, total_pages};
