//! Domain model for the Quill fiction-publishing API.
//!
//! Stories come in three structures:
//!
//! - **one-shot** — a single markdown body, no chapters.
//! - **chaptered** — a flat, ordered sequence of chapters.
//! - **book-based** — ordered books, each holding an ordered sequence of
//!   chapters.
//!
//! This crate defines those types plus tags, publication status, the field
//! validation rules shared by create and update paths, and the markdown
//! sanitizer applied to every body that enters the system.

pub mod book;
pub mod chapter;
pub mod sanitize;
pub mod story;
pub mod tag;
pub mod validate;

pub use book::Book;
pub use chapter::Chapter;
pub use sanitize::Markdown;
pub use story::{PublicationStatus, Story, StoryStructure, StructureKind};
pub use tag::Tag;
