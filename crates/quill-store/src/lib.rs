//! In-memory storage engine for Quill.
//!
//! All tables live behind a single [`parking_lot::RwLock`], so reads run
//! concurrently and every mutation is atomic with respect to readers.
//! Multi-table mutations (structure conversion, cascade deletes) take a
//! snapshot of the affected tables first and restore it if a postcondition
//! fails, which gives transaction semantics without a write-ahead log.
//!
//! The store also maintains the ordering invariant for chapters and books:
//! positions are 1-based and dense within their parent at all times.
//!
//! # Example
//!
//! ```
//! use quill_domain::{Markdown, StoryStructure};
//! use quill_store::Store;
//!
//! let store = Store::new();
//! let story = store.create_story(
//!     "alice".into(),
//!     "The Lighthouse",
//!     None,
//!     StoryStructure::Chaptered,
//! );
//!
//! store
//!     .insert_chapter(story.id, None, "Chapter 1", Markdown::sanitize("..."), None)
//!     .unwrap();
//! assert_eq!(store.chapters_of_story(story.id).unwrap().len(), 1);
//! ```

mod books;
mod chapters;
mod conversion;
mod error;
mod memory;
mod query;
mod stories;
mod tags;

pub use error::{StoreError, StoreResult};
pub use memory::Store;
pub use query::{Page, SortField, SortKey, StoryQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
