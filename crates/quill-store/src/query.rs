//! Story browsing: filtering, sorting, and pagination.

use crate::memory::Store;
use quill_core::AuthorId;
use quill_domain::{Story, Tag};

/// Maximum page size; larger requests are clamped down to this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A sortable story field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Story title, lexicographic.
    Title,
    /// Creation timestamp.
    CreatedAt,
    /// Last-modified timestamp.
    UpdatedAt,
    /// Publication timestamp. Drafts sort after every published story.
    PublishedAt,
}

impl SortField {
    fn parse(name: &str) -> Result<Self, String> {
        match name {
            "title" => Ok(Self::Title),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "published_at" => Ok(Self::PublishedAt),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// One sort key: a field plus a direction.
///
/// The wire form is the field name, with a leading `-` for descending, e.g.
/// `-updated_at,title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by.
    pub field: SortField,
    /// `true` when descending.
    pub descending: bool,
}

impl SortKey {
    /// Parses a comma-separated sort list.
    ///
    /// # Errors
    ///
    /// Returns the offending field name when one is not sortable.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, String> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (name, descending) = match part.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (part, false),
                };
                SortField::parse(name).map(|field| Self { field, descending })
            })
            .collect()
    }
}

/// Filter, sort, and pagination parameters for a story listing.
#[derive(Debug, Clone)]
pub struct StoryQuery {
    /// Case-insensitive substring match against title and summary.
    pub q: Option<String>,
    /// Restrict to stories carrying this tag (normalized name).
    pub tag: Option<String>,
    /// Restrict to stories by this author.
    pub author: Option<AuthorId>,
    /// When set, drafts are excluded. Reader-facing listings set this.
    pub published_only: bool,
    /// Sort keys, applied in order. Empty means `-updated_at`.
    pub sort: Vec<SortKey>,
    /// 1-based page number.
    pub page: u32,
    /// Items per page, clamped to [`MAX_PAGE_SIZE`].
    pub page_size: u32,
}

impl Default for StoryQuery {
    fn default() -> Self {
        Self {
            q: None,
            tag: None,
            author: None,
            published_only: false,
            sort: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results with enough bookkeeping to build pagination links.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page, in sort order.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: usize,
    /// 1-based page number actually served (may be clamped).
    pub page: u32,
    /// Page size actually served.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items; at least 1.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let size = self.page_size.max(1) as usize;
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl Store {
    /// Runs a story listing query.
    ///
    /// A `tag` filter naming a tag no story carries matches nothing, so the
    /// result is an empty page rather than an error.
    #[must_use]
    pub fn query_stories(&self, query: &StoryQuery) -> Page<Story> {
        let tables = self.inner.read();

        let tag_filter = match &query.tag {
            Some(name) => {
                let normalized = Tag::normalize(name);
                let found = tables.tags.values().find(|t| t.name == normalized);
                match found {
                    Some(tag) => Some(tag.id),
                    None => {
                        return Page {
                            items: Vec::new(),
                            total: 0,
                            page: 1,
                            page_size: query.page_size.clamp(1, MAX_PAGE_SIZE),
                        };
                    }
                }
            }
            None => None,
        };
        let needle = query.q.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Story> = tables
            .stories
            .values()
            .filter(|story| !query.published_only || story.is_published())
            .filter(|story| {
                query
                    .author
                    .as_ref()
                    .is_none_or(|author| &story.author_id == author)
            })
            .filter(|story| tag_filter.is_none_or(|id| story.tags.contains(&id)))
            .filter(|story| {
                needle.as_deref().is_none_or(|needle| {
                    story.title.to_lowercase().contains(needle)
                        || story
                            .summary
                            .as_deref()
                            .is_some_and(|s| s.to_lowercase().contains(needle))
                })
            })
            .cloned()
            .collect();
        drop(tables);

        sort_stories(&mut matched, &query.sort);

        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
        let total = matched.len();
        let total_pages = total.div_ceil(page_size as usize).max(1);
        let page = u32::try_from((query.page.max(1) as usize).min(total_pages)).unwrap_or(u32::MAX);

        let start = (page as usize - 1) * page_size as usize;
        let items: Vec<Story> = matched
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
        }
    }
}

fn sort_stories(stories: &mut [Story], keys: &[SortKey]) {
    const DEFAULT: [SortKey; 1] = [SortKey {
        field: SortField::UpdatedAt,
        descending: true,
    }];
    let keys = if keys.is_empty() { &DEFAULT[..] } else { keys };

    stories.sort_by(|a, b| {
        for key in keys {
            let ord = match key.field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                // None (draft) sorts after Some regardless of direction,
                // so drafts always land at the end of the listing. Direction
                // is applied here, not in the shared reverse below.
                SortField::PublishedAt => {
                    match (a.status.published_at(), b.status.published_at()) {
                        (Some(a_at), Some(b_at)) => {
                            let ord = a_at.cmp(&b_at);
                            if key.descending {
                                ord.reverse()
                            } else {
                                ord
                            }
                        }
                        (Some(_), None) => std::cmp::Ordering::Less,
                        (None, Some(_)) => std::cmp::Ordering::Greater,
                        (None, None) => std::cmp::Ordering::Equal,
                    }
                }
            };
            let ord = if key.descending && key.field != SortField::PublishedAt {
                ord.reverse()
            } else {
                ord
            };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        // Stable tiebreak so pagination never shuffles equal rows.
        a.id.to_string().cmp(&b.id.to_string())
    });
}
