//! Page-data sources: where search result pages come from.
//!
//! The extraction pipeline only sees the [`PageDataSource`] trait. The
//! WebDriver-backed implementation lives in [`web`].

pub mod web;

use crate::error::{NavigationError, SetupError, SourceError};
use async_trait::async_trait;

pub use web::WebPageSource;

/// Opaque handle to one article position on the current results page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleSlot(pub usize);

/// A paginated list of search results, read one field at a time.
///
/// Implementations own the underlying session; callers hold it exclusively
/// and access it sequentially.
#[async_trait]
pub trait PageDataSource: Send {
    /// Order results newest first
    async fn sort_by_newest(&mut self) -> Result<(), SetupError>;

    /// Restrict results to a category/topic
    async fn select_category(&mut self, category: &str) -> Result<(), SetupError>;

    /// Total number of result pages
    async fn total_pages(&mut self) -> Result<u32, SourceError>;

    /// Article slots on the current page; `page_index` starts at 1
    async fn article_slots(&mut self, page_index: u32) -> Result<Vec<ArticleSlot>, SourceError>;

    async fn read_title(&mut self, slot: ArticleSlot) -> Result<String, SourceError>;

    async fn read_date(&mut self, slot: ArticleSlot) -> Result<String, SourceError>;

    async fn read_description(&mut self, slot: ArticleSlot) -> Result<String, SourceError>;

    /// Image URL, if the article has one
    async fn read_image_url(&mut self, slot: ArticleSlot) -> Result<Option<String>, SourceError>;

    /// Move to the following results page
    async fn go_to_next_page(&mut self) -> Result<(), NavigationError>;
}
