use crate::config::SearchCriteria;
use crate::error::SourceError;
use crate::filter::{CutoffDecision, DateCutoff};
use crate::images::{ImageFetcher, ImageNames, save_article_image};
use crate::results::{NewsRecord, RawArticle};
use crate::sources::{ArticleSlot, PageDataSource};
use std::collections::HashSet;
use std::path::Path;

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An article on `page` predates the cutoff
    CutoffReached { page: u32 },
    /// Every page was extracted
    PagesExhausted,
    /// Navigating to `page` failed
    NavigationFailed { page: u32 },
    /// The article list of `page` could not be read
    PageUnreadable { page: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Ready { total_pages: u32 },
    FetchingPage { page: u32 },
    ExtractingPage { page: u32 },
    Stopped(StopReason),
}

/// Records produced by one run, in encounter order
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub records: Vec<NewsRecord>,
    pub stop_reason: StopReason,
    pub pages_visited: u32,
}

enum ArticleOutcome {
    Record(NewsRecord),
    Duplicate,
    Stop,
}

/// Walks the result pages of one run, stopping at the date cutoff
pub struct PaginationController<'a> {
    source: &'a mut dyn PageDataSource,
    images: &'a dyn ImageFetcher,
    image_dir: &'a Path,
    criteria: &'a SearchCriteria,
    cutoff: DateCutoff,
    total_pages: u32,
    state: PaginationState,
    records: Vec<NewsRecord>,
    seen: HashSet<(String, String)>,
    image_names: ImageNames,
    pages_visited: u32,
}

impl<'a> PaginationController<'a> {
    pub fn new(
        source: &'a mut dyn PageDataSource,
        images: &'a dyn ImageFetcher,
        image_dir: &'a Path,
        criteria: &'a SearchCriteria,
        cutoff: DateCutoff,
        total_pages: u32,
    ) -> Self {
        Self {
            source,
            images,
            image_dir,
            criteria,
            cutoff,
            total_pages,
            state: PaginationState::Ready { total_pages },
            records: Vec::new(),
            seen: HashSet::new(),
            image_names: ImageNames::new(),
            pages_visited: 0,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn records(&self) -> &[NewsRecord] {
        &self.records
    }

    /// Run to the `Stopped` state
    pub async fn run(mut self) -> ExtractionOutcome {
        loop {
            if let PaginationState::Stopped(stop_reason) = self.state {
                ::log::info!(
                    "Pagination stopped ({:?}) after {} page(s) with {} record(s)",
                    stop_reason,
                    self.pages_visited,
                    self.records.len()
                );
                return ExtractionOutcome {
                    records: self.records,
                    stop_reason,
                    pages_visited: self.pages_visited,
                };
            }
            self.step().await;
        }
    }

    /// Perform a single state transition
    pub async fn step(&mut self) {
        let current = self.state;
        self.state = match current {
            PaginationState::Ready { total_pages: 0 } => {
                PaginationState::Stopped(StopReason::PagesExhausted)
            }
            PaginationState::Ready { .. } => PaginationState::FetchingPage { page: 1 },
            PaginationState::FetchingPage { page } => self.fetch_page(page).await,
            PaginationState::ExtractingPage { page } => self.extract_page(page).await,
            stopped @ PaginationState::Stopped(_) => stopped,
        };
    }

    async fn fetch_page(&mut self, page: u32) -> PaginationState {
        // The first page is the one the search landed on
        if page == 1 {
            return PaginationState::ExtractingPage { page };
        }

        match self.source.go_to_next_page().await {
            Ok(()) => PaginationState::ExtractingPage { page },
            Err(e) => {
                ::log::warn!("Could not reach page {}: {}", page, e);
                PaginationState::Stopped(StopReason::NavigationFailed { page })
            }
        }
    }

    async fn extract_page(&mut self, page: u32) -> PaginationState {
        let slots = match self.source.article_slots(page).await {
            Ok(slots) => slots,
            Err(e) => {
                ::log::error!("Could not read articles on page {}: {}", page, e);
                return PaginationState::Stopped(StopReason::PageUnreadable { page });
            }
        };
        self.pages_visited += 1;
        ::log::info!(
            "Extracting page {} of {} ({} articles)",
            page,
            self.total_pages,
            slots.len()
        );

        for slot in slots {
            match self.extract_article(slot).await {
                ArticleOutcome::Record(record) => {
                    ::log::debug!("Recorded {:?} ({})", record.title, record.date_text);
                    self.records.push(record);
                }
                ArticleOutcome::Duplicate => {}
                ArticleOutcome::Stop => {
                    ::log::info!(
                        "Article {} on page {} predates {}; stopping",
                        slot.0 + 1,
                        page,
                        self.cutoff.cutoff()
                    );
                    return PaginationState::Stopped(StopReason::CutoffReached { page });
                }
            }
        }

        if page < self.total_pages {
            PaginationState::FetchingPage { page: page + 1 }
        } else {
            PaginationState::Stopped(StopReason::PagesExhausted)
        }
    }

    async fn extract_article(&mut self, slot: ArticleSlot) -> ArticleOutcome {
        let title = best_effort(self.source.read_title(slot).await, "title", slot);
        let date_text = best_effort(self.source.read_date(slot).await, "date", slot);

        match self.cutoff.evaluate(&date_text) {
            CutoffDecision::Stop => return ArticleOutcome::Stop,
            CutoffDecision::Unparseable => {
                ::log::warn!(
                    "Unrecognized date {:?} for {:?}; keeping the article",
                    date_text,
                    title
                );
            }
            CutoffDecision::Accept => {}
        }

        if !title.is_empty() && !self.seen.insert((title.clone(), date_text.clone())) {
            ::log::debug!("Skipping duplicate article {:?}", title);
            return ArticleOutcome::Duplicate;
        }

        let description_text =
            best_effort(self.source.read_description(slot).await, "description", slot);
        let image_url = match self.source.read_image_url(slot).await {
            Ok(url) => url,
            Err(e) => {
                ::log::warn!("Could not read image of article {}: {}", slot.0 + 1, e);
                None
            }
        };

        let image_path = save_article_image(
            self.images,
            image_url.as_deref(),
            self.image_dir,
            &mut self.image_names,
        )
        .await;

        let raw = RawArticle {
            title,
            date_text,
            description_text,
            image_url,
        };
        ArticleOutcome::Record(NewsRecord::analyzed(
            raw,
            &self.criteria.phrase,
            image_path.map(|path| path.display().to_string()),
        ))
    }
}

fn best_effort(read: Result<String, SourceError>, field: &str, slot: ArticleSlot) -> String {
    match read {
        Ok(value) => value,
        Err(e) => {
            ::log::warn!("Could not read {} of article {}: {}", field, slot.0 + 1, e);
            String::new()
        }
    }
}
