//! Article extraction: one-time search setup followed by date-bounded
//! pagination over the result pages.

pub mod pagination;


use crate::config::SearchCriteria;
use crate::error::PipelineError;
use crate::filter::DateCutoff;
use crate::images::ImageFetcher;
use crate::sources::PageDataSource;
use chrono::NaiveDate;
use std::path::PathBuf;

pub use pagination::{ExtractionOutcome, PaginationController, PaginationState, StopReason};

/// Composes search setup, the date cutoff and pagination into one run
pub struct ExtractionPipeline<'a> {
    source: &'a mut dyn PageDataSource,
    images: &'a dyn ImageFetcher,
    image_dir: PathBuf,
    today: Option<NaiveDate>,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(
        source: &'a mut dyn PageDataSource,
        images: &'a dyn ImageFetcher,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            images,
            image_dir: image_dir.into(),
            today: None,
        }
    }

    /// Evaluate the cutoff relative to a fixed date instead of today
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Extract every qualifying article for `criteria`.
    ///
    /// Only an unreadable page count is fatal; everything after that ends
    /// with whatever records were collected.
    pub async fn run(&mut self, criteria: &SearchCriteria) -> Result<ExtractionOutcome, PipelineError> {
        self.setup(criteria).await;

        let total_pages = self.source.total_pages().await?;
        let cutoff = match self.today {
            Some(today) => DateCutoff::new(criteria.months_back, today),
            None => DateCutoff::from_today(criteria.months_back),
        };
        ::log::info!(
            "Extracting {:?} from {} page(s), cutoff {}",
            criteria.phrase,
            total_pages,
            cutoff.cutoff()
        );

        let controller = PaginationController::new(
            &mut *self.source,
            self.images,
            &self.image_dir,
            criteria,
            cutoff,
            total_pages,
        );
        Ok(controller.run().await)
    }

    async fn setup(&mut self, criteria: &SearchCriteria) {
        if let Err(e) = self.source.sort_by_newest().await {
            ::log::warn!("Could not sort results by newest: {}", e);
        }

        if let Some(category) = &criteria.category {
            match self.source.select_category(category).await {
                Ok(()) => ::log::info!("Filtered results to category {:?}", category),
                Err(e) => ::log::warn!("Continuing without category filter: {}", e),
            }
        }
    }
}
