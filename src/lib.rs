// Re-export modules
pub mod config;
pub mod error;
pub mod filter;
pub mod images;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod sources;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CriteriaSource, ScraperConfig, SearchCriteria, WorkItemFile};
pub use error::{Error, Result};
pub use pipeline::{ExtractionOutcome, ExtractionPipeline, StopReason};
pub use report::ReportFormat;
pub use results::{NO_IMAGE, NewsRecord};

use images::HttpImageFetcher;
use sources::WebPageSource;
use std::path::PathBuf;
use std::time::Duration;

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records_written: usize,
    pub report_path: PathBuf,
    pub stop_reason: StopReason,
    pub pages_visited: u32,
}

/// Main builder for a news search run
pub struct NewsSearch {
    criteria: SearchCriteria,
    config: ScraperConfig,
    format: ReportFormat,
}

impl NewsSearch {
    /// Create a new search with default configuration
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            config: ScraperConfig::default(),
            format: ReportFormat::default(),
        }
    }

    /// Create a search from any criteria source
    pub fn from_source(source: &dyn CriteriaSource) -> Result<Self> {
        Ok(Self::new(source.load()?))
    }

    /// Use the given configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose the report format; the report file extension follows it
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Path the report will be written to
    pub fn report_path(&self) -> PathBuf {
        self.config
            .report_path()
            .with_extension(self.format.extension())
    }

    /// Open a browser session, extract matching articles and write the report
    pub async fn run(self) -> Result<RunSummary> {
        let config = &self.config;
        let report_path = self.report_path();

        utils::ensure_dir(&config.output_dir).await?;
        utils::ensure_dir(&config.image_dir).await?;

        let mut source = WebPageSource::connect(config)
            .await
            .ok_or_else(|| Error::WebDriverConnect(config.webdriver_url.clone()))?;

        let extraction = self.search_and_extract(&mut source, config).await;

        if let Err(e) = source.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        let outcome = extraction?;

        let written = self.format.writer(&report_path).write(&outcome.records)?;

        Ok(RunSummary {
            records_written: outcome.records.len(),
            report_path: written,
            stop_reason: outcome.stop_reason,
            pages_visited: outcome.pages_visited,
        })
    }

    async fn search_and_extract(
        &self,
        source: &mut WebPageSource,
        config: &ScraperConfig,
    ) -> Result<ExtractionOutcome> {
        source
            .open_search(&config.start_url, &self.criteria.phrase)
            .await?;

        let fetcher = HttpImageFetcher::new(Duration::from_secs(config.image_timeout_secs))?;

        let outcome = ExtractionPipeline::new(source, &fetcher, config.image_dir.clone())
            .run(&self.criteria)
            .await?;
        Ok(outcome)
    }
}
