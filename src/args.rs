use clap::{ArgGroup, Parser, ValueEnum};
use news_sweep::{ReportFormat, ScraperConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "news-sweep")]
#[command(about = "Search a news site, keep recent articles and write a report")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["work_item", "phrase"])))]
pub struct Args {
    /// Work-item JSON file with search_phrase, news_category and months
    #[arg(short, long)]
    pub work_item: Option<PathBuf>,

    /// Search phrase (instead of a work item)
    #[arg(short, long)]
    pub phrase: Option<String>,

    /// Category/topic filter
    #[arg(long, requires = "phrase")]
    pub category: Option<String>,

    /// Months to look back; 0 and 1 mean the current month
    #[arg(short, long, default_value_t = 1)]
    pub months: u32,

    /// Scraper configuration JSON file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the report and images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver URL (also read from WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Xlsx)]
    pub format: FormatArg,
}

impl Args {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply_to(&self, mut config: ScraperConfig) -> ScraperConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
            config.image_dir = dir.clone();
        }
        config = config.with_webdriver_override(self.webdriver_url.clone());
        config.headless |= self.headless;
        config
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ReportFormat::Xlsx,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}
