use clap::Parser;
use news_sweep::{CriteriaSource, NewsSearch, ScraperConfig, SearchCriteria, WorkItemFile};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let criteria = match (&args.work_item, &args.phrase) {
        (Some(path), _) => WorkItemFile::new(path).load()?,
        (None, Some(phrase)) => SearchCriteria::new(phrase.as_str(), args.category.clone(), args.months),
        (None, None) => return Err("either --work-item or --phrase is required".into()),
    };
    ::log::info!(
        "Searching for {:?} (category: {:?}, months: {})",
        criteria.phrase,
        criteria.category,
        criteria.months_back
    );

    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    }
    .with_env_overrides();
    let config = args.apply_to(config);

    println!("Note: a WebDriver server (e.g., ChromeDriver) must be running.");
    println!("Set WEBDRIVER_URL if it is not at {}", config.webdriver_url);

    let start_time = std::time::Instant::now();
    let summary = match NewsSearch::new(criteria)
        .with_config(config)
        .with_report_format(args.format.into())
        .run()
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            ::log::error!("Search run failed: {}", e);
            return Err(e.into());
        }
    };

    ::log::info!(
        "Wrote {} records to {} from {} page(s) in {:.2} seconds ({:?})",
        summary.records_written,
        summary.report_path.display(),
        summary.pages_visited,
        start_time.elapsed().as_secs_f64(),
        summary.stop_reason
    );
    Ok(())
}
