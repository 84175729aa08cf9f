use thiserror::Error;

/// A date string matched none of the known publication date formats
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date format: {0:?}")]
pub struct ParseError(pub String);

/// Failures reading from the page-data source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("timed out after {0}s waiting for {1}")]
    Timeout(u64, String),

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("unknown article slot {0}")]
    UnknownSlot(usize),

    #[error("page source unavailable: {0}")]
    Unavailable(String),

    #[error("webdriver error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

/// Moving to the next results page failed
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("no next page link on page {0}")]
    NoNextPage(u32),

    #[error("navigation failed: {0}")]
    Failed(String),
}

/// Image download failures
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid image url: {0}")]
    InvalidUrl(String),
}

/// One-time search setup (sort order, category filter) failed
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("category {0:?} not offered by the search page")]
    CategoryNotFound(String),

    #[error("sort control unavailable: {0}")]
    SortUnavailable(String),

    #[error("webdriver error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end an extraction run with zero records
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("page source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

/// Top-level error for a complete search run
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not connect to WebDriver at {0}")]
    WebDriverConnect(String),

    #[error("image client could not be built: {0}")]
    ImageClient(#[from] FetchError),

    #[error("search could not be started: {0}")]
    Search(#[from] SourceError),

    #[error("extraction failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
