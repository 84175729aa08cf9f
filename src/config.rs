use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// What to search for and how far back to look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Phrase typed into the site search
    pub phrase: String,

    /// Category/topic filter; `None` searches everything
    pub category: Option<String>,

    /// Look-back window in months; 0 and 1 both mean the current month
    pub months_back: u32,
}

impl SearchCriteria {
    pub fn new(phrase: impl Into<String>, category: Option<String>, months_back: u32) -> Self {
        Self {
            phrase: phrase.into(),
            category: category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            months_back,
        }
    }
}

/// Anything that can produce the run's search criteria
pub trait CriteriaSource {
    fn load(&self) -> Result<SearchCriteria, ConfigError>;
}

impl CriteriaSource for SearchCriteria {
    fn load(&self) -> Result<SearchCriteria, ConfigError> {
        Ok(self.clone())
    }
}

/// Work-item JSON file, either `{"payload": {...}}` or the bare payload
#[derive(Debug, Clone)]
pub struct WorkItemFile {
    pub path: PathBuf,
}

impl WorkItemFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CriteriaSource for WorkItemFile {
    fn load(&self) -> Result<SearchCriteria, ConfigError> {
        let mut file = File::open(&self.path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        criteria_from_work_item(&contents)
    }
}

#[derive(Debug, Deserialize)]
struct WorkItemPayload {
    search_phrase: Option<String>,
    news_category: Option<String>,
    months: Option<MonthsValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MonthsValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkItem {
    // Control-room shape
    Wrapped { payload: WorkItemPayload },
    // Local development shape
    Flat(WorkItemPayload),
}

/// Normalize a work-item payload into search criteria
pub fn criteria_from_work_item(json: &str) -> Result<SearchCriteria, ConfigError> {
    let payload = match serde_json::from_str::<WorkItem>(json)? {
        WorkItem::Wrapped { payload } => payload,
        WorkItem::Flat(payload) => payload,
    };

    let phrase = payload
        .search_phrase
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::MissingField("search_phrase"))?;

    let months_back = match payload.months {
        None => 0,
        Some(MonthsValue::Number(n)) => clamp_months(n),
        Some(MonthsValue::Text(text)) => {
            let n = text
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: "months",
                    value: text.clone(),
                })?;
            clamp_months(n)
        }
    };

    Ok(SearchCriteria::new(phrase, payload.news_category, months_back))
}

fn clamp_months(n: i64) -> u32 {
    n.clamp(0, i64::from(u32::MAX)) as u32
}

/// Runtime settings for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site home page where the search starts
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// Directory for the report
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory for downloaded images
    #[serde(default = "default_output_dir")]
    pub image_dir: PathBuf,

    /// Report file name inside `output_dir`
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Seconds to wait for the site and the search form to load
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Seconds to wait for an individual element
    #[serde(default = "default_element_timeout")]
    pub element_timeout_secs: u64,

    /// Seconds allowed for each image download
    #[serde(default = "default_image_timeout")]
    pub image_timeout_secs: u64,
}

fn default_start_url() -> String {
    "https://www.latimes.com/".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_report_file() -> String {
    "news_data.xlsx".to_string()
}

fn default_page_load_timeout() -> u64 {
    40
}

fn default_element_timeout() -> u64 {
    20
}

fn default_image_timeout() -> u64 {
    30
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            webdriver_url: default_webdriver_url(),
            headless: false,
            output_dir: default_output_dir(),
            image_dir: default_output_dir(),
            report_file: default_report_file(),
            page_load_timeout_secs: default_page_load_timeout(),
            element_timeout_secs: default_element_timeout(),
            image_timeout_secs: default_image_timeout(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with `WEBDRIVER_URL` if it is set
    pub fn with_env_overrides(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    /// Replace the WebDriver URL when `webdriver_url` is present and non-empty
    pub fn with_webdriver_override(mut self, webdriver_url: Option<String>) -> Self {
        if let Some(url) = webdriver_url.filter(|url| !url.is_empty()) {
            self.webdriver_url = url;
        }
        self
    }

    /// Full path of the report file
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_wrapped_work_item() {
        let json = r#"{"payload": {"search_phrase": "wildfire", "news_category": "California", "months": 2}}"#;
        let criteria = criteria_from_work_item(json).unwrap();
        assert_eq!(criteria, SearchCriteria::new("wildfire", Some("California".into()), 2));
    }

    #[test]
    fn test_flat_work_item() {
        let json = r#"{"search_phrase": "budget", "news_category": null, "months": "3"}"#;
        let criteria = criteria_from_work_item(json).unwrap();
        assert_eq!(criteria.phrase, "budget");
        assert_eq!(criteria.category, None);
        assert_eq!(criteria.months_back, 3);
    }

    #[test]
    fn test_work_item_normalization() {
        let json = r#"{"search_phrase": "  budget ", "news_category": "  ", "months": -4}"#;
        let criteria = criteria_from_work_item(json).unwrap();
        assert_eq!(criteria.phrase, "budget");
        assert_eq!(criteria.category, None);
        assert_eq!(criteria.months_back, 0);

        let json = r#"{"search_phrase": "budget"}"#;
        assert_eq!(criteria_from_work_item(json).unwrap().months_back, 0);
    }

    #[test]
    fn test_work_item_errors() {
        let err = criteria_from_work_item(r#"{"months": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("search_phrase")));

        let err = criteria_from_work_item(r#"{"search_phrase": "x", "months": "soon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "months", .. }));

        let err = criteria_from_work_item("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_work_item_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"payload": {{"search_phrase": "cats", "news_category": "Science", "months": 1}}}}"#
        )
        .unwrap();

        let criteria = WorkItemFile::new(file.path()).load().unwrap();
        assert_eq!(criteria.phrase, "cats");
        assert_eq!(criteria.category.as_deref(), Some("Science"));

        let missing = WorkItemFile::new("/definitely/not/here.json").load();
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config = ScraperConfig::from_json("{}").unwrap();
        assert_eq!(config.start_url, "https://www.latimes.com/");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(!config.headless);
        assert_eq!(config.report_path(), PathBuf::from("output/news_data.xlsx"));
        assert_eq!(config.element_timeout_secs, 20);
        assert_eq!(config.page_load_timeout_secs, 40);
    }

    #[test]
    fn test_config_overrides_from_json() {
        let json = r#"{"output_dir": "/tmp/run", "report_file": "r.json", "headless": true}"#;
        let config = ScraperConfig::from_json(json).unwrap();
        assert!(config.headless);
        assert_eq!(config.report_path(), PathBuf::from("/tmp/run/r.json"));
        assert_eq!(config.image_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_webdriver_override() {
        let json = r#"{"webdriver_url": "http://file-host:4444"}"#;
        let config = ScraperConfig::from_json(json).unwrap();

        let kept = config.clone().with_webdriver_override(None);
        assert_eq!(kept.webdriver_url, "http://file-host:4444");

        let kept = config.clone().with_webdriver_override(Some(String::new()));
        assert_eq!(kept.webdriver_url, "http://file-host:4444");

        let replaced = config.with_webdriver_override(Some("http://env-host:9515".to_string()));
        assert_eq!(replaced.webdriver_url, "http://env-host:9515");
    }
}
