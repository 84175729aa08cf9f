use crate::error::ParseError;
use chrono::{Datelike, Months, NaiveDate};

/// Publication date formats, tried in order after the month is normalized
pub const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y"];

/// Outcome of checking one article date against the look-back window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffDecision {
    /// The article is inside the window
    Accept,
    /// The article predates the window; nothing after it can qualify
    Stop,
    /// The date could not be read; callers fail open and keep going
    Unparseable,
}

impl CutoffDecision {
    /// Whether extraction should continue past this article
    pub fn keeps_going(&self) -> bool {
        !matches!(self, CutoffDecision::Stop)
    }
}

/// Drops the abbreviation dot from the month and maps `Sept` to `Sep`
fn normalize_month(date_text: &str) -> String {
    let trimmed = date_text.trim();
    let (month, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let month = match month.trim_end_matches('.') {
        "Sept" => "Sep",
        other => other,
    };
    format!("{} {}", month, rest.trim_start())
}

/// Parses a publication date such as `Jan 5, 2024`, `Jan. 5, 2024`,
/// `Sept. 12, 2024` or `March 3, 2024`
pub fn parse_article_date(date_text: &str) -> Result<NaiveDate, ParseError> {
    let normalized = normalize_month(date_text);

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
            return Ok(date);
        }
    }

    Err(ParseError(date_text.to_string()))
}

/// First day of the month `months_back - 1` months before `today`.
///
/// Zero and one month both mean "the current month".
pub fn cutoff_date(months_back: u32, today: NaiveDate) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let span = months_back.saturating_sub(1);

    first_of_month
        .checked_sub_months(Months::new(span))
        .unwrap_or(NaiveDate::MIN)
}

/// Look-back window resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCutoff {
    cutoff: NaiveDate,
}

impl DateCutoff {
    /// Resolve the window relative to a fixed `today`
    pub fn new(months_back: u32, today: NaiveDate) -> Self {
        Self {
            cutoff: cutoff_date(months_back, today),
        }
    }

    /// Resolve the window relative to the local calendar date
    pub fn from_today(months_back: u32) -> Self {
        Self::new(months_back, chrono::Local::now().date_naive())
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Decide whether an article dated `date_text` falls inside the window
    pub fn evaluate(&self, date_text: &str) -> CutoffDecision {
        match parse_article_date(date_text) {
            Ok(date) if date < self.cutoff => CutoffDecision::Stop,
            Ok(_) => CutoffDecision::Accept,
            Err(_) => CutoffDecision::Unparseable,
        }
    }
}

/// One-shot evaluation against a given `today`
pub fn evaluate(date_text: &str, months_back: u32, today: NaiveDate) -> CutoffDecision {
    DateCutoff::new(months_back, today).evaluate(date_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_known_formats() {
        assert_eq!(parse_article_date("Jan 5, 2024"), Ok(day(2024, 1, 5)));
        assert_eq!(parse_article_date("Jan. 5, 2024"), Ok(day(2024, 1, 5)));
        assert_eq!(parse_article_date("  Dec 31, 2023 "), Ok(day(2023, 12, 31)));
        assert_eq!(parse_article_date("Sept. 12, 2024"), Ok(day(2024, 9, 12)));
        assert_eq!(parse_article_date("Sept 12, 2024"), Ok(day(2024, 9, 12)));
        assert_eq!(parse_article_date("Sep. 12, 2024"), Ok(day(2024, 9, 12)));
    }

    #[test]
    fn test_parse_full_month_names() {
        assert_eq!(parse_article_date("March 3, 2024"), Ok(day(2024, 3, 3)));
        assert_eq!(parse_article_date("January 5, 2024"), Ok(day(2024, 1, 5)));
        assert_eq!(parse_article_date("September 12, 2024"), Ok(day(2024, 9, 12)));
        assert_eq!(parse_article_date("May 1, 2024"), Ok(day(2024, 5, 1)));
        assert_eq!(parse_article_date("July 4, 2023"), Ok(day(2023, 7, 4)));
    }

    #[test]
    fn test_full_month_name_before_cutoff_stops() {
        let today = day(2024, 5, 15);
        assert_eq!(evaluate("March 3, 2024", 1, today), CutoffDecision::Stop);
        assert_eq!(evaluate("March 3, 2024", 3, today), CutoffDecision::Accept);
        assert_eq!(evaluate("June 3, 2024", 1, today), CutoffDecision::Accept);
    }

    #[test]
    fn test_parse_rejects_unknown_formats() {
        assert!(parse_article_date("2024-01-05").is_err());
        assert!(parse_article_date("3 hours ago").is_err());
        assert!(parse_article_date("").is_err());
        assert!(parse_article_date("Septober 1, 2024").is_err());
    }

    #[test]
    fn test_cutoff_current_month() {
        let today = day(2024, 1, 15);
        assert_eq!(cutoff_date(0, today), day(2024, 1, 1));
        assert_eq!(cutoff_date(1, today), day(2024, 1, 1));
    }

    #[test]
    fn test_cutoff_crosses_year_boundary() {
        let today = day(2024, 2, 29);
        assert_eq!(cutoff_date(2, today), day(2024, 1, 1));
        assert_eq!(cutoff_date(3, today), day(2023, 12, 1));
        assert_eq!(cutoff_date(14, today), day(2023, 1, 1));
    }

    #[test]
    fn test_cutoff_is_monotonic() {
        let today = day(2024, 7, 19);
        let mut previous = cutoff_date(1, today);
        for months in 2..=48 {
            let current = cutoff_date(months, today);
            assert!(
                current <= previous,
                "cutoff for {} months ({}) is after {}",
                months,
                current,
                previous
            );
            previous = current;
        }
    }

    #[test]
    fn test_evaluate_accepts_inside_window() {
        let today = day(2024, 1, 15);
        assert_eq!(evaluate("Jan 5, 2024", 1, today), CutoffDecision::Accept);
        assert_eq!(evaluate("Jan. 1, 2024", 1, today), CutoffDecision::Accept);
    }

    #[test]
    fn test_evaluate_stops_before_cutoff() {
        let today = day(2024, 1, 15);
        assert_eq!(evaluate("Dec 31, 2023", 1, today), CutoffDecision::Stop);
        assert_eq!(evaluate("Dec. 31, 2023", 0, today), CutoffDecision::Stop);
        assert_eq!(evaluate("Dec 31, 2023", 2, today), CutoffDecision::Accept);
    }

    #[test]
    fn test_from_today_uses_local_date() {
        let today = chrono::Local::now().date_naive();
        assert_eq!(DateCutoff::from_today(2).cutoff(), cutoff_date(2, today));
    }

    #[test]
    fn test_evaluate_unparseable_keeps_going() {
        let decision = evaluate("Yesterday", 1, day(2024, 1, 15));
        assert_eq!(decision, CutoffDecision::Unparseable);
        assert!(decision.keeps_going());
        assert!(!CutoffDecision::Stop.keeps_going());
    }
}
