use once_cell::sync::Lazy;
use regex::Regex;

/// Monetary amount patterns, checked in order
static MONEY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // $11.1 | $111,111.11
        r"\$\d+(?:,\d{3})*(?:\.\d{2})?",
        // 11 dollars
        r"\d+\s+dollars",
        // 11 USD
        r"\d+\s+USD",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("money patterns are valid"))
    .collect()
});

/// Case-insensitive count of `phrase` in `text`.
///
/// Occurrences are counted left to right without overlap. An empty phrase
/// never matches.
pub fn count_occurrences(text: &str, phrase: &str) -> u32 {
    if phrase.is_empty() {
        return 0;
    }

    let haystack = text.to_lowercase();
    let needle = phrase.to_lowercase();
    haystack.matches(needle.as_str()).count() as u32
}

/// Occurrences of the search phrase in an article's title plus its description
pub fn phrase_count(title: &str, description: &str, phrase: &str) -> u32 {
    count_occurrences(title, phrase) + count_occurrences(description, phrase)
}

/// Whether the text mentions an amount of money
pub fn contains_monetary_value(text: &str) -> bool {
    MONEY_PATTERNS.iter().any(|regex| regex.is_match(text))
}

/// Collapses runs of whitespace in scraped element text into single spaces
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-article text statistics used in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAnalysis {
    pub search_phrase_count: u32,
    pub contains_money: bool,
}

impl TextAnalysis {
    /// Analyze an article against the search phrase.
    ///
    /// The money flag is taken from the description only.
    pub fn of(title: &str, description: &str, phrase: &str) -> Self {
        Self {
            search_phrase_count: phrase_count(title, description, phrase),
            contains_money: contains_monetary_value(description),
        }
    }
}
