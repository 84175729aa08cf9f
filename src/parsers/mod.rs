pub mod html;
pub mod text;


pub use html::{SearchResultsPage, ScrapedArticle};
pub use text::{TextAnalysis, contains_monetary_value, phrase_count};
