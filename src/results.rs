use crate::parsers::text::TextAnalysis;
use serde::{Deserialize, Serialize};

/// Placeholder written in place of an image path when no image was saved
pub const NO_IMAGE: &str = "No image";

/// Report column headers, in output order
pub const REPORT_HEADERS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image filename",
    "Search count",
    "Contains money flag",
];

/// Article fields as read from one result slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub date_text: String,
    pub description_text: String,
    pub image_url: Option<String>,
}

/// One row of the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    #[serde(rename = "date")]
    pub date_text: String,
    pub description: String,
    pub image_filename: String,
    pub search_phrase_count: u32,
    pub contains_money: bool,
}

/// A typed report cell
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

impl NewsRecord {
    /// Assemble a record from a raw article and its computed fields.
    ///
    /// `image_filename` is `None` when no image was saved, which is recorded
    /// as [`NO_IMAGE`].
    pub fn build(
        raw: RawArticle,
        search_phrase_count: u32,
        contains_money: bool,
        image_filename: Option<String>,
    ) -> Self {
        Self {
            title: raw.title,
            date_text: raw.date_text,
            description: raw.description_text,
            image_filename: image_filename.unwrap_or_else(|| NO_IMAGE.to_string()),
            search_phrase_count,
            contains_money,
        }
    }

    /// Assemble a record, running the text analysis for `phrase` first
    pub fn analyzed(raw: RawArticle, phrase: &str, image_filename: Option<String>) -> Self {
        let analysis = TextAnalysis::of(&raw.title, &raw.description_text, phrase);
        Self::build(
            raw,
            analysis.search_phrase_count,
            analysis.contains_money,
            image_filename,
        )
    }

    pub fn has_image(&self) -> bool {
        self.image_filename != NO_IMAGE
    }

    /// Cells in [`REPORT_HEADERS`] order
    pub fn to_row(&self) -> [ReportCell<'_>; 6] {
        [
            ReportCell::Text(&self.title),
            ReportCell::Text(&self.date_text),
            ReportCell::Text(&self.description),
            ReportCell::Text(&self.image_filename),
            ReportCell::Number(f64::from(self.search_phrase_count)),
            ReportCell::Bool(self.contains_money),
        ]
    }
}
