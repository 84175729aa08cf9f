use crate::parsers::text::clean_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub const RESULTS_SELECTOR: &str = "ul.search-results-module-results-menu > li";
pub const TITLE_SELECTOR: &str = "h3";
pub const DATE_SELECTOR: &str = "p.promo-timestamp";
pub const DESCRIPTION_SELECTOR: &str = "p.promo-description";
pub const WEBP_SOURCE_SELECTOR: &str = r#"source[type="image/webp"]"#;
pub const IMG_SELECTOR: &str = "img[src]";
pub const PAGE_COUNT_SELECTOR: &str = "div.search-results-module-page-counts";
pub const NEXT_PAGE_SELECTOR: &str = "div.search-results-module-next-page a[href]";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selectors are valid")
}

static RESULTS: Lazy<Selector> = Lazy::new(|| selector(RESULTS_SELECTOR));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(TITLE_SELECTOR));
static DATE: Lazy<Selector> = Lazy::new(|| selector(DATE_SELECTOR));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(DESCRIPTION_SELECTOR));
static WEBP_SOURCE: Lazy<Selector> = Lazy::new(|| selector(WEBP_SOURCE_SELECTOR));
static IMG: Lazy<Selector> = Lazy::new(|| selector(IMG_SELECTOR));
static PAGE_COUNT: Lazy<Selector> = Lazy::new(|| selector(PAGE_COUNT_SELECTOR));
static NEXT_PAGE: Lazy<Selector> = Lazy::new(|| selector(NEXT_PAGE_SELECTOR));

/// Fields found in one search result item; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// One snapshot of a search results page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultsPage {
    pub articles: Vec<ScrapedArticle>,
    /// Total number of result pages, when the page counter is present
    pub total_pages: Option<u32>,
    /// Link to the next results page as written in the markup
    pub next_page_url: Option<String>,
}

impl SearchResultsPage {
    /// Page count to paginate over.
    ///
    /// Without a counter, a page that lists articles counts as the only
    /// page and an empty one as no pages at all.
    pub fn page_count(&self) -> u32 {
        match self.total_pages {
            Some(total) => total,
            None if self.articles.is_empty() => 0,
            None => {
                ::log::warn!("Page counter missing; assuming a single page of results");
                1
            }
        }
    }
}

/// Extracts article items, the page counter and the next-page link
pub fn parse_search_results(html: &str) -> SearchResultsPage {
    let doc = Html::parse_document(html);

    let articles = doc
        .select(&RESULTS)
        .map(parse_result_item)
        .collect::<Vec<_>>();

    let total_pages = doc
        .select(&PAGE_COUNT)
        .next()
        .and_then(|counter| parse_page_count(&element_text(&counter)));

    let next_page_url = doc
        .select(&NEXT_PAGE)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    ::log::debug!(
        "Parsed {} result items (pages: {:?}, next: {:?})",
        articles.len(),
        total_pages,
        next_page_url
    );

    SearchResultsPage {
        articles,
        total_pages,
        next_page_url,
    }
}

fn parse_result_item(item: ElementRef<'_>) -> ScrapedArticle {
    let image_url = item
        .select(&WEBP_SOURCE)
        .filter_map(|source| source.value().attr("srcset"))
        .find_map(first_srcset_url)
        .or_else(|| {
            item.select(&IMG)
                .filter_map(|img| img.value().attr("src"))
                .map(str::trim)
                .find(|src| !src.is_empty())
                .map(str::to_string)
        });

    ScrapedArticle {
        title: first_text(item, &TITLE),
        date: first_text(item, &DATE),
        description: first_text(item, &DESCRIPTION),
        image_url,
    }
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
}

fn element_text(el: &ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// First candidate URL of a `srcset` attribute (`url 320w, url 640w`)
pub fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
}

/// Reads the page total from a counter like `1 of 1,234`
pub fn parse_page_count(text: &str) -> Option<u32> {
    text.split_whitespace()
        .last()
        .map(|last| last.replace(',', ""))
        .and_then(|digits| digits.parse::<u32>().ok())
}
