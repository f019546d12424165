//! News article and page models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A normalized news article.
///
/// `id` is synthesized per request and is not stable across requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Category key, e.g. `climate`
    pub category: String,
    /// `YYYY-MM-DD` or `Unknown`
    pub date: String,
    pub url: String,
    pub image: String,
}

/// One page of aggregated articles
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewsPage {
    pub articles: Vec<NewsArticle>,
    /// Cursor for the next page, per category
    #[serde(rename = "nextPage")]
    pub next_page: BTreeMap<String, String>,
}

impl NewsPage {
    /// Whether any category has more results
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.next_page.is_empty()
    }
}
