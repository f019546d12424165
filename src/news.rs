//! Weather news aggregation over NewsData.io
//!
//! A request resolves to one or more fixed topic categories. Categories are
//! fetched one after another; the first failing category aborts the whole
//! page. Each category keeps its own next-page cursor.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::NewsConfig;
use crate::models::{NewsArticle, NewsPage};
use crate::upstream::{self, UpstreamClient};
use crate::{Result, WeatherWiseError};

const SERVICE: &str = "NewsData";

const UNTITLED: &str = "Untitled Article";
const NO_DESCRIPTION: &str = "No description available";
const UNKNOWN_DATE: &str = "Unknown";
const MISSING_LINK: &str = "#";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";
const EXCERPT_CHARS: usize = 100;

/// Filter value selecting every category
pub const ALL_CATEGORIES: &str = "all";

/// Fixed news topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCategory {
    Extreme,
    Climate,
    Research,
    Global,
}

impl NewsCategory {
    /// Every category, in fetch order
    pub const ALL: [NewsCategory; 4] = [
        NewsCategory::Extreme,
        NewsCategory::Climate,
        NewsCategory::Research,
        NewsCategory::Global,
    ];

    /// Key used in requests and on articles
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            NewsCategory::Extreme => "extreme",
            NewsCategory::Climate => "climate",
            NewsCategory::Research => "research",
            NewsCategory::Global => "global",
        }
    }

    /// Search phrase sent upstream
    #[must_use]
    pub fn query(self) -> &'static str {
        match self {
            NewsCategory::Extreme => "extreme weather",
            NewsCategory::Climate => "climate change",
            NewsCategory::Research => "weather research",
            NewsCategory::Global => "global weather events",
        }
    }

    /// Resolve a request filter; missing, empty and `all` select everything
    pub fn resolve(filter: Option<&str>) -> Result<Vec<NewsCategory>> {
        match filter.map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => Ok(Self::ALL.to_vec()),
            Some(key) => Ok(vec![key.parse()?]),
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NewsCategory {
    type Err = WeatherWiseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| WeatherWiseError::validation(format!("Unknown news category '{s}'")))
    }
}

/// NewsData.io search client
#[derive(Clone)]
pub struct NewsClient {
    client: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
    language: String,
}

impl NewsClient {
    /// Create a new client
    pub fn new(client: UpstreamClient, config: &NewsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    /// Fetch one page of articles for a category filter.
    ///
    /// `page` is passed to every selected category.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, filter: Option<&str>, page: Option<&str>) -> Result<NewsPage> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherWiseError::config("News API key not configured"))?;
        let categories = NewsCategory::resolve(filter)?;

        let mut news_page = NewsPage::default();
        for category in categories {
            let (articles, next) = self.fetch_category(api_key, category, page).await?;
            news_page.articles.extend(articles);
            if let Some(cursor) = next {
                news_page.next_page.insert(category.key().to_string(), cursor);
            }
        }

        info!(
            "Aggregated {} articles, {} categories with more pages",
            news_page.articles.len(),
            news_page.next_page.len()
        );
        Ok(news_page)
    }

    async fn fetch_category(
        &self,
        api_key: &str,
        category: NewsCategory,
        page: Option<&str>,
    ) -> Result<(Vec<NewsArticle>, Option<String>)> {
        let mut url = format!(
            "{}/news?apikey={}&q={}&language={}",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(category.query()),
            urlencoding::encode(&self.language)
        );
        if let Some(page) = page.filter(|p| !p.is_empty()) {
            url.push_str("&page=");
            url.push_str(&urlencoding::encode(page));
        }

        let response = upstream::send(SERVICE, self.client.get(url)).await?;
        if !response.status().is_success() {
            warn!("News request for {} returned {}", category, response.status());
            return Err(WeatherWiseError::upstream(
                SERVICE,
                format!("Failed to fetch news for {category}"),
            ));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            WeatherWiseError::upstream(SERVICE, format!("Invalid news response for {category}: {e}"))
        })?;

        if body.status != "success" {
            debug!("News status for {} was '{}', skipping", category, body.status);
            return Ok((Vec::new(), None));
        }

        let raw: Vec<RawArticle> = match body.results {
            Some(results) => serde_json::from_value(results).map_err(|e| {
                WeatherWiseError::upstream(SERVICE, format!("Invalid news results for {category}: {e}"))
            })?,
            None => return Ok((Vec::new(), None)),
        };

        let stamp = Utc::now().timestamp_millis();
        let articles: Vec<NewsArticle> = raw
            .into_iter()
            .enumerate()
            .map(|(index, article)| article.normalize(category, stamp, index))
            .collect();

        debug!("Fetched {} articles for {}", articles.len(), category);
        Ok((articles, body.next_page))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    /// Array on success, error object otherwise
    results: Option<serde_json::Value>,
    #[serde(rename = "nextPage")]
    next_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
}

impl RawArticle {
    fn normalize(self, category: NewsCategory, stamp: i64, index: usize) -> NewsArticle {
        let excerpt = non_empty(self.description)
            .or_else(|| non_empty(self.content).map(|c| c.chars().take(EXCERPT_CHARS).collect()))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        NewsArticle {
            id: format!("{}-{}-{}", category.key(), stamp, index),
            title: non_empty(self.title).unwrap_or_else(|| UNTITLED.to_string()),
            excerpt,
            category: category.key().to_string(),
            date: publish_date(self.pub_date.as_deref()),
            url: non_empty(self.link).unwrap_or_else(|| MISSING_LINK.to_string()),
            image: non_empty(self.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reduce an upstream publish timestamp to `YYYY-MM-DD`
fn publish_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => UNKNOWN_DATE.to_string(),
    }
}
