use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::Result;
use crate::models::NewsPage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub page: Option<String>,
}

/// GET /api/news?category=&page=
#[tracing::instrument(skip(state))]
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsPage>> {
    let page = state
        .news
        .fetch_page(query.category.as_deref(), query.page.as_deref())
        .await?;
    Ok(Json(page))
}
