use axum::{
    extract::{Query, State},
    response::Redirect,
    Extension, Json,
};
use newswire_core::{parse_start_date, NewsFilters};
use newswire_db::NewsRow;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct NewsQuery {
    pub country: Option<String>,
    pub language: Option<String>,
    pub start_date: Option<String>,
}

impl NewsQuery {
    /// Translate raw query parameters into filters. Empty values are absent.
    fn into_filters(self) -> Result<NewsFilters, String> {
        let start_date = non_empty(self.start_date)
            .map(|raw| parse_start_date(&raw))
            .transpose()?;
        Ok(NewsFilters {
            country: non_empty(self.country),
            language: non_empty(self.language),
            start_date,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) async fn redirect_root() -> Redirect {
    Redirect::to("/api/news")
}

pub(super) async fn list_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsRow>>, ApiError> {
    let filters = query.into_filters().map_err(|reason| {
        tracing::error!(request_id = %req_id.0, %reason, "malformed news filter");
        ApiError::query_failed()
    })?;

    let rows = state.store.find(&filters).await.map_err(|e| {
        tracing::error!(request_id = %req_id.0, error = %e, "news query failed");
        ApiError::query_failed()
    })?;

    tracing::debug!(request_id = %req_id.0, count = rows.len(), "news query served");
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_parameters_become_absent_filters() {
        let query = NewsQuery {
            country: Some("  ".to_string()),
            language: Some(String::new()),
            start_date: Some(String::new()),
        };
        assert_eq!(query.into_filters().expect("filters"), NewsFilters::default());
    }

    #[test]
    fn unparseable_start_date_is_rejected() {
        let query = NewsQuery {
            start_date: Some("31/12/2024".to_string()),
            ..NewsQuery::default()
        };
        assert!(query.into_filters().is_err());
    }
}
