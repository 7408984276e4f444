use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;

use crate::fetcher::InfoFetcher;

use super::models::{ErrorResponse, InfoResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No query parameter provided.")]
    MissingQuery,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingQuery => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn info_handler(
    State(fetcher): State<Arc<InfoFetcher>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<InfoResponse>, ApiError> {
    let query = first_query(params).ok_or(ApiError::MissingQuery)?;

    tracing::info!(%query, "info request");
    let data = fetcher.fetch(&query).await;

    Ok(Json(InfoResponse { query, data }))
}

/// First `query` value wins when the parameter is repeated; an empty value counts as missing.
fn first_query(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == "query")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
