/*
 * Responsibility
 * - GET /health (疎通用)
 * - protected prefix 外なので gate は header を見ない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
