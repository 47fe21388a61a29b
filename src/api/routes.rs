/*
 * Responsibility
 * - gateway の URL 構造を定義
 * - /health は常に素通し、それ以外は fallback (downstream stand-in) へ
 * - gate は routes/fallback を登録した後に middleware::auth::gate::apply で掛ける
 */
use axum::{Router, routing::get};

use crate::api::handlers::{echo::echo, health::health};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .fallback(echo)
}
