//! AuthGate を全リクエストに掛ける → 許可なら claims を extensions に入れる
//!
//! - routing/dispatch より前に走る (deny は chain 全体を打ち切る)
//! - deny は body なしの 401。理由はログにだけ残す
//! - token 自体はログに出さない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::extractors::AuthClaims;
use crate::services::auth::Decision;
use crate::state::AppState;

/// ルーター全体 (fallback 含む) に gate を掛ける。
///
/// routes / fallback を登録した後に呼ぶこと:
/// ```ignore
/// let router = api::routes();
/// let router = middleware::auth::gate::apply(router, state.clone());
/// let app = router.with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let decision = state.gate.evaluate_request(&req);
    let status = decision.status();

    match decision {
        Decision::Allow(claims) => {
            if let Some(claims) = claims {
                // middleware → extractor への受け渡し
                req.extensions_mut().insert(AuthClaims::new(claims));
            }
            next.run(req).await
        }
        Decision::Deny(reason) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %reason,
                "request rejected by auth gate"
            );
            status.into_response()
        }
    }
}
