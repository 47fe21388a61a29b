//! Downstream stand-in.
//!
//! Real dispatch to the task/profile/search services lives outside this
//! process. This handler sits where that dispatch would, and reports what
//! the gate forwarded so the wiring can be checked end to end.

use axum::{
    Json,
    http::{Method, Uri},
};
use serde::Serialize;
use serde_json::Value;

use crate::api::extractors::AuthClaims;

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    pub claims: Option<Value>,
}

pub async fn echo(method: Method, uri: Uri, claims: Option<AuthClaims>) -> Json<EchoResponse> {
    Json(EchoResponse {
        method: method.to_string(),
        path: uri.path().to_string(),
        claims: claims.map(|c| Value::Object(c.into_inner())),
    })
}
