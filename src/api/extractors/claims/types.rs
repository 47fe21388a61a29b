/*
 * Responsibility
 * - Handler から見える「検証済み claims」の型
 * - middleware が request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - payload をそのまま持つ (sub/username などの解釈は downstream の責務)
 * - request 1 本分だけ生きる。永続化しない
 */
use serde_json::Value;

use crate::services::auth::Claims;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthClaims(Claims);

impl AuthClaims {
    pub fn new(claims: Claims) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// `sub`, falling back to `username` as issued by the auth service.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub")
            .or_else(|| self.get("username"))
            .and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Claims {
        self.0
    }
}
