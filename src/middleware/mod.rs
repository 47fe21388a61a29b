/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::gate::apply(...) / http::apply(...)
 */
pub mod auth;
pub mod http;
