/*
 * Responsibility
 * - HTTP に依存しないドメインロジック (auth gate, token verification)
 */
pub mod auth;
