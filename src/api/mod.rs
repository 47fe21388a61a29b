/*
 * Responsibility
 * - gateway 自身が持つ HTTP 面 (health, downstream stand-in) の公開口
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
