/*!
 * Verified claims extractor
 *
 * Responsibility:
 * - gate が検証した claims を downstream handler に渡す
 * - axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthClaims (extractor 兼 extensions に載る型)
 */

mod core;
mod types;

pub use types::AuthClaims;
