/// Factory: build `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{AuthGate, TokenVerifier};

pub fn build_auth_gate(config: &Config) -> Result<Arc<AuthGate>, AppError> {
    let verifier = TokenVerifier::new(&config.jwt_secret, &config.token_policy).map_err(|e| {
        tracing::error!(error = %e, "failed to build token verifier");
        AppError::Internal
    })?;

    tracing::info!(
        prefixes = ?config.protected_paths.prefixes(),
        algorithms = ?config.token_policy.algorithms,
        "auth gate configured"
    );

    Ok(Arc::new(AuthGate::new(config.protected_paths.clone(), verifier)))
}
