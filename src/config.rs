/*
 * Responsibility
 * - 環境変数から設定を読み込む (JWT_SECRET, protected prefixes, listener など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ読み込み、以降は不変
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::services::auth::paths::DEFAULT_PROTECTED_PREFIXES;
use crate::services::auth::token::{MAX_LEEWAY_SECONDS, is_hmac};
use crate::services::auth::{ProtectedPaths, TokenPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Shared HMAC secret; never logged.
    pub jwt_secret: String,
    pub protected_paths: ProtectedPaths,
    pub token_policy: TokenPolicy,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_secret", &"<redacted>")
            .field("protected_paths", &self.protected_paths)
            .field("token_policy", &self.token_policy)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("GATEWAY_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("GATEWAY_PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("GATEWAY_PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let protected_paths = match lookup("PROTECTED_PATH_PREFIXES") {
            Some(raw) => ProtectedPaths::new(parse_prefixes(&raw)?),
            None => ProtectedPaths::new(DEFAULT_PROTECTED_PREFIXES),
        };

        let algorithms = match lookup("JWT_ALGORITHMS") {
            Some(raw) => parse_algorithms(&raw)?,
            None => TokenPolicy::default().algorithms,
        };

        let leeway_seconds = match lookup("JWT_LEEWAY_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v <= MAX_LEEWAY_SECONDS)
                .ok_or(ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let token_policy = TokenPolicy {
            algorithms,
            leeway_seconds,
            issuer: non_empty(lookup("JWT_ISSUER")),
            audience: non_empty(lookup("JWT_AUDIENCE")),
        };

        let request_timeout_seconds = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let request_body_limit_bytes = match lookup("REQUEST_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            protected_paths,
            token_policy,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Comma-separated list; every entry must start with `/` and at least one is required.
pub fn parse_prefixes(raw: &str) -> Result<Vec<String>, ConfigError> {
    let prefixes = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    if prefixes.is_empty() || prefixes.iter().any(|p| !p.starts_with('/')) {
        return Err(ConfigError::Invalid("PROTECTED_PATH_PREFIXES"));
    }

    Ok(prefixes)
}

/// Comma-separated algorithm names, restricted to the HMAC family.
pub fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let alg = Algorithm::from_str(&name.to_ascii_uppercase())
            .map_err(|_| ConfigError::Invalid("JWT_ALGORITHMS"))?;
        if !is_hmac(alg) {
            return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
        }
        if !algorithms.contains(&alg) {
            algorithms.push(alg);
        }
    }

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
    }

    Ok(algorithms)
}
