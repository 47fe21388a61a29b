//! Request-time authentication decision.
//!
//! `AuthGate` is a pure policy object: it looks at a path and its headers and
//! answers Allow or Deny. Writing the 401 and continuing the chain is the
//! job of the middleware that hosts it.

use std::fmt;

use axum::http::{HeaderMap, Request, StatusCode, header};

use super::paths::ProtectedPaths;
use super::token::{Claims, TokenError, TokenVerifier};

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was denied. Only for logs; every variant is a plain 401
/// on the wire.
#[derive(Debug)]
pub enum DenyReason {
    MissingHeader,
    MalformedHeader,
    InvalidToken(TokenError),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing authorization header"),
            Self::MalformedHeader => write!(f, "authorization header is not 'Bearer <token>'"),
            Self::InvalidToken(e) => write!(f, "invalid token: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum Decision {
    /// `None` for unprotected paths, the verified payload otherwise.
    Allow(Option<Claims>),
    Deny(DenyReason),
}

impl Decision {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Allow(_) => StatusCode::OK,
            Self::Deny(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Allow(claims) => claims.as_ref(),
            Self::Deny(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    paths: ProtectedPaths,
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(paths: ProtectedPaths, verifier: TokenVerifier) -> Self {
        Self { paths, verifier }
    }

    pub fn evaluate(&self, path: &str, headers: &HeaderMap) -> Decision {
        if !self.paths.is_protected(path) {
            return Decision::Allow(None);
        }

        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(reason) => return Decision::Deny(reason),
        };

        match self.verifier.verify(token) {
            Ok(claims) => Decision::Allow(Some(claims)),
            Err(e) => Decision::Deny(DenyReason::InvalidToken(e)),
        }
    }

    /// Same as [`evaluate`](Self::evaluate), classifying on the URI path
    /// (query string excluded).
    pub fn evaluate_request<B>(&self, req: &Request<B>) -> Decision {
        self.evaluate(req.uri().path(), req.headers())
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, DenyReason> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(DenyReason::MissingHeader)?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(DenyReason::MalformedHeader)
}
