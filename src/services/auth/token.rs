use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{error::Error as StdError, fmt};

/// Claims decoded from a verified token payload.
pub type Claims = Map<String, Value>;

/// Upper bound for clock-skew leeway (one day). jsonwebtoken computes
/// `now - leeway`, which must not underflow.
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

// Errors returned by token verification. They never reach the client;
// the gate collapses all of them into a 401.
#[derive(Debug)]
pub enum TokenError {
    EmptySecret,
    NoAlgorithms,
    UnsupportedAlgorithm(Algorithm),
    LeewayTooLarge(u64),
    Jwt(jsonwebtoken::errors::Error),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "signing secret is empty"),
            Self::NoAlgorithms => write!(f, "no accepted algorithms configured"),
            Self::UnsupportedAlgorithm(alg) => {
                write!(f, "unsupported algorithm {:?} (expected HS256/HS384/HS512)", alg)
            }
            Self::LeewayTooLarge(secs) => {
                write!(f, "leeway of {}s exceeds {}s", secs, MAX_LEEWAY_SECONDS)
            }
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

pub fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// What a token has to satisfy beyond a valid signature.
///
/// - `exp`/`nbf` are checked only when the token carries them.
/// - `iss`/`aud` are checked only when configured here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            leeway_seconds: 0,
            issuer: None,
            audience: None,
        }
    }
}

/// HMAC (shared secret) token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, policy: &TokenPolicy) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let first = *policy.algorithms.first().ok_or(TokenError::NoAlgorithms)?;
        if let Some(alg) = policy.algorithms.iter().find(|a| !is_hmac(**a)) {
            return Err(TokenError::UnsupportedAlgorithm(*alg));
        }
        if policy.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(TokenError::LeewayTooLarge(policy.leeway_seconds));
        }

        let mut validation = Validation::new(first);
        // The header's `alg` picks the algorithm, as long as it is one of these.
        validation.algorithms = policy.algorithms.clone();
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = policy.leeway_seconds;

        if let Some(issuer) = &policy.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &policy.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify the signature and time claims, then hand back the payload as-is.
    ///
    /// `exp`/`nbf` that are not unsigned integers fail with `InvalidClaimFormat`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    pub(crate) const SECRET: &str = "supersecretkey";

    pub(crate) fn sign_with(alg: Algorithm, secret: &str, claims: &Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub(crate) fn sign(secret: &str, claims: &Value) -> String {
        sign_with(Algorithm::HS256, secret, claims)
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, &TokenPolicy::default()).unwrap()
    }

    #[test]
    fn accepts_token_without_time_claims() {
        let token = sign(SECRET, &json!({"sub": "alice"}));
        let claims = verifier().verify(&token).unwrap();

        assert_eq!(Value::Object(claims), json!({"sub": "alice"}));
    }

    #[test]
    fn accepts_every_hmac_algorithm_by_default() {
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign_with(alg, SECRET, &json!({"username": "bob"}));
            assert!(verifier().verify(&token).is_ok(), "{:?}", alg);
        }
    }

    #[test]
    fn rejects_algorithm_outside_accepted_set() {
        let policy = TokenPolicy {
            algorithms: vec![Algorithm::HS256],
            ..TokenPolicy::default()
        };
        let verifier = TokenVerifier::new(SECRET, &policy).unwrap();
        let token = sign_with(Algorithm::HS512, SECRET, &json!({"sub": "alice"}));

        assert!(matches!(verifier.verify(&token), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign("another-secret", &json!({"sub": "alice"}));
        assert!(matches!(verifier().verify(&token), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(SECRET, &json!({"sub": "alice", "exp": now() - 120}));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn accepts_unexpired_token() {
        let token = sign(SECRET, &json!({"sub": "alice", "exp": now() + 3600}));
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims["sub"], "alice");
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let policy = TokenPolicy {
            leeway_seconds: 300,
            ..TokenPolicy::default()
        };
        let verifier = TokenVerifier::new(SECRET, &policy).unwrap();
        let token = sign(SECRET, &json!({"sub": "alice", "exp": now() - 120}));

        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn rejects_token_not_yet_valid() {
        let token = sign(SECRET, &json!({"sub": "alice", "nbf": now() + 3600}));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn rejects_non_integer_time_claim() {
        let token = sign(SECRET, &json!({"sub": "alice", "nbf": -5}));
        assert!(matches!(verifier().verify(&token), Err(TokenError::Jwt(_))));

        let token = sign(SECRET, &json!({"sub": "alice", "exp": "tomorrow"}));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn rejects_tampered_payload() {
        let token = sign(SECRET, &json!({"sub": "alice"}));
        let parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory"}"#);
        let tampered = format!("{}.{}.{}", parts[0], forged, parts[2]);

        assert!(verifier().verify(&tampered).is_err());
    }

    #[test]
    fn rejects_unsigned_none_token() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"alice"}"#);
        let token = format!("{}.{}.", header, payload);

        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn rejects_malformed_structure() {
        let v = verifier();
        assert!(v.verify("").is_err());
        assert!(v.verify("abc").is_err());
        assert!(v.verify("abc.def").is_err());
        assert!(v.verify("!!!.@@@.###").is_err());
    }

    #[test]
    fn issuer_and_audience_checked_only_when_configured() {
        let token = sign(SECRET, &json!({"sub": "alice", "iss": "auth", "aud": "todo"}));
        assert!(verifier().verify(&token).is_ok());

        let policy = TokenPolicy {
            issuer: Some("auth".into()),
            audience: Some("todo".into()),
            ..TokenPolicy::default()
        };
        let strict = TokenVerifier::new(SECRET, &policy).unwrap();
        assert!(strict.verify(&token).is_ok());

        let other = sign(SECRET, &json!({"sub": "alice", "iss": "elsewhere", "aud": "todo"}));
        assert!(strict.verify(&other).is_err());
    }

    #[test]
    fn construction_rejects_bad_settings() {
        assert!(matches!(
            TokenVerifier::new("", &TokenPolicy::default()),
            Err(TokenError::EmptySecret)
        ));

        let none = TokenPolicy {
            algorithms: vec![],
            ..TokenPolicy::default()
        };
        assert!(matches!(
            TokenVerifier::new(SECRET, &none),
            Err(TokenError::NoAlgorithms)
        ));

        let rsa = TokenPolicy {
            algorithms: vec![Algorithm::RS256],
            ..TokenPolicy::default()
        };
        assert!(matches!(
            TokenVerifier::new(SECRET, &rsa),
            Err(TokenError::UnsupportedAlgorithm(Algorithm::RS256))
        ));
    }

    #[test]
    fn construction_rejects_leeway_beyond_a_day() {
        let huge = TokenPolicy {
            leeway_seconds: u64::MAX,
            ..TokenPolicy::default()
        };
        assert!(matches!(
            TokenVerifier::new(SECRET, &huge),
            Err(TokenError::LeewayTooLarge(u64::MAX))
        ));

        let max = TokenPolicy {
            leeway_seconds: MAX_LEEWAY_SECONDS,
            ..TokenPolicy::default()
        };
        let verifier = TokenVerifier::new(SECRET, &max).unwrap();
        let token = sign(SECRET, &json!({"sub": "alice", "exp": 4_102_444_800u64}));
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains(SECRET));
    }
}
