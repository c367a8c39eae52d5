//! crates/professor_directory_core/src/auth.rs
//!
//! Admin authentication: a single configured identity, exchanged for a signed
//! HS256 token that can be checked without touching the database.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

/// Tokens are valid for 24 hours after issuance. There is no revocation.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Used only when no signing secret is configured.
pub const FALLBACK_SIGNING_KEY: &str = "your_super_secret_jwt_key_here_change_in_production";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token error: {0}")]
    Internal(String),
}

/// The one username/password pair allowed into the admin panel.
#[derive(Clone)]
pub struct AdminIdentity {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminIdentity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Claims carried inside an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: AdminClaims,
}

#[derive(Clone)]
pub struct AuthService {
    identity: AdminIdentity,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(identity: AdminIdentity, secret: &[u8]) -> Self {
        Self {
            identity,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Exact match on both halves. A wrong username and a wrong password are
    /// indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if username != self.identity.username || password != self.identity.password {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let claims = AdminClaims {
            username: self.identity.username.clone(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;

        Ok(IssuedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?
            .claims;

        if claims.role != ADMIN_ROLE {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}
