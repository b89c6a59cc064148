//! JWT validation and the authenticated principal.
//!
//! Tokens are issued by the marketplace identity provider; this service only
//! validates them. Token generation is kept for tooling and tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::AppError;

/// JWT issuer identifier.
const ISSUER: &str = "freight-marketplace";
/// JWT audience identifier.
const AUDIENCE: &str = "freight-admin";

/// Types that can be used as JWT subjects.
pub trait JwtSubject {
    fn user_id(&self) -> Uuid;
    fn email(&self) -> &str;
    fn name(&self) -> &str;
    /// Role name (e.g., "administrator", "user").
    fn role(&self) -> &str;
    /// Named permissions granted to the subject.
    fn permissions(&self) -> &[String];
}

/// Principal role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Administrator,
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Administrator => "administrator",
            Self::User => "user",
        })
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Validated authentication info from JWT.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub permissions: Vec<String>,
}

impl AuthInfo {
    #[inline]
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Administrator)
    }

    /// Whether the principal holds a named permission. Administrators hold all.
    #[must_use]
    pub fn can(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }

    /// Require a named permission.
    ///
    /// # Errors
    /// Returns `AppError::PermissionDenied` when the permission is missing.
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.can(permission) {
            Ok(())
        } else {
            warn!(user_id = %self.user_id, permission, "Permission denied");
            Err(AppError::missing_permission(permission))
        }
    }
}

/// JWT claims structure following RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,

    pub role: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// JWT validation errors.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("invalid authorization format")]
    InvalidFormat,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
}

impl TryFrom<Claims> for AuthInfo {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidClaim("sub"))?,
            role: claims
                .role
                .parse()
                .map_err(|_| JwtError::InvalidClaim("role"))?,
            email: claims.email,
            name: claims.name,
            permissions: claims.permissions,
        })
    }
}

/// Pre-compiled JWT validator with cached keys. Cheap to clone.
#[derive(Clone)]
pub struct JwtValidator {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtValidator {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret_bytes)),
            validation,
        }
    }

    /// Generate an access token for any type implementing `JwtSubject`.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if encoding fails.
    pub fn generate_access_token<T: JwtSubject>(
        &self,
        subject: &T,
        ttl_minutes: u64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = i64::try_from(ttl_minutes).unwrap_or(i64::MAX / 60);
        let expiration = now + Duration::minutes(ttl);

        let claims = Claims {
            sub: subject.user_id().to_string(),
            aud: AUDIENCE.to_string(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),

            role: subject.role().to_string(),
            email: subject.email().to_string(),
            name: subject.name().to_string(),
            permissions: subject.permissions().to_vec(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("JWT encoding failed: {e}")))
    }

    /// Validate a JWT and extract auth info.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidToken` for bad signatures, audiences or expiry,
    /// and `JwtError::InvalidClaim` for malformed custom claims.
    pub fn validate(&self, token: &str) -> Result<AuthInfo, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| JwtError::InvalidToken)?;

        token_data.claims.try_into()
    }
}
