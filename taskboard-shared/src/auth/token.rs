/// Bearer token issuing and verification
///
/// Two verification modes are supported:
///
/// - **Opaque**: any token of at least [`MIN_OPAQUE_TOKEN_LEN`] characters is
///   accepted. Used when no signing secret is configured.
/// - **JWT**: HS256 tokens issued by [`create_token`], checked for signature,
///   issuer (`taskboard`), expiry and not-before.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::token::{create_token, Claims, TokenVerifier};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-hs256-secret-of-at-least-32-bytes";
/// let user_id = Uuid::new_v4();
///
/// let token = create_token(&Claims::new(user_id), secret)?;
/// let verifier = TokenVerifier::jwt(secret)?;
///
/// assert_eq!(verifier.verify(&token)?, Some(user_id));
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer stamped into and required from every JWT
pub const ISSUER: &str = "taskboard";

/// Shortest accepted token in opaque mode
pub const MIN_OPAQUE_TOKEN_LEN: usize = 10;

/// Shortest accepted HS256 secret
pub const MIN_SECRET_LEN: usize = 32;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token is missing or too short
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, issuer or claim check failed
    #[error("Failed to validate token: {0}")]
    Invalid(String),

    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Signing secret too weak
    #[error("Signing secret must be at least {MIN_SECRET_LEN} characters")]
    WeakSecret,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Default token lifetime
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Claims for `user_id` valid for [`Self::DEFAULT_TTL_HOURS`]
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::hours(Self::DEFAULT_TTL_HOURS))
    }

    /// Claims with a custom lifetime
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| TokenError::Create(format!("Token encoding failed: {}", e)))
}

/// Validates an HS256 token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                TokenError::InvalidFormat(e.to_string())
            }
            _ => TokenError::Invalid(e.to_string()),
        })
}

/// Bearer token verification strategy
#[derive(Clone)]
pub enum TokenVerifier {
    /// Length check only
    Opaque,

    /// HS256 JWT with the given secret
    Jwt(String),
}

impl TokenVerifier {
    /// JWT verifier, rejecting secrets shorter than [`MIN_SECRET_LEN`]
    pub fn jwt(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret);
        }
        Ok(TokenVerifier::Jwt(secret))
    }

    /// Verifies a bearer token
    ///
    /// Returns the authenticated user ID in JWT mode and `None` in opaque
    /// mode, where tokens carry no identity.
    pub fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        match self {
            TokenVerifier::Opaque => {
                if token.trim().len() < MIN_OPAQUE_TOKEN_LEN {
                    return Err(TokenError::InvalidFormat(format!(
                        "token must be at least {} characters",
                        MIN_OPAQUE_TOKEN_LEN
                    )));
                }
                Ok(None)
            }
            TokenVerifier::Jwt(secret) => validate_token(token, secret).map(|c| Some(c.sub)),
        }
    }

    /// Mode name for logging
    pub fn mode(&self) -> &'static str {
        match self {
            TokenVerifier::Opaque => "opaque",
            TokenVerifier::Jwt(_) => "jwt",
        }
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TokenVerifier").field(&self.mode()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();
        let result = validate_token(&token, "another-secret-key-that-is-also-long-enough");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::hours(-2));
        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_token_is_format_error() {
        assert!(matches!(
            validate_token("not.a.jwt", SECRET),
            Err(TokenError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_opaque_verifier_length_rule() {
        let verifier = TokenVerifier::Opaque;
        assert_eq!(verifier.verify("0123456789").unwrap(), None);
        assert!(verifier.verify("short").is_err());
        assert!(verifier.verify("   abc    ").is_err());
    }

    #[test]
    fn test_jwt_verifier_requires_strong_secret() {
        assert!(matches!(TokenVerifier::jwt("too-short"), Err(TokenError::WeakSecret)));

        let verifier = TokenVerifier::jwt(SECRET).unwrap();
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();
        assert_eq!(verifier.verify(&token).unwrap(), Some(user_id));
        assert!(verifier.verify("0123456789abcdef").is_err());
    }
}
