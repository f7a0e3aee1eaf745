/// Authentication utilities
///
/// # Modules
///
/// - [`token`]: Bearer token issuing (HS256 JWT) and verification
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::token::TokenVerifier;
///
/// let verifier = TokenVerifier::Opaque;
/// assert!(verifier.verify("opaque-token-123").is_ok());
/// ```

pub mod token;

pub use token::{TokenError, TokenVerifier};
