//! Shared-secret bearer authentication
//!
//! Protected endpoints expect `Authorization: Bearer <token>`. The presented
//! token is hashed and compared against the hash of the configured secret, so
//! the comparison always covers 32 bytes regardless of token length.

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization Header")]
    MissingHeader,

    #[error("Authorization header must use the Bearer scheme")]
    BadScheme,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Authentication is not configured")]
    NotConfigured,
}

#[derive(Clone)]
pub struct SharedSecret {
    digest: Option<[u8; 32]>,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SharedSecret {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            digest: token.map(digest),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Check a raw `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<(), AuthError> {
        let expected = self.digest.as_ref().ok_or(AuthError::NotConfigured)?;
        let token = bearer_token(header.ok_or(AuthError::MissingHeader)?)?;

        let presented = digest(token);
        let diff = expected
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff == 0 {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Extract the token from `Bearer <token>` (scheme is case-insensitive)
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let header = header.trim();
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::BadScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::BadScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        Err(AuthError::InvalidToken)
    } else {
        Ok(token)
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_token() {
        let secret = SharedSecret::new(Some("s3cret"));
        assert_eq!(secret.authorize(Some("Bearer s3cret")), Ok(()));
        assert_eq!(secret.authorize(Some("bearer   s3cret ")), Ok(()));
    }

    #[test]
    fn test_rejects_wrong_or_missing_token() {
        let secret = SharedSecret::new(Some("s3cret"));
        assert_eq!(secret.authorize(None), Err(AuthError::MissingHeader));
        assert_eq!(secret.authorize(Some("Bearer nope")), Err(AuthError::InvalidToken));
        assert_eq!(secret.authorize(Some("Bearer s3cret2")), Err(AuthError::InvalidToken));
        assert_eq!(secret.authorize(Some("Bearer ")), Err(AuthError::BadScheme));
        assert_eq!(secret.authorize(Some("Basic s3cret")), Err(AuthError::BadScheme));
        assert_eq!(secret.authorize(Some("s3cret")), Err(AuthError::BadScheme));
    }

    #[test]
    fn test_unconfigured_rejects_everything() {
        let secret = SharedSecret::new(None);
        assert!(!secret.is_configured());
        assert_eq!(secret.authorize(Some("Bearer anything")), Err(AuthError::NotConfigured));
    }

    #[test]
    fn test_debug_hides_secret() {
        let secret = SharedSecret::new(Some("s3cret"));
        let shown = format!("{:?}", secret);
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("configured: true"));
    }
}
