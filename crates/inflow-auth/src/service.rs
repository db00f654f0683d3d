//! Service-to-service authentication.

use jsonwebtoken::{decode, Algorithm, TokenData, Validation};

use crate::claims::PrincipalClaims;
use crate::error::{AuthError, Result};
use crate::signer::Signer;
use crate::token::TokenBuilder;

/// Authentication helper for calls between Inflow services.
///
/// The caller mints short-lived system tokens; the callee verifies them
/// against the same shared secret.
#[derive(Debug, Clone)]
pub struct ServiceAuth {
    signer: Signer,
}

impl ServiceAuth {
    /// Create a service auth helper from an existing signer.
    pub fn new(signer: Signer) -> Self {
        Self { signer }
    }

    /// Create a service auth helper from a base64-encoded secret.
    pub fn from_base64_secret(secret_b64: &str) -> Result<Self> {
        Ok(Self::new(Signer::new(secret_b64)?))
    }

    /// Mint a fresh system-reach token with the default lifetime.
    pub fn system_token(&self) -> Result<String> {
        TokenBuilder::new(self.signer.clone())
            .with_system_reach()
            .build()
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<PrincipalClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0; // No leeway for expiry checking

        let token_data: TokenData<PrincipalClaims> =
            decode(token, self.signer.decoding_key(), &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE, Engine as _};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_auth() -> ServiceAuth {
        let secret = URL_SAFE.encode(b"shared-secret-for-service-calls");
        ServiceAuth::from_base64_secret(&secret).unwrap()
    }

    #[test]
    fn test_system_token_roundtrip() {
        let auth = test_auth();

        let token = auth.system_token().unwrap();
        let claims = auth.verify(&token).unwrap();

        assert!(claims.is_system());
        assert_eq!(claims.exp, claims.iat + 60);
    }

    #[test]
    fn test_expired_token() {
        let auth = test_auth();

        // Manually craft a token that expired ten seconds ago.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = PrincipalClaims {
            iat: now - 3600,
            nbf: now - 3600,
            exp: now - 10,
            reach: None,
        };

        let secret = URL_SAFE.encode(b"shared-secret-for-service-calls");
        let signer = Signer::new(&secret).unwrap();
        let header = jsonwebtoken::Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, signer.encoding_key()).unwrap();

        let result = auth.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth1 = test_auth();
        let auth2 = ServiceAuth::from_base64_secret(
            &URL_SAFE.encode(b"a-completely-different-shared-secret"),
        )
        .unwrap();

        let token = auth1.system_token().unwrap();
        let result = auth2.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let auth = test_auth();
        let result = auth.verify("not.a.token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
