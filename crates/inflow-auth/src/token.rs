//! Fluent token construction.

use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, Header};

use crate::claims::{PrincipalClaims, SYSTEM_REACH};
use crate::error::{AuthError, Result};
use crate::signer::Signer;

/// Fluent builder for signed service tokens.
///
/// ```no_run
/// use inflow_auth::{Signer, TokenBuilder};
///
/// # fn main() -> inflow_auth::Result<()> {
/// let signer = Signer::new("c2hhcmVkLXNlY3JldA==")?;
/// let token = TokenBuilder::new(signer).with_system_reach().build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    signer: Signer,
    claims: PrincipalClaims,
}

impl TokenBuilder {
    /// Create a builder with default claims (60 second lifetime, no reach).
    pub fn new(signer: Signer) -> Self {
        Self {
            signer,
            claims: PrincipalClaims::default(),
        }
    }

    /// Mark the token as coming from a trusted system caller.
    pub fn with_system_reach(mut self) -> Self {
        self.claims.reach = Some(SYSTEM_REACH.to_string());
        self
    }

    /// Override the token lifetime.
    pub fn expires_in(mut self, lifetime: Duration) -> Self {
        self.claims.exp = self.claims.iat + lifetime.as_secs();
        self
    }

    /// Sign the claims and return the compact JWT.
    pub fn build(&self) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, &self.claims, self.signer.encoding_key())
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

/// Factory producing token builders that share one signer.
#[derive(Debug, Clone)]
pub struct TokenBuilderFactory {
    signer: Signer,
}

impl TokenBuilderFactory {
    pub fn new(signer: Signer) -> Self {
        Self { signer }
    }

    /// Mint a fresh builder with default claims.
    pub fn builder(&self) -> TokenBuilder {
        TokenBuilder::new(self.signer.clone())
    }
}
