//! Claims carried by service tokens.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Reach claim value identifying a trusted system caller.
pub const SYSTEM_REACH: &str = "system";

/// Default lifetime of a service token.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60);

/// JWT claims for service-to-service tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalClaims {
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Not valid before (Unix timestamp)
    pub nbf: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Caller reach, e.g. `"system"` for trusted internal callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<String>,
}

impl PrincipalClaims {
    /// Create claims issued now and expiring after `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        Self {
            iat: now,
            nbf: now,
            exp: now + lifetime.as_secs(),
            reach: None,
        }
    }

    /// Check whether the claims carry system reach.
    pub fn is_system(&self) -> bool {
        self.reach.as_deref() == Some(SYSTEM_REACH)
    }
}

impl Default for PrincipalClaims {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIFETIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_claims_window() {
        let claims = PrincipalClaims::default();
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp, claims.iat + 60);
        assert_eq!(claims.reach, None);
    }

    #[test]
    fn test_is_system() {
        let mut claims = PrincipalClaims::default();
        assert!(!claims.is_system());

        claims.reach = Some(SYSTEM_REACH.to_string());
        assert!(claims.is_system());

        claims.reach = Some("user".to_string());
        assert!(!claims.is_system());
    }

    #[test]
    fn test_reach_skipped_when_absent() {
        let claims = PrincipalClaims::default();
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("reach"));
    }
}
