//! Session objects exchanged with the gateway's key-management API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An allowed URL within an API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedUrl {
    pub url: String,
    pub methods: Vec<String>,
}

/// Defines what an auth key has access to within one API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiAccessRules {
    /// Best to leave it empty and inherit from policies.
    pub api_name: String,

    /// Must match the key inside the map where this object is the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,

    /// What versions of the API.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,

    /// Allowed URLs in this API. Best to not define it and inherit from policies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_urls: Vec<AllowedUrl>,
}

/// JWT secret attached to a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtData {
    pub secret: String,
}

/// Gateway session object, covering the fields this service manages.
///
/// The wire shape follows the gateway's key-management API. Fields the
/// gateway treats as optional are skipped when empty so that updates do
/// not clobber values we never set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Deprecated but expected. Needs to be same as `rate`.
    pub allowance: i64,

    /// The number of requests allowed in the rate limiting window.
    pub rate: i64,
    /// The number of seconds that the rate window should encompass.
    pub per: i64,

    /// An epoch that defines when the key should expire. -1 means never.
    pub expires: i64,

    /// The maximum number of requests allowed during the quota period.
    pub quota_max: i64,
    /// An epoch that defines when the quota renews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renews: Option<i64>,
    /// The number of requests remaining for this key's quota.
    pub quota_remaining: i64,
    /// The time, in seconds, during which the quota is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renewal_rate: Option<i64>,

    /// API IDs mapped to the access rules this key has for them.
    pub access_rights: HashMap<String, ApiAccessRules>,

    /// ID of the organization this key belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// JWT secret attached to the key.
    pub jwt_data: JwtData,

    /// List of policy IDs to apply to this session.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apply_policies: Vec<String>,

    /// Key/value map embedded into the session, usable by gateway
    /// middleware such as transforms and header injection.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub meta_data: HashMap<String, serde_json::Value>,

    /// Tags embedded into analytics data when a request completes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Human-readable identifier carried into analytics, so keys can be
    /// tracked without exposing the token itself.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

impl Session {
    /// Create a session with the house defaults.
    pub fn new() -> Self {
        let mut session = Self {
            per: 60,              // Rate frame == every 60 seconds
            rate: 1000,           // How many requests per frame == 1000
            expires: -1,          // Never expires
            quota_max: -1,        // Infinite
            quota_remaining: -1,  // Infinite
            access_rights: HashMap::new(),
            ..Self::default()
        };
        session.allowance = session.rate; // Allowance must always be equal to rate

        session
    }

    /// Set the JWT secret.
    pub fn set_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_data.secret = secret.into();
        self
    }

    /// Add access to an API with the given versions.
    pub fn add_access(mut self, api_id: impl Into<String>, versions: &[&str]) -> Self {
        let api_id = api_id.into();
        let rules = ApiAccessRules {
            api_id: Some(api_id.clone()),
            versions: versions.iter().map(|v| v.to_string()).collect(),
            ..ApiAccessRules::default()
        };
        self.access_rights.insert(api_id, rules);

        self
    }

    /// Append policy IDs to the session.
    pub fn with_policies(mut self, policy_ids: &[&str]) -> Self {
        self.apply_policies
            .extend(policy_ids.iter().map(|p| p.to_string()));
        self
    }

    /// Set a human-readable alias.
    pub fn set_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}
