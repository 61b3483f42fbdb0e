//! Domain layer for AccessToken storage
//!
//! # Domain Models
//!
//! - `ObjectMeta`: Name, namespace and bookkeeping shared by every resource
//! - `AccessToken`: OAuth access token granted to a client on behalf of a user
//! - `AccessTokenList`: Ordered result of a list query
//! - `Selector`: Opaque label/field selector expression
//! - `Context`: Per-call execution context
//!
//! # Port Trait
//!
//! - `AccessTokenRegistry`: Backend the REST storage delegates to

mod context;
mod ports;

pub use context::Context;
pub use ports::AccessTokenRegistry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// Metadata common to stored resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Unique name within the namespace
    #[serde(default)]
    pub name: String,
    /// Owning namespace (None = cluster scoped)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Backend-assigned identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    /// Set by the storage on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// OAuth access token
///
/// Grants `client_name` access on behalf of the user identified by
/// `user_name`/`user_uid`. Tokens are immutable once created.
///
/// # Required fields
///
/// `client_name`, `user_name` and `user_uid` must be non-empty; see
/// [`validate_access_token`](crate::validation::validate_access_token).
///
/// # Examples
///
/// ```rust
/// use accesstoken_storage::domain::AccessToken;
///
/// let token = AccessToken::new("token-1", "console", "alice", "uid-1");
/// assert_eq!(token.name(), "token-1");
/// assert_eq!(token.client_name, "console");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Client the token was issued to
    #[serde(default)]
    pub client_name: String,
    /// User the token acts for
    #[serde(default)]
    pub user_name: String,
    #[serde(default, rename = "userUID")]
    pub user_uid: String,
    /// Granted scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Lifetime in seconds from creation (0 = no expiry)
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    /// Authorize token this access token was exchanged for
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub authorize_token: String,
}

impl AccessToken {
    /// Create a token with the required fields set
    pub fn new(
        name: impl Into<String>,
        client_name: impl Into<String>,
        user_name: impl Into<String>,
        user_uid: impl Into<String>,
    ) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            client_name: client_name.into(),
            user_name: user_name.into(),
            user_uid: user_uid.into(),
            ..Default::default()
        }
    }

    /// A token carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = seconds;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Expiry instant, if the token has both a lifetime and a creation time
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_in <= 0 {
            return None;
        }
        let lifetime = chrono::Duration::try_seconds(self.expires_in)?;
        self.metadata.creation_timestamp?.checked_add_signed(lifetime)
    }
}

/// Ordered list of access tokens, as returned by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenList {
    #[serde(default)]
    pub items: Vec<AccessToken>,
}

impl AccessTokenList {
    pub fn new(items: Vec<AccessToken>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AccessToken> {
        self.items.iter()
    }
}

impl FromIterator<AccessToken> for AccessTokenList {
    fn from_iter<I: IntoIterator<Item = AccessToken>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Label or field selector expression
///
/// The storage forwards selectors untouched; evaluating them is up to the
/// registry. An empty expression selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn everything() -> Self {
        Self(String::new())
    }

    pub fn is_everything(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_new() {
        let token = AccessToken::new("token-1", "console", "alice", "uid-1");

        assert_eq!(token.name(), "token-1");
        assert_eq!(token.client_name, "console");
        assert_eq!(token.user_name, "alice");
        assert_eq!(token.user_uid, "uid-1");
        assert!(token.scopes.is_empty());
        assert_eq!(token.metadata.creation_timestamp, None);
    }

    #[test]
    fn test_access_token_builders() {
        let token = AccessToken::new("token-1", "console", "alice", "uid-1")
            .with_scopes(["user:info", "user:check-access"])
            .with_expires_in(3600)
            .with_label("app", "console");

        assert_eq!(token.scopes, vec!["user:info", "user:check-access"]);
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.metadata.labels.get("app").map(String::as_str), Some("console"));
    }

    #[test]
    fn test_expires_at() {
        let mut token = AccessToken::new("token-1", "console", "alice", "uid-1").with_expires_in(60);
        assert_eq!(token.expires_at(), None);

        let created = Utc::now();
        token.metadata.creation_timestamp = Some(created);
        assert_eq!(token.expires_at(), Some(created + chrono::Duration::seconds(60)));

        token.expires_in = 0;
        assert_eq!(token.expires_at(), None);
    }

    #[test]
    fn test_access_token_serde() {
        let token = AccessToken::new("token-1", "console", "alice", "uid-1");

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["metadata"]["name"], "token-1");
        assert_eq!(json["clientName"], "console");
        assert_eq!(json["userName"], "alice");
        assert_eq!(json["userUID"], "uid-1");
        assert!(json.get("refreshToken").is_none());

        let back: AccessToken = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_list_from_iter() {
        let list: AccessTokenList = vec![AccessToken::named("a"), AccessToken::named("b")]
            .into_iter()
            .collect();
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(
            list.iter().map(AccessToken::name).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(AccessTokenList::default().is_empty());
    }

    #[test]
    fn test_selector() {
        assert!(Selector::everything().is_everything());
        assert!(Selector::new("  ").is_everything());
        let sel = Selector::new("app=console");
        assert!(!sel.is_everything());
        assert_eq!(sel.to_string(), "app=console");
    }
}
