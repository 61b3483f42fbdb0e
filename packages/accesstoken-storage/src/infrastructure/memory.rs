//! In-Memory AccessToken Registry
//!
//! BTreeMap-based registry keyed by `(namespace, name)`. Nothing survives the
//! process. Only match-everything selectors are accepted.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::domain::{AccessToken, AccessTokenList, AccessTokenRegistry, Context, Selector};
use crate::error::{RegistryError, RegistryResult};

type Key = (Option<String>, String);

#[derive(Clone, Default)]
pub struct InMemoryAccessTokenRegistry {
    tokens: Arc<RwLock<BTreeMap<Key, AccessToken>>>,
}

impl InMemoryAccessTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens across all namespaces
    pub fn len(&self) -> usize {
        self.read().map(|tokens| tokens.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RegistryResult<RwLockReadGuard<'_, BTreeMap<Key, AccessToken>>> {
        self.tokens
            .read()
            .map_err(|_| RegistryError::internal("access token registry lock poisoned"))
    }

    fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, BTreeMap<Key, AccessToken>>> {
        self.tokens
            .write()
            .map_err(|_| RegistryError::internal("access token registry lock poisoned"))
    }

    fn key(ctx: &Context, name: &str) -> Key {
        (ctx.namespace().map(str::to_string), name.to_string())
    }

    fn check_cancelled(ctx: &Context) -> RegistryResult<()> {
        if ctx.is_cancelled() {
            return Err(RegistryError::cancelled(format!(
                "request {} was cancelled",
                ctx.request_id()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessTokenRegistry for InMemoryAccessTokenRegistry {
    async fn create_access_token(&self, ctx: &Context, token: &AccessToken) -> RegistryResult<()> {
        Self::check_cancelled(ctx)?;
        let key = Self::key(ctx, token.name());
        let mut tokens = self.write()?;
        if tokens.contains_key(&key) {
            return Err(RegistryError::already_exists(token.name()));
        }

        let mut stored = token.clone();
        stored.metadata.namespace = key.0.clone();
        tokens.insert(key, stored);
        debug!("[{}] stored access token {:?}", ctx.request_id(), token.name());
        Ok(())
    }

    async fn get_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<AccessToken> {
        Self::check_cancelled(ctx)?;
        self.read()?
            .get(&Self::key(ctx, name))
            .cloned()
            .ok_or_else(|| RegistryError::not_found(name))
    }

    async fn list_access_tokens(
        &self,
        ctx: &Context,
        label: &Selector,
        field: &Selector,
    ) -> RegistryResult<AccessTokenList> {
        Self::check_cancelled(ctx)?;
        for selector in [label, field] {
            if !selector.is_everything() {
                return Err(RegistryError::invalid_selector(selector.as_str()));
            }
        }

        let namespace = ctx.namespace();
        Ok(self
            .read()?
            .iter()
            .filter(|((ns, _), _)| namespace.is_none() || ns.as_deref() == namespace)
            .map(|(_, token)| token.clone())
            .collect())
    }

    async fn delete_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<()> {
        Self::check_cancelled(ctx)?;
        match self.write()?.remove(&Self::key(ctx, name)) {
            Some(_) => {
                debug!("[{}] deleted access token {:?}", ctx.request_id(), name);
                Ok(())
            }
            None => Err(RegistryError::not_found(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn token(name: &str) -> AccessToken {
        AccessToken::new(name, "console", "alice", "uid-1")
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let registry = InMemoryAccessTokenRegistry::new();
        let ctx = Context::new();

        registry.create_access_token(&ctx, &token("a")).await.unwrap();

        assert_eq!(registry.get_access_token(&ctx, "a").await.unwrap(), token("a"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_create() {
        let registry = InMemoryAccessTokenRegistry::new();
        let ctx = Context::new();

        registry.create_access_token(&ctx, &token("a")).await.unwrap();
        let err = registry.create_access_token(&ctx, &token("a")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let registry = InMemoryAccessTokenRegistry::new();
        let err = registry.get_access_token(&Context::new(), "nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("nope"));
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_namespaced() {
        let registry = InMemoryAccessTokenRegistry::new();
        let team_a = Context::new().with_namespace("team-a");
        let team_b = Context::new().with_namespace("team-b");

        registry.create_access_token(&team_a, &token("b")).await.unwrap();
        registry.create_access_token(&team_a, &token("a")).await.unwrap();
        registry.create_access_token(&team_b, &token("c")).await.unwrap();

        let everything = Selector::everything();
        let listed = registry
            .list_access_tokens(&team_a, &everything, &everything)
            .await
            .unwrap();
        assert_eq!(
            listed.iter().map(AccessToken::name).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(listed.iter().all(|t| t.metadata.namespace.as_deref() == Some("team-a")));

        let all = registry
            .list_access_tokens(&Context::new(), &everything, &everything)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let registry = InMemoryAccessTokenRegistry::new();
        let listed = registry
            .list_access_tokens(&Context::new(), &Selector::everything(), &Selector::everything())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_list_rejects_selectors() {
        let registry = InMemoryAccessTokenRegistry::new();
        let err = registry
            .list_access_tokens(&Context::new(), &Selector::new("app=console"), &Selector::everything())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSelector);
    }

    #[tokio::test]
    async fn test_delete() {
        let registry = InMemoryAccessTokenRegistry::new();
        let ctx = Context::new();
        registry.create_access_token(&ctx, &token("a")).await.unwrap();

        registry.delete_access_token(&ctx, "a").await.unwrap();
        assert!(registry.is_empty());

        let err = registry.delete_access_token(&ctx, "a").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cancelled_context() {
        let registry = InMemoryAccessTokenRegistry::new();
        let ctx = Context::new();
        ctx.cancellation_token().cancel();

        let err = registry.create_access_token(&ctx, &token("a")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert!(registry.is_empty());
    }
}
