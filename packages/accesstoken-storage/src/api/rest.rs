//! REST storage for access tokens
//!
//! | Operation | Returns                    | Registry call          | Errors                           |
//! |-----------|----------------------------|------------------------|----------------------------------|
//! | create    | handle, immediately        | spawned task           | `Validation` (sync), else Status |
//! | get       | token, after registry call | awaited inline         | registry error as returned       |
//! | list      | list, after registry call  | awaited inline         | registry error as returned       |
//! | update    | never succeeds             | none                   | `UnsupportedOperation` (sync)    |
//! | delete    | handle, immediately        | spawned task           | Status on the handle             |

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::completion::CompletionHandle;
use super::status::{RestResult, Status, StatusDetails};
use crate::config::StorageConfig;
use crate::domain::{AccessToken, AccessTokenList, AccessTokenRegistry, Context, Selector};
use crate::error::{ApiError, RegistryError, Result};
use crate::validation::validate_access_token;

/// Uniform storage contract served by the REST layer
///
/// Create, Update and Delete answer synchronously with either an error or a
/// [`CompletionHandle`]; callers must inspect the handle's value to learn
/// whether the backend succeeded. Get and List complete inline.
///
/// Create and Delete spawn onto the caller's tokio runtime and return
/// [`ApiError::NoRuntime`] when there is none.
#[async_trait]
pub trait RestStorage: Send + Sync {
    type Object: Send + 'static;
    type List: Send;

    fn create(&self, ctx: &Context, obj: Self::Object) -> Result<CompletionHandle<Self::Object>>;

    async fn get(&self, ctx: &Context, name: &str) -> Result<Self::Object>;

    async fn list(&self, ctx: &Context, label: &Selector, field: &Selector) -> Result<Self::List>;

    fn update(&self, ctx: &Context, obj: Self::Object) -> Result<CompletionHandle<Self::Object>>;

    fn delete(&self, ctx: &Context, name: &str) -> Result<CompletionHandle<Self::Object>>;
}

/// [`RestStorage`] for access tokens backed by an [`AccessTokenRegistry`]
///
/// Holds nothing but a shared reference to the registry and its settings;
/// all synchronization is left to the registry.
#[derive(Clone)]
pub struct AccessTokenStorage {
    registry: Arc<dyn AccessTokenRegistry>,
    config: StorageConfig,
}

impl AccessTokenStorage {
    pub fn new(registry: Arc<dyn AccessTokenRegistry>) -> Self {
        Self::with_config(registry, StorageConfig::default())
    }

    pub fn with_config(registry: Arc<dyn AccessTokenRegistry>, config: StorageConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn details(&self, name: &str) -> StatusDetails {
        StatusDetails::new(self.config.resource(), name)
    }
}

#[async_trait]
impl RestStorage for AccessTokenStorage {
    type Object = AccessToken;
    type List = AccessTokenList;

    fn create(&self, ctx: &Context, mut token: AccessToken) -> Result<CompletionHandle<AccessToken>> {
        validate_access_token(&token)?;
        token.metadata.creation_timestamp = Some(Utc::now());

        debug!("create {} {:?}: dispatching to registry", self.config.resource(), token.name());

        let registry = Arc::clone(&self.registry);
        let ctx = ctx.clone();
        CompletionHandle::make_async(self.details(token.name()), async move {
            registry.create_access_token(&ctx, &token).await?;
            Ok::<_, RegistryError>(RestResult::Object(token))
        })
    }

    async fn get(&self, ctx: &Context, name: &str) -> Result<AccessToken> {
        Ok(self.registry.get_access_token(ctx, name).await?)
    }

    async fn list(&self, ctx: &Context, label: &Selector, field: &Selector) -> Result<AccessTokenList> {
        Ok(self.registry.list_access_tokens(ctx, label, field).await?)
    }

    fn update(&self, _ctx: &Context, token: AccessToken) -> Result<CompletionHandle<AccessToken>> {
        debug!("update {} {:?}: rejected", self.config.resource(), token.name());
        Err(ApiError::unsupported("update", self.config.resource()))
    }

    fn delete(&self, ctx: &Context, name: &str) -> Result<CompletionHandle<AccessToken>> {
        debug!("delete {} {:?}: dispatching to registry", self.config.resource(), name);

        let registry = Arc::clone(&self.registry);
        let ctx = ctx.clone();
        let name = name.to_string();
        CompletionHandle::make_async(self.details(&name), async move {
            registry.delete_access_token(&ctx, &name).await?;
            Ok::<_, RegistryError>(RestResult::Status(Status::success()))
        })
    }
}
