//! Registry Port (Trait Interface)
//!
//! Port/Adapter pattern for backend flexibility:
//! - Testing: `ScriptedRegistry` (scripted responses + call recording)
//! - Local: `InMemoryAccessTokenRegistry`
//! - Production: whatever persistent backend the host wires in

use async_trait::async_trait;

use super::{AccessToken, AccessTokenList, Context, Selector};
use crate::error::RegistryResult;

/// AccessToken registry port
///
/// Raw persistence for access tokens. Implementations are shared across
/// concurrent calls and are responsible for their own synchronization.
#[async_trait]
pub trait AccessTokenRegistry: Send + Sync {
    /// Persist a new token
    async fn create_access_token(&self, ctx: &Context, token: &AccessToken) -> RegistryResult<()>;

    /// Fetch a token by name
    async fn get_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<AccessToken>;

    /// List tokens matching the selectors
    async fn list_access_tokens(
        &self,
        ctx: &Context,
        label: &Selector,
        field: &Selector,
    ) -> RegistryResult<AccessTokenList>;

    /// Delete a token by name
    async fn delete_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<()>;
}
