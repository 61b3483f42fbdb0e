//! Scripted registry test double
//!
//! Every call answers from the script: the configured error if one is set,
//! otherwise the configured token/list. Calls are recorded so tests can
//! assert which registry methods ran and with what arguments.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{AccessToken, AccessTokenList, AccessTokenRegistry, Context, Selector};
use crate::error::{RegistryError, RegistryResult};

/// Number of times each registry method was invoked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create: usize,
    pub get: usize,
    pub list: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.create + self.get + self.list + self.delete
    }
}

#[derive(Debug, Default)]
struct Recorded {
    calls: CallCounts,
    created: Vec<AccessToken>,
    deleted_name: Option<String>,
    completed_deletes: usize,
    selectors: Vec<(Selector, Selector)>,
    request_ids: Vec<Uuid>,
}

#[derive(Debug, Default)]
pub struct ScriptedRegistry {
    err: Option<RegistryError>,
    token: Option<AccessToken>,
    tokens: Option<AccessTokenList>,
    delay: Option<Duration>,
    recorded: Mutex<Recorded>,
}

impl ScriptedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call with `err`
    pub fn with_error(mut self, err: RegistryError) -> Self {
        self.err = Some(err);
        self
    }

    /// Token returned by `get_access_token`
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// List returned by `list_access_tokens`
    pub fn with_tokens(mut self, tokens: AccessTokenList) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sleep before answering create/delete
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn error(&self) -> Option<&RegistryError> {
        self.err.as_ref()
    }

    pub fn calls(&self) -> CallCounts {
        self.recorded().calls
    }

    pub fn created(&self) -> Vec<AccessToken> {
        self.recorded().created.clone()
    }

    /// Name passed to the last `delete_access_token` call
    pub fn deleted_name(&self) -> Option<String> {
        self.recorded().deleted_name.clone()
    }

    /// Deletes that ran past the scripted delay to their answer
    pub fn completed_deletes(&self) -> usize {
        self.recorded().completed_deletes
    }

    pub fn seen_selectors(&self) -> Vec<(Selector, Selector)> {
        self.recorded().selectors.clone()
    }

    pub fn seen_request_ids(&self) -> Vec<Uuid> {
        self.recorded().request_ids.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scripted_result(&self) -> RegistryResult<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AccessTokenRegistry for ScriptedRegistry {
    async fn create_access_token(&self, ctx: &Context, token: &AccessToken) -> RegistryResult<()> {
        {
            let mut recorded = self.recorded();
            recorded.calls.create += 1;
            recorded.request_ids.push(ctx.request_id());
            if self.err.is_none() {
                recorded.created.push(token.clone());
            }
        }
        self.pause().await;
        self.scripted_result()
    }

    async fn get_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<AccessToken> {
        {
            let mut recorded = self.recorded();
            recorded.calls.get += 1;
            recorded.request_ids.push(ctx.request_id());
        }
        self.scripted_result()?;
        self.token
            .clone()
            .ok_or_else(|| RegistryError::not_found(name))
    }

    async fn list_access_tokens(
        &self,
        ctx: &Context,
        label: &Selector,
        field: &Selector,
    ) -> RegistryResult<AccessTokenList> {
        {
            let mut recorded = self.recorded();
            recorded.calls.list += 1;
            recorded.request_ids.push(ctx.request_id());
            recorded.selectors.push((label.clone(), field.clone()));
        }
        self.scripted_result()?;
        Ok(self.tokens.clone().unwrap_or_default())
    }

    async fn delete_access_token(&self, ctx: &Context, name: &str) -> RegistryResult<()> {
        {
            let mut recorded = self.recorded();
            recorded.calls.delete += 1;
            recorded.request_ids.push(ctx.request_id());
            recorded.deleted_name = Some(name.to_string());
        }
        self.pause().await;
        self.recorded().completed_deletes += 1;
        self.scripted_result()
    }
}
