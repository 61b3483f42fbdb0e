//! AccessToken REST storage
//!
//! > "validate up front, hand back a handle, let the registry do the rest."
//!
//! ## Core Principles
//!
//! 1. **Validation Gate**: an invalid token never reaches the registry
//! 2. **Async Writes**: Create/Delete return a completion handle immediately and
//!    report registry failures as a terminal [`Status`] on that handle
//! 3. **Sync Reads**: Get/List await the registry directly and pass its errors
//!    through unchanged
//! 4. **Immutable Tokens**: Update is always rejected
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use accesstoken_storage::{
//!     AccessToken, AccessTokenStorage, Context, InMemoryAccessTokenRegistry, RestResult,
//!     RestStorage, Selector,
//! };
//!
//! let storage = AccessTokenStorage::new(Arc::new(InMemoryAccessTokenRegistry::new()));
//! let ctx = Context::new();
//!
//! // 1. Create (validated synchronously, stored asynchronously)
//! let token = AccessToken::new("token-1", "console", "alice", "uid-1");
//! match storage.create(&ctx, token)?.await {
//!     RestResult::Object(created) => println!("created {}", created.name()),
//!     RestResult::Status(status) => println!("failed: {}", status.message),
//! }
//!
//! // 2. Read
//! let token = storage.get(&ctx, "token-1").await?;
//! let all = storage.list(&ctx, &Selector::everything(), &Selector::everything()).await?;
//!
//! // 3. Delete
//! let status = storage.delete(&ctx, "token-1")?.await;
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;
pub mod testing;
pub mod validation;

pub use error::{ApiError, ErrorKind, RegistryError, Result};

pub use api::{
    AccessTokenStorage, CompletionHandle, RestResult, RestStorage, ResultKind, Status,
    StatusCause, StatusDetails, StatusOutcome, StatusReason,
};
pub use config::{ConfigError, StorageConfig};
pub use domain::{AccessToken, AccessTokenList, AccessTokenRegistry, Context, ObjectMeta, Selector};
pub use infrastructure::InMemoryAccessTokenRegistry;
pub use validation::{validate_access_token, FieldError, FieldErrorKind, ValidationError};
