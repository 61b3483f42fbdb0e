//! REST storage layer
//!
//! - `status`: uniform result envelope (`RestResult`, `Status`)
//! - `completion`: single-value completion handles for Create/Delete
//! - `rest`: the `RestStorage` contract and its AccessToken implementation

mod completion;
mod rest;
mod status;

pub use completion::CompletionHandle;
pub use rest::{AccessTokenStorage, RestStorage};
pub use status::{
    RestResult, ResultKind, Status, StatusCause, StatusDetails, StatusOutcome, StatusReason,
};
