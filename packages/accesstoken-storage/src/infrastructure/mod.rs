//! Infrastructure layer - Registry adapters
//!
//! Only a process-local registry lives here; persistent backends are provided
//! by the host application through [`AccessTokenRegistry`](crate::domain::AccessTokenRegistry).

pub mod memory;

pub use memory::InMemoryAccessTokenRegistry;
