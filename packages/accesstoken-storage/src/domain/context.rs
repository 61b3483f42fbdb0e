//! Execution context handed through to the registry

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Per-call execution context
///
/// Carries the request id, namespace, requesting user and a cancellation
/// token. The REST storage never looks inside; it only hands the context to
/// the registry, which may honor the cancellation.
#[derive(Debug, Clone)]
pub struct Context {
    request_id: Uuid,
    namespace: Option<String>,
    user: Option<String>,
    cancellation: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            namespace: None,
            user: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Tie this context to an outer cancellation scope.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let ctx = Context::new();
        assert_eq!(ctx.namespace(), None);
        assert_eq!(ctx.user(), None);
        assert!(!ctx.is_cancelled());
        assert_ne!(ctx.request_id(), Context::new().request_id());
    }

    #[test]
    fn test_clone_shares_cancellation() {
        let ctx = Context::new().with_namespace("ns").with_user("alice");
        let forwarded = ctx.clone();

        ctx.cancellation_token().cancel();

        assert!(forwarded.is_cancelled());
        assert_eq!(forwarded.namespace(), Some("ns"));
        assert_eq!(forwarded.user(), Some("alice"));
        assert_eq!(forwarded.request_id(), ctx.request_id());
    }

    #[test]
    fn test_child_token_follows_parent() {
        let parent = CancellationToken::new();
        let ctx = Context::new().with_cancellation(parent.child_token());
        parent.cancel();
        assert!(ctx.is_cancelled());
    }
}
