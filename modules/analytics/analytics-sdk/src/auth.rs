//! Authorization precondition awaited before every API call

use async_trait::async_trait;

use crate::error::ClientError;

/// The signed-in user as seen by the client
#[derive(Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Display name
    pub username: String,

    /// Bearer token attached to every request, if any
    pub bearer_token: Option<String>,
}

impl CurrentUser {
    /// User without credentials
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            username: "anonymous".to_owned(),
            bearer_token: None,
        }
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("username", &self.username)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Resolves the current user before a request is sent
///
/// A failing gate short-circuits the call; no HTTP request is made.
#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Resolve the current user
    ///
    /// # Errors
    /// Returns [`ClientError::Unauthorized`] when no user is signed in
    async fn current_user(&self) -> Result<CurrentUser, ClientError>;
}

/// Gate that lets every call through anonymously
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl AuthGate for AllowAll {
    async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        Ok(CurrentUser::anonymous())
    }
}

/// Gate holding a fixed bearer token
///
/// An empty token is treated as signed out.
#[derive(Clone)]
pub struct StaticTokenGate {
    username: String,
    token: String,
}

impl StaticTokenGate {
    /// Create a gate for `username` authenticating with `token`
    #[must_use]
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthGate for StaticTokenGate {
    async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        if self.token.trim().is_empty() {
            return Err(ClientError::Unauthorized(format!(
                "no credentials for user '{}'",
                self.username
            )));
        }
        Ok(CurrentUser {
            username: self.username.clone(),
            bearer_token: Some(self.token.clone()),
        })
    }
}

impl std::fmt::Debug for StaticTokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenGate")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
