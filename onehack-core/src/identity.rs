//! Identity capability.
//!
//! Login itself is handled elsewhere; the bookmark store only needs to know
//! whether someone is signed in, who they are, and how to get a bearer token.

use async_trait::async_trait;

use crate::error::{OneHackError, OneHackResult};

#[async_trait]
pub trait Identity: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_user_id(&self) -> Option<String>;

    /// A bearer token valid for the bookmark API. Implementations may fall
    /// back to an interactive flow when no token is available silently.
    async fn access_token(&self) -> OneHackResult<String>;
}

/// Fixed credentials. `StaticIdentity::anonymous()` is signed out.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
    token: Option<String>,
}

impl StaticIdentity {
    pub fn anonymous() -> Self {
        StaticIdentity::default()
    }

    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        StaticIdentity {
            user_id: Some(user_id.into()),
            token: Some(token.into()),
        }
    }
}

#[async_trait]
impl Identity for StaticIdentity {
    fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    async fn access_token(&self) -> OneHackResult<String> {
        self.token
            .clone()
            .ok_or_else(|| OneHackError::Token("Not logged in".into()))
    }
}
