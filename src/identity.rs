//! Identity backed by saved credentials, prompting for a token when none
//! is saved.
//!
//! The credentials file is re-read on every check, so `onehack logout` in
//! another terminal signs out a running `onehack watch`.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use onehack_core::credentials::Credentials;
use onehack_core::error::{OneHackError, OneHackResult};
use onehack_core::identity::Identity;
use tracing::warn;

pub struct CliIdentity {
    credentials_path: PathBuf,
    prompted: Mutex<Option<String>>,
}

impl CliIdentity {
    pub fn new(credentials_path: PathBuf) -> Self {
        CliIdentity {
            credentials_path,
            prompted: Mutex::new(None),
        }
    }

    /// An unreadable file counts as signed out.
    fn credentials(&self) -> Credentials {
        Credentials::load_from(&self.credentials_path).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read saved credentials");
            Credentials::default()
        })
    }

    fn remembered(&self) -> Option<String> {
        self.prompted.lock().ok().and_then(|t| t.clone())
    }
}

#[async_trait]
impl Identity for CliIdentity {
    fn is_authenticated(&self) -> bool {
        self.credentials().is_logged_in()
    }

    fn current_user_id(&self) -> Option<String> {
        self.credentials().user_id
    }

    async fn access_token(&self) -> OneHackResult<String> {
        if let Some(token) = self
            .credentials()
            .access_token
            .or_else(|| self.remembered())
        {
            return Ok(token);
        }

        if !std::io::stdin().is_terminal() {
            return Err(OneHackError::Token(
                "No access token saved. Run `onehack login`".into(),
            ));
        }

        let token = prompt_token().await?;

        if let Ok(mut prompted) = self.prompted.lock() {
            *prompted = Some(token.clone());
        }

        Ok(token)
    }
}

pub async fn prompt_token() -> OneHackResult<String> {
    let token = tokio::task::spawn_blocking(|| rpassword::prompt_password("Access token: "))
        .await
        .map_err(|e| OneHackError::Token(e.to_string()))?
        .map_err(|e| OneHackError::Token(e.to_string()))?;

    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(OneHackError::Token("No token entered".into()));
    }

    Ok(token)
}
