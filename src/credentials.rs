//! API credentials and the interactive prompt used when they are not
//! supplied on the command line.
//!
//! Prompting is behind the [`CredentialSource`] trait so argument
//! resolution can be exercised without a terminal.

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{JssError, Result};

/// JSS API username and password, held in memory for the run only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API username.
    pub username: String,
    /// API password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies whichever credential parts the command line left out.
pub trait CredentialSource {
    /// Asks for the API username.
    fn username(&mut self) -> Result<String>;

    /// Asks for the API password. Implementations must not echo it.
    fn password(&mut self) -> Result<String>;
}

/// Prompts on the controlling terminal: username echoed, password hidden.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialSource for TerminalPrompt {
    fn username(&mut self) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "API Username: ")
            .and_then(|()| stdout.flush())
            .map_err(|e| JssError::io("failed to write username prompt", e))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| JssError::io("failed to read username", e))?;
        Ok(line.trim().to_string())
    }

    fn password(&mut self) -> Result<String> {
        rpassword::prompt_password("API Password: ")
            .map_err(|e| JssError::io("failed to read password", e))
    }
}

/// Resolves credentials, prompting only for the parts that are missing.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
    source: &mut dyn CredentialSource,
) -> Result<Credentials> {
    let username = match username {
        Some(u) => u,
        None => source.username()?,
    };
    let password = match password {
        Some(p) => p,
        None => source.password()?,
    };
    Ok(Credentials { username, password })
}
