use std::fmt;

use thiserror::Error;

pub const LOGIN_VAR: &str = "OMICIA_API_LOGIN";
pub const PASSWORD_VAR: &str = "OMICIA_API_PASSWORD";
pub const URL_VAR: &str = "OMICIA_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.omicia.com";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("{name} environment variable missing")]
    MissingVariable { name: &'static str },
}

/// Basic-auth credentials and the service root they apply to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
    pub base_url: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// `fallback_url` is used when `OMICIA_API_URL` is unset, which lets a
    /// config file supply the service root without overriding the environment.
    pub fn from_env(fallback_url: Option<&str>) -> Result<Self, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok(), fallback_url)
    }

    /// Same as [`Credentials::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F, fallback_url: Option<&str>) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(AuthError::MissingVariable { name })
        };

        let password = read(PASSWORD_VAR)?;
        let login = read(LOGIN_VAR)?;

        let base_url = lookup(URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| fallback_url.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            login,
            password,
            base_url,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
