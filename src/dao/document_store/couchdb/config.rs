use std::fmt;

use super::error::{CouchDaoError, CouchResult};

/// Database holding every collection when `COUCH_DB` is unset.
const DEFAULT_DATABASE: &str = "gamehub";

/// Where the CouchDB server lives and how to authenticate against it.
///
/// All collections share one database; documents are keyed `{collection}::{uuid}`.
#[derive(Clone)]
pub struct CouchConfig {
    /// Server root, without trailing slash.
    pub base_url: String,
    /// Database holding every collection.
    pub database: String,
    /// Basic-auth user, if any.
    pub username: Option<String>,
    /// Basic-auth password, if any.
    pub password: Option<String>,
}

impl fmt::Debug for CouchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouchConfig")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl CouchConfig {
    /// Unauthenticated config for `base_url` and `database`.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            database: database.into(),
            username: None,
            password: None,
        }
    }

    /// Basic-auth credentials sent with every request.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// `COUCH_BASE_URL` is required; `COUCH_DB`, `COUCH_USERNAME` and `COUCH_PASSWORD` are optional.
    /// Credentials are only used when both are present.
    pub fn from_env() -> CouchResult<Self> {
        let base_url = non_empty_env("COUCH_BASE_URL").ok_or(CouchDaoError::MissingEnvVar {
            var: "COUCH_BASE_URL",
        })?;
        let database = non_empty_env("COUCH_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_owned());

        let config = Self::new(base_url, database);
        Ok(
            match (non_empty_env("COUCH_USERNAME"), non_empty_env("COUCH_PASSWORD")) {
                (Some(username), Some(password)) => config.with_credentials(username, password),
                _ => config,
            },
        )
    }
}
