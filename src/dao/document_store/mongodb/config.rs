use std::fmt;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

/// Database holding every collection when `MONGO_DB` is unset.
const DEFAULT_DATABASE: &str = "gamehub";

/// Parsed client options plus the database that hosts the collections.
#[derive(Clone)]
pub struct MongoConfig {
    /// Driver options parsed from `MONGO_URI`.
    pub options: ClientOptions,
    /// Database that hosts the collections.
    pub database_name: String,
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("hosts", &self.options.hosts)
            .field("database_name", &self.database_name)
            .finish_non_exhaustive()
    }
}

impl MongoConfig {
    /// Parse `uri`; the database defaults to `gamehub`.
    pub async fn from_uri(uri: &str, database_name: Option<&str>) -> MongoResult<Self> {
        let options = ClientOptions::parse(uri)
            .await
            .map_err(|source| MongoDaoError::InvalidUri {
                uri: uri.to_owned(),
                source,
            })?;

        Ok(Self {
            options,
            database_name: database_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_DATABASE)
                .to_owned(),
        })
    }

    /// `MONGO_URI` is required, `MONGO_DB` optional.
    pub async fn from_env() -> MongoResult<Self> {
        let Ok(uri) = std::env::var("MONGO_URI") else {
            return Err(MongoDaoError::MissingEnvVar { var: "MONGO_URI" });
        };
        Self::from_uri(&uri, std::env::var("MONGO_DB").ok().as_deref()).await
    }
}
