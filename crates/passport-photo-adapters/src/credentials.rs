//! Service endpoints and keys, read from the environment.

use thiserror::Error;

/// Environment variable names, grouped per service as (endpoint, key).
pub mod vars {
    /// Face detection endpoint.
    pub const FACES_ENDPOINT: &str = "AZURE_FACES_API_ENDPOINT";
    /// Face detection key.
    pub const FACES_KEY: &str = "AZURE_FACES_API_KEY";
    /// Content safety endpoint.
    pub const MODERATION_ENDPOINT: &str = "AZURE_MODERATION_API_ENDPOINT";
    /// Content safety key.
    pub const MODERATION_KEY: &str = "AZURE_MODERATION_API_KEY";
    /// Image analysis endpoint.
    pub const VISION_ENDPOINT: &str = "AZURE_VISION_API_ENDPOINT";
    /// Image analysis key.
    pub const VISION_KEY: &str = "AZURE_VISION_API_KEY";
}

/// Startup configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    /// One or more variables are unset or blank.
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Endpoint and key of one service resource.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    /// Base URL, e.g. `https://myres.cognitiveservices.azure.com`.
    pub endpoint: String,
    /// Resource key.
    pub key: String,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Credentials for all three services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureCredentials {
    /// Face detection.
    pub faces: ServiceCredentials,
    /// Content safety.
    pub moderation: ServiceCredentials,
    /// Image analysis.
    pub vision: ServiceCredentials,
}

impl AzureCredentials {
    /// Reads all six variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] naming every variable that is
    /// unset or blank.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads all six variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] naming every variable that is
    /// unset or blank, in declaration order.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let faces = ServiceCredentials {
            endpoint: read(vars::FACES_ENDPOINT),
            key: read(vars::FACES_KEY),
        };
        let moderation = ServiceCredentials {
            endpoint: read(vars::MODERATION_ENDPOINT),
            key: read(vars::MODERATION_KEY),
        };
        let vision = ServiceCredentials {
            endpoint: read(vars::VISION_ENDPOINT),
            key: read(vars::VISION_KEY),
        };

        if missing.is_empty() {
            Ok(Self {
                faces,
                moderation,
                vision,
            })
        } else {
            Err(CredentialsError::Missing(missing))
        }
    }
}
