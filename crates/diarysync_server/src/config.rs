//! Server configuration.

/// Partition used when a client does not name one.
pub const DEFAULT_APP_ID: &str = "daily";

/// Configuration for the sync server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Partition for records and listings that carry no application id.
    pub default_app_id: String,
}

impl ServerConfig {
    /// Creates a configuration with the given default partition.
    pub fn new(default_app_id: impl Into<String>) -> Self {
        Self {
            default_app_id: default_app_id.into(),
        }
    }

    /// Sets the default partition.
    pub fn with_default_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.default_app_id = app_id.into();
        self
    }

    /// Resolves an optional application id against the default.
    pub fn resolve_app_id<'a>(&'a self, app_id: Option<&'a str>) -> &'a str {
        app_id
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.default_app_id)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_APP_ID)
    }
}
