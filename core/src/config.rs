//! Base URL configuration for the health API client.
//!
//! Resolution order for each URL: explicit override (`with_*` methods) >
//! environment variable > built-in default. Each URL also accepts a
//! fallback variable name used by existing deployments; the primary name
//! wins when both are set. Empty environment values are treated as unset.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Public base URL, used for browser-originated calls.
pub const API_URL_ENV: &str = "HEALTH_API_URL";

/// Optional base URL for server-originated calls (e.g. a cluster-internal
/// hostname). Falls back to the public URL when unset.
pub const API_URL_INTERNAL_ENV: &str = "HEALTH_API_URL_INTERNAL";

/// Fallback for [`API_URL_ENV`].
pub const FALLBACK_API_URL_ENV: &str = "VITE_API_URL";

/// Fallback for [`API_URL_INTERNAL_ENV`].
pub const FALLBACK_API_URL_INTERNAL_ENV: &str = "API_URL_INTERNAL";

/// Where a call originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Browser,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub public_base_url: String,
    pub internal_base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_API_BASE_URL.to_string(),
            internal_base_url: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` is this with
    /// `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            public_base_url: non_empty(API_URL_ENV)
                .or_else(|| non_empty(FALLBACK_API_URL_ENV))
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            internal_base_url: non_empty(API_URL_INTERNAL_ENV)
                .or_else(|| non_empty(FALLBACK_API_URL_INTERNAL_ENV)),
        }
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    pub fn with_internal_base_url(mut self, url: impl Into<String>) -> Self {
        self.internal_base_url = Some(url.into());
        self
    }

    pub fn base_url(&self, context: Context) -> &str {
        match (context, &self.internal_base_url) {
            (Context::Server, Some(internal)) => internal,
            _ => &self.public_base_url,
        }
    }
}
