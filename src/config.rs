/// Environment variable overriding the upstream base URL.
pub const API_BASE_URL_VAR: &str = "PREFILL_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";
/// Path of the graph endpoint, relative to the base URL.
pub const GRAPH_PATH: &str = "/action-blueprint-graph";

/// Upstream settings for the graph fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset or blank values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(API_BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        }
    }

    pub fn graph_url(&self) -> String {
        format!("{}{}", self.api_base_url, GRAPH_PATH)
    }
}
