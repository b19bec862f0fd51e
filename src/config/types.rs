use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::query::QueryOptions;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where and how to reach the club API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API server (e.g., "http://127.0.0.1:5000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Cache behavior applied to page queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Seconds before cached data goes stale. 0 refetches on every
    /// observation.
    #[serde(default)]
    pub stale_time_seconds: u64,
    /// Cached data never expires by age. Overrides `stale_time_seconds`.
    #[serde(default)]
    pub never_stale: bool,
    /// Refetch stale entries when the window regains focus.
    #[serde(default = "default_refetch_on_focus")]
    pub refetch_on_focus: bool,
    /// Number of posts shown in the blog preview (default: 3).
    #[serde(default = "default_blog_preview_limit")]
    pub blog_preview_limit: u32,
}

/// Session restore behavior at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Restore this user's session on launch. Unset starts anonymous.
    #[serde(default)]
    pub restore_user_id: Option<i64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_refetch_on_focus() -> bool {
    true
}

fn default_blog_preview_limit() -> u32 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time_seconds: 0,
            never_stale: false,
            refetch_on_focus: default_refetch_on_focus(),
            blog_preview_limit: default_blog_preview_limit(),
        }
    }
}

impl QueryConfig {
    /// Observer options implied by this section.
    pub fn options(&self) -> QueryOptions {
        let options = QueryOptions::default().refetch_on_focus(self.refetch_on_focus);
        if self.never_stale {
            options.never_stale()
        } else {
            options.stale_time(Duration::from_secs(self.stale_time_seconds))
        }
    }
}
