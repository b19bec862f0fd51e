//! Page models, one module per route family.
//!
//! Every page follows the same shape: a state struct, an intent enum,
//! and a reducer. Loading a page registers a cache observer, waits for
//! the entry to settle, and reduces the outcome into the state. Filters
//! and form edits are intents too, so tests drive pages without any
//! rendering.

pub mod admin;
pub mod blog;
pub mod contacts;
pub mod history;
pub mod home;
pub mod matches;
pub mod media;
mod mvi;
pub mod news;
pub mod team;

pub use mvi::{Intent, PageState, Reducer};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::query::{QueryClient, QueryKey, QueryOptions, QuerySnapshot, QueryStatus};

/// Load progress shared by every page model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl LoadPhase {
    pub fn is_ready(&self) -> bool {
        *self == LoadPhase::Ready
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Observe `key`, wait for the entry to settle, and unregister.
///
/// This is the page-mount idiom: the data lands in the shared cache, so
/// a repeat visit inside the stale window is served without a request.
pub(crate) async fn observe_once<T, E, F, Fut>(
    queries: &QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: F,
) -> Result<Arc<T>, String>
where
    T: Send + Sync + 'static,
    E: fmt::Display,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let mut observer = queries.observe(key, options, fetcher);
    settle(observer.ready().await)
}

/// Collapse a settled snapshot into data or an error message.
pub(crate) fn settle<T>(snapshot: QuerySnapshot<T>) -> Result<Arc<T>, String> {
    match snapshot.status {
        QueryStatus::Success => snapshot
            .data
            .ok_or_else(|| "cache entry lost its data".to_string()),
        QueryStatus::Error => Err(snapshot
            .error
            .unwrap_or_else(|| "request failed".to_string())),
        QueryStatus::Pending => Err("request did not settle".to_string()),
    }
}
