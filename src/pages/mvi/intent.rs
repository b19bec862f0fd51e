//! Base trait for intents (user/system actions) on a page.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (filter changes, form edits, submissions)
/// - Data events (fetch results arriving, fetch failures)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
