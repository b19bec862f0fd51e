//! HTTP access to the club's REST API.
//!
//! [`ApiClient`] speaks JSON over HTTP and normalizes failures into
//! [`ApiError`]; [`ClubApi`] adds one typed method per endpoint plus the
//! canonical cache [`keys`] for each of them.

mod client;
mod error;
mod models;
mod resources;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{
    BlogPost, Coach, CoachDraft, ContactDraft, ContactMessage, HistoryDraft, HistoryEvent, Match,
    MatchDraft, MediaDraft, MediaItem, News, NewsDraft, Player, PlayerDraft, Standing,
    StandingDraft, User,
};
pub use resources::{keys, paths, ClubApi};
