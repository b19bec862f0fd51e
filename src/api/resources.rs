//! Typed endpoint surface over [`ApiClient`].
//!
//! Every resource family follows the same REST shape, so the public
//! methods are thin wrappers around a handful of generic helpers. The
//! [`keys`] module pins down the canonical cache key for each endpoint;
//! readers and writers must agree on these or invalidation misses.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{
    BlogPost, Coach, CoachDraft, ContactDraft, ContactMessage, HistoryDraft, HistoryEvent, Match,
    MatchDraft, MediaDraft, MediaItem, News, NewsDraft, Player, PlayerDraft, Standing,
    StandingDraft, User,
};
use crate::config::ApiConfig;

/// API-relative paths, shared by requests and cache keys.
pub mod paths {
    pub const NEWS: &str = "/api/news";
    pub const BLOG: &str = "/api/blog";
    pub const COACHES: &str = "/api/coaches";
    pub const PLAYERS: &str = "/api/players";
    pub const MATCHES: &str = "/api/matches";
    pub const STANDINGS: &str = "/api/standings";
    pub const HISTORY: &str = "/api/history";
    pub const MEDIA: &str = "/api/media";
    pub const MESSAGES: &str = "/api/messages";
    pub const USERS: &str = "/api/users";
    pub const USER: &str = "/api/user";
}

/// Canonical cache keys, one per endpoint.
pub mod keys {
    use super::paths;
    use crate::query::QueryKey;

    pub fn news_list() -> QueryKey {
        QueryKey::root(paths::NEWS)
    }

    pub fn news_item(id: i64) -> QueryKey {
        QueryKey::root(paths::NEWS).push(id)
    }

    /// Blog lists with different limits are distinct entries.
    pub fn blog(limit: u32) -> QueryKey {
        QueryKey::root(paths::BLOG).push(limit)
    }

    pub fn coaches() -> QueryKey {
        QueryKey::root(paths::COACHES)
    }

    pub fn players() -> QueryKey {
        QueryKey::root(paths::PLAYERS)
    }

    pub fn matches() -> QueryKey {
        QueryKey::root(paths::MATCHES)
    }

    pub fn standings() -> QueryKey {
        QueryKey::root(paths::STANDINGS)
    }

    pub fn history() -> QueryKey {
        QueryKey::root(paths::HISTORY)
    }

    pub fn media() -> QueryKey {
        QueryKey::root(paths::MEDIA)
    }

    pub fn messages() -> QueryKey {
        QueryKey::root(paths::MESSAGES)
    }

    pub fn users() -> QueryKey {
        QueryKey::root(paths::USERS)
    }

    pub fn user(id: i64) -> QueryKey {
        QueryKey::root(paths::USER).push(id)
    }
}

/// The club API, one typed method per endpoint.
#[derive(Debug, Clone)]
pub struct ClubApi {
    client: ApiClient,
}

impl ClubApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(ApiClient::new(config))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // News.

    pub async fn list_news(&self) -> Result<Vec<News>, ApiError> {
        self.list(paths::NEWS).await
    }

    pub async fn news(&self, id: i64) -> Result<News, ApiError> {
        self.item(paths::NEWS, id).await
    }

    pub async fn create_news(&self, draft: &NewsDraft) -> Result<News, ApiError> {
        self.create(paths::NEWS, draft).await
    }

    pub async fn update_news(&self, id: i64, draft: &NewsDraft) -> Result<News, ApiError> {
        self.update(paths::NEWS, id, draft).await
    }

    pub async fn delete_news(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::NEWS, id).await
    }

    // Blog.

    pub async fn blog_posts(&self, limit: u32) -> Result<Vec<BlogPost>, ApiError> {
        self.client
            .get(&format!("{}?limit={limit}", paths::BLOG))
            .await
    }

    // Coaches.

    pub async fn list_coaches(&self) -> Result<Vec<Coach>, ApiError> {
        self.list(paths::COACHES).await
    }

    pub async fn create_coach(&self, draft: &CoachDraft) -> Result<Coach, ApiError> {
        self.create(paths::COACHES, draft).await
    }

    pub async fn update_coach(&self, id: i64, draft: &CoachDraft) -> Result<Coach, ApiError> {
        self.update(paths::COACHES, id, draft).await
    }

    pub async fn delete_coach(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::COACHES, id).await
    }

    // Players.

    pub async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        self.list(paths::PLAYERS).await
    }

    pub async fn create_player(&self, draft: &PlayerDraft) -> Result<Player, ApiError> {
        self.create(paths::PLAYERS, draft).await
    }

    pub async fn update_player(&self, id: i64, draft: &PlayerDraft) -> Result<Player, ApiError> {
        self.update(paths::PLAYERS, id, draft).await
    }

    pub async fn delete_player(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::PLAYERS, id).await
    }

    // Matches.

    pub async fn list_matches(&self) -> Result<Vec<Match>, ApiError> {
        self.list(paths::MATCHES).await
    }

    pub async fn create_match(&self, draft: &MatchDraft) -> Result<Match, ApiError> {
        self.create(paths::MATCHES, draft).await
    }

    pub async fn update_match(&self, id: i64, draft: &MatchDraft) -> Result<Match, ApiError> {
        self.update(paths::MATCHES, id, draft).await
    }

    pub async fn delete_match(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::MATCHES, id).await
    }

    // Standings.

    pub async fn list_standings(&self) -> Result<Vec<Standing>, ApiError> {
        self.list(paths::STANDINGS).await
    }

    pub async fn create_standing(&self, draft: &StandingDraft) -> Result<Standing, ApiError> {
        self.create(paths::STANDINGS, draft).await
    }

    pub async fn update_standing(
        &self,
        id: i64,
        draft: &StandingDraft,
    ) -> Result<Standing, ApiError> {
        self.update(paths::STANDINGS, id, draft).await
    }

    pub async fn delete_standing(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::STANDINGS, id).await
    }

    // Club history.

    pub async fn list_history(&self) -> Result<Vec<HistoryEvent>, ApiError> {
        self.list(paths::HISTORY).await
    }

    pub async fn create_history(&self, draft: &HistoryDraft) -> Result<HistoryEvent, ApiError> {
        self.create(paths::HISTORY, draft).await
    }

    pub async fn update_history(
        &self,
        id: i64,
        draft: &HistoryDraft,
    ) -> Result<HistoryEvent, ApiError> {
        self.update(paths::HISTORY, id, draft).await
    }

    pub async fn delete_history(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::HISTORY, id).await
    }

    // Media gallery.

    pub async fn list_media(&self) -> Result<Vec<MediaItem>, ApiError> {
        self.list(paths::MEDIA).await
    }

    pub async fn create_media(&self, draft: &MediaDraft) -> Result<MediaItem, ApiError> {
        self.create(paths::MEDIA, draft).await
    }

    pub async fn update_media(&self, id: i64, draft: &MediaDraft) -> Result<MediaItem, ApiError> {
        self.update(paths::MEDIA, id, draft).await
    }

    pub async fn delete_media(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::MEDIA, id).await
    }

    // Contact messages. Visitors create them, admins read and delete.

    pub async fn list_messages(&self) -> Result<Vec<ContactMessage>, ApiError> {
        self.list(paths::MESSAGES).await
    }

    pub async fn send_message(&self, draft: &ContactDraft) -> Result<ContactMessage, ApiError> {
        self.create(paths::MESSAGES, draft).await
    }

    pub async fn delete_message(&self, id: i64) -> Result<(), ApiError> {
        self.remove(paths::MESSAGES, id).await
    }

    // Users. Note the singular item path.

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.list(paths::USERS).await
    }

    pub async fn user(&self, id: i64) -> Result<User, ApiError> {
        self.item(paths::USER, id).await
    }

    // Shared REST shapes.

    async fn list<T: DeserializeOwned>(&self, base: &str) -> Result<Vec<T>, ApiError> {
        self.client.get(base).await
    }

    async fn item<T: DeserializeOwned>(&self, base: &str, id: i64) -> Result<T, ApiError> {
        self.client.get(&format!("{base}/{id}")).await
    }

    async fn create<T, D>(&self, base: &str, draft: &D) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        self.client.post(base, draft).await
    }

    async fn update<T, D>(&self, base: &str, id: i64, draft: &D) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        self.client.put(&format!("{base}/{id}"), draft).await
    }

    async fn remove(&self, base: &str, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{base}/{id}")).await
    }
}
