//! The route table and its access rules.
//!
//! Routes are parsed from path strings like `/news/5` or `/admin/coaches`
//! and rendered back the same way. Access checking lives in [`guard`];
//! the table itself only knows which routes exist.

mod guard;

pub use guard::{decide, GuardDecision, RouteAccess};

use std::fmt;

use thiserror::Error;

/// Why a path string did not resolve to a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches '{path}'")]
    NotFound { path: String },

    #[error("'{value}' is not a valid id")]
    BadId { value: String },
}

/// One editable area of the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Players,
    Coaches,
    Matches,
    News,
    Media,
    History,
    Standings,
    Messages,
}

impl AdminSection {
    pub const ALL: [AdminSection; 8] = [
        AdminSection::Players,
        AdminSection::Coaches,
        AdminSection::Matches,
        AdminSection::News,
        AdminSection::Media,
        AdminSection::History,
        AdminSection::Standings,
        AdminSection::Messages,
    ];

    /// Path segment under `/admin/`.
    pub fn slug(&self) -> &'static str {
        match self {
            AdminSection::Players => "players",
            AdminSection::Coaches => "coaches",
            AdminSection::Matches => "matches",
            AdminSection::News => "news",
            AdminSection::Media => "media",
            AdminSection::History => "history",
            AdminSection::Standings => "standings",
            AdminSection::Messages => "messages",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.slug() == slug)
    }

    /// Heading shown at the top of the section page.
    pub fn title(&self) -> &'static str {
        match self {
            AdminSection::Players => "Игроки",
            AdminSection::Coaches => "Тренеры",
            AdminSection::Matches => "Матчи",
            AdminSection::News => "Новости",
            AdminSection::Media => "Медиа",
            AdminSection::History => "История",
            AdminSection::Standings => "Турнирная таблица",
            AdminSection::Messages => "Сообщения",
        }
    }
}

/// Every page the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Team,
    Matches,
    NewsList,
    NewsArticle(i64),
    Media,
    Blog,
    Contacts,
    History,
    Auth,
    Admin,
    AdminSection(AdminSection),
}

impl Route {
    /// Parse a path string.
    pub fn parse(raw: &str) -> Result<Route, RouteError> {
        let not_found = || RouteError::NotFound {
            path: raw.to_string(),
        };
        if !raw.starts_with('/') {
            return Err(not_found());
        }
        let trimmed = raw.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        match path {
            "/" => return Ok(Route::Home),
            "/team" => return Ok(Route::Team),
            "/matches" => return Ok(Route::Matches),
            "/news" => return Ok(Route::NewsList),
            "/media" => return Ok(Route::Media),
            "/blog" => return Ok(Route::Blog),
            "/contacts" => return Ok(Route::Contacts),
            "/history" => return Ok(Route::History),
            "/auth" => return Ok(Route::Auth),
            "/admin" => return Ok(Route::Admin),
            _ => {}
        }
        if let Some(rest) = path.strip_prefix("/news/") {
            return rest
                .parse::<i64>()
                .map(Route::NewsArticle)
                .map_err(|_| RouteError::BadId {
                    value: rest.to_string(),
                });
        }
        if let Some(rest) = path.strip_prefix("/admin/") {
            return AdminSection::from_slug(rest)
                .map(Route::AdminSection)
                .ok_or_else(not_found);
        }
        Err(not_found())
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Team => "/team".to_string(),
            Route::Matches => "/matches".to_string(),
            Route::NewsList => "/news".to_string(),
            Route::NewsArticle(id) => format!("/news/{id}"),
            Route::Media => "/media".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Contacts => "/contacts".to_string(),
            Route::History => "/history".to_string(),
            Route::Auth => "/auth".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminSection(section) => format!("/admin/{}", section.slug()),
        }
    }

    /// True for routes behind the admin guard.
    pub fn requires_admin(&self) -> bool {
        RouteAccess::of(self) == RouteAccess::AdminOnly
    }

    /// Human heading for the page.
    pub fn title(&self) -> String {
        match self {
            Route::Home => "Главная".to_string(),
            Route::Team => "Команда".to_string(),
            Route::Matches => "Матчи".to_string(),
            Route::NewsList => "Новости".to_string(),
            Route::NewsArticle(id) => format!("Новость #{id}"),
            Route::Media => "Медиа".to_string(),
            Route::Blog => "Блог".to_string(),
            Route::Contacts => "Контакты".to_string(),
            Route::History => "История клуба".to_string(),
            Route::Auth => "Вход".to_string(),
            Route::Admin => "Админ-панель".to_string(),
            Route::AdminSection(section) => format!("Админ-панель: {}", section.title()),
        }
    }

    /// All fixed routes, in navigation order. Parameterized article
    /// routes are reachable from the news list, not listed here.
    pub fn navigation() -> Vec<Route> {
        let mut routes = vec![
            Route::Home,
            Route::Team,
            Route::Matches,
            Route::NewsList,
            Route::Media,
            Route::Blog,
            Route::Contacts,
            Route::History,
            Route::Auth,
            Route::Admin,
        ];
        routes.extend(AdminSection::ALL.iter().map(|s| Route::AdminSection(*s)));
        routes
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
