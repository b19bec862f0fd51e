//! Application wiring: config, API access, cache, session, and routing.

use crate::api::ClubApi;
use crate::config::ConfigStore;
use crate::notify::{Toast, Toasts};
use crate::pages;
use crate::query::{QueryClient, QueryOptions};
use crate::routes::{self, GuardDecision, Route};
use crate::session::{Session, SessionStore};

/// Everything a page needs, wired once at startup. Cheap to clone; all
/// clones share the same cache and session.
#[derive(Clone)]
pub struct AppContext {
    config: ConfigStore,
    api: ClubApi,
    queries: QueryClient,
    session: SessionStore,
    toasts: Toasts,
}

/// Result of trying to open a route.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// The page rendered.
    Page { title: String, lines: Vec<String> },
    /// Go somewhere else instead (the sign-in page).
    Redirect(Route),
    /// Signed in, but this area needs admin rights.
    Denied,
    /// Session restore has not settled yet.
    SessionLoading,
}

impl AppContext {
    pub fn new(config: ConfigStore) -> Self {
        let api = ClubApi::from_config(&config.get().api);
        Self {
            config,
            api,
            queries: QueryClient::new(),
            session: SessionStore::new(),
            toasts: Toasts::new(),
        }
    }

    pub fn api(&self) -> &ClubApi {
        &self.api
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    fn query_options(&self) -> QueryOptions {
        self.config.get().query.options()
    }

    /// Restore the session for a known user id, or fall back to anonymous.
    pub async fn restore_session(&self, user_id: i64) {
        self.session.begin_restore();
        match self.api.user(user_id).await {
            Ok(user) => self.session.resolve_user(user),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "session restore failed");
                self.toasts.error(format!("Не удалось войти: {err}"));
                self.session.resolve_anonymous();
            }
        }
    }

    pub fn start_anonymous(&self) {
        self.session.resolve_anonymous();
    }

    /// Sign out. The session resets and all cached data is dropped, so
    /// nothing fetched for the admin lingers for the next visitor.
    pub fn logout(&self) {
        self.session.clear();
        self.queries.clear();
    }

    /// Window focus hook, forwarded to the cache.
    pub fn notify_focus(&self) {
        self.queries.notify_focus();
    }

    /// Guard the route against the current session, then render it.
    pub async fn open(&self, route: Route) -> OpenOutcome {
        let session = self.session.current();
        match routes::decide(&route, &session) {
            GuardDecision::Loading => OpenOutcome::SessionLoading,
            GuardDecision::RedirectToLogin => OpenOutcome::Redirect(Route::Auth),
            GuardDecision::AccessDenied => OpenOutcome::Denied,
            GuardDecision::Grant => OpenOutcome::Page {
                title: route.title(),
                lines: self.page_lines(route, &session).await,
            },
        }
    }

    async fn page_lines(&self, route: Route, session: &Session) -> Vec<String> {
        let options = self.query_options();
        match route {
            Route::Home => pages::home::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::Team => pages::team::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::Matches => pages::matches::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::NewsList => pages::news::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::NewsArticle(id) => {
                pages::news::load_article(&self.api, &self.queries, options, id)
                    .await
                    .render()
            }
            Route::Media => pages::media::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::Blog => {
                let limit = self.config.get().query.blog_preview_limit;
                pages::blog::load(&self.api, &self.queries, options, limit)
                    .await
                    .render()
            }
            Route::Contacts => pages::contacts::ContactFormState::default().render(),
            Route::History => pages::history::load(&self.api, &self.queries, options)
                .await
                .render(),
            Route::Auth => auth_lines(session),
            Route::Admin => pages::admin::dashboard_lines(),
            Route::AdminSection(section) => {
                pages::admin::section_lines(&self.api, &self.queries, options, section).await
            }
        }
    }

    /// Toasts queued by mutations and flows since the last call.
    pub fn take_toasts(&self) -> Vec<Toast> {
        self.toasts.drain()
    }
}

fn auth_lines(session: &Session) -> Vec<String> {
    match &session.user {
        Some(user) => vec![format!("Вы вошли как {} (id {})", user.name, user.id)],
        None => vec![
            "Вы не вошли в систему.".to_string(),
            "Запустите команду с --as-user <id> для входа.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    fn app() -> AppContext {
        AppContext::new(ConfigStore::new(Config::default(), PathBuf::from("unused.toml")))
    }

    #[tokio::test]
    async fn admin_route_reports_loading_before_session_settles() {
        let app = app();
        assert_eq!(app.open(Route::Admin).await, OpenOutcome::SessionLoading);
    }

    #[tokio::test]
    async fn admin_route_redirects_after_anonymous_start() {
        let app = app();
        app.start_anonymous();
        assert_eq!(
            app.open(Route::Admin).await,
            OpenOutcome::Redirect(Route::Auth)
        );
    }

    #[tokio::test]
    async fn contacts_page_renders_without_any_backend() {
        let app = app();
        app.start_anonymous();
        match app.open(Route::Contacts).await {
            OpenOutcome::Page { title, lines } => {
                assert_eq!(title, "Контакты");
                assert!(lines.iter().any(|l| l.starts_with("Имя:")));
            }
            other => panic!("expected a page, got {other:?}"),
        }
    }
}
