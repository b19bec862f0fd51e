//! Admin panel: a section index plus one managed list per section.
//!
//! Sections share one generic list model; each record type only says how
//! to print itself. Writes are mutations that invalidate the section's
//! list key, so open listings refresh on their own.

use std::future::Future;
use std::marker::PhantomData;

use crate::api::{
    keys, ApiError, ClubApi, Coach, CoachDraft, ContactMessage, HistoryEvent, Match, MediaItem,
    News, NewsDraft, Player, Standing,
};
use crate::notify::Toasts;
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{KeyFilter, Mutation, QueryClient, QueryKey, QueryOptions};
use crate::routes::AdminSection;

/// A record an admin section can list.
pub trait AdminRecord: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> i64;
    /// One line in the section listing, without the id prefix.
    fn line(&self) -> String;
}

impl AdminRecord for Player {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        match self.number {
            Some(number) => format!("{} · {} · №{number}", self.name, self.position),
            None => format!("{} · {}", self.name, self.position),
        }
    }
}

impl AdminRecord for Coach {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("{} · {}", self.name, self.role)
    }
}

impl AdminRecord for Match {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("[{}] {} ({})", self.date, self.opponent, self.competition)
    }
}

impl AdminRecord for News {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("[{}] {} · {}", self.date, self.category, self.title)
    }
}

impl AdminRecord for MediaItem {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("[{}] {}", self.date, self.title)
    }
}

impl AdminRecord for HistoryEvent {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("{} · {}", self.year, self.title)
    }
}

impl AdminRecord for Standing {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("{}. {} · {} очков", self.position, self.team, self.points)
    }
}

impl AdminRecord for ContactMessage {
    fn id(&self) -> i64 {
        self.id
    }

    fn line(&self) -> String {
        format!("[{}] {} <{}>: {}", self.date, self.name, self.email, self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminListState<T> {
    pub phase: LoadPhase,
    pub records: Vec<T>,
}

impl<T> Default for AdminListState<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::default(),
            records: Vec::new(),
        }
    }
}

impl<T: AdminRecord> PageState for AdminListState<T> {}

#[derive(Debug)]
pub enum AdminListIntent<T> {
    Loaded(Vec<T>),
    LoadFailed(String),
}

impl<T: AdminRecord> Intent for AdminListIntent<T> {}

pub struct AdminListReducer<T> {
    _marker: PhantomData<T>,
}

impl<T: AdminRecord> Reducer for AdminListReducer<T> {
    type State = AdminListState<T>;
    type Intent = AdminListIntent<T>;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AdminListIntent::Loaded(records) => AdminListState {
                phase: LoadPhase::Ready,
                records,
            },
            AdminListIntent::LoadFailed(message) => AdminListState {
                phase: LoadPhase::Failed(message),
                records: Vec::new(),
            },
        }
    }
}

impl<T: AdminRecord> AdminListState<T> {
    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => {
                if self.records.is_empty() {
                    return vec!["Записей нет".to_string()];
                }
                self.records
                    .iter()
                    .map(|r| format!("#{} {}", r.id(), r.line()))
                    .collect()
            }
        }
    }
}

/// Create form for a news article. On a failed save the typed fields
/// stay in place for correction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsFormState {
    pub title: String,
    pub category: String,
    pub date: String,
    pub text: String,
    /// Set after a successful save; the fields are blank again.
    pub saved: bool,
    pub error: Option<String>,
}

impl PageState for NewsFormState {}

#[derive(Debug)]
pub enum NewsFormIntent {
    SetTitle(String),
    SetCategory(String),
    SetDate(String),
    SetText(String),
    Saved,
    SaveFailed(String),
}

impl Intent for NewsFormIntent {}

pub struct NewsFormReducer;

impl Reducer for NewsFormReducer {
    type State = NewsFormState;
    type Intent = NewsFormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            NewsFormIntent::SetTitle(title) => NewsFormState {
                title,
                error: None,
                saved: false,
                ..state
            },
            NewsFormIntent::SetCategory(category) => NewsFormState {
                category,
                error: None,
                saved: false,
                ..state
            },
            NewsFormIntent::SetDate(date) => NewsFormState {
                date,
                error: None,
                saved: false,
                ..state
            },
            NewsFormIntent::SetText(text) => NewsFormState {
                text,
                error: None,
                saved: false,
                ..state
            },
            NewsFormIntent::Saved => NewsFormState {
                saved: true,
                ..NewsFormState::default()
            },
            NewsFormIntent::SaveFailed(message) => NewsFormState {
                error: Some(message),
                saved: false,
                ..state
            },
        }
    }
}

impl NewsFormState {
    /// A draft ready to save, or what is missing.
    pub fn draft(&self) -> Result<NewsDraft, String> {
        if self.title.trim().is_empty() {
            return Err("Укажите заголовок".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Укажите категорию".to_string());
        }
        if self.date.trim().is_empty() {
            return Err("Укажите дату".to_string());
        }
        Ok(NewsDraft {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            date: self.date.trim().to_string(),
            text: self.text.trim().to_string(),
            image: None,
        })
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Заголовок: {}", self.title),
            format!("Категория: {}", self.category),
            format!("Дата: {}", self.date),
        ];
        if self.saved {
            lines.push("Сохранено".to_string());
        }
        if let Some(error) = &self.error {
            lines.push(format!("Ошибка: {error}"));
        }
        lines
    }
}

/// The admin landing page: what can be managed.
pub fn dashboard_lines() -> Vec<String> {
    AdminSection::ALL
        .iter()
        .map(|s| format!("/admin/{} · {}", s.slug(), s.title()))
        .collect()
}

async fn load_list<T, F, Fut>(
    queries: &QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: F,
) -> AdminListState<T>
where
    T: AdminRecord,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + Send + 'static,
{
    let result = observe_once(queries, key, options, fetcher).await;
    let state = AdminListState::default();
    match result {
        Ok(records) => {
            AdminListReducer::reduce(state, AdminListIntent::Loaded((*records).clone()))
        }
        Err(message) => AdminListReducer::reduce(state, AdminListIntent::LoadFailed(message)),
    }
}

/// Load one section's list and render it.
pub async fn section_lines(
    api: &ClubApi,
    queries: &QueryClient,
    options: QueryOptions,
    section: AdminSection,
) -> Vec<String> {
    let api = api.clone();
    match section {
        AdminSection::Players => {
            load_list(queries, keys::players(), options, move || {
                let api = api.clone();
                async move { api.list_players().await }
            })
            .await
            .render()
        }
        AdminSection::Coaches => {
            load_list(queries, keys::coaches(), options, move || {
                let api = api.clone();
                async move { api.list_coaches().await }
            })
            .await
            .render()
        }
        AdminSection::Matches => {
            load_list(queries, keys::matches(), options, move || {
                let api = api.clone();
                async move { api.list_matches().await }
            })
            .await
            .render()
        }
        AdminSection::News => {
            load_list(queries, keys::news_list(), options, move || {
                let api = api.clone();
                async move { api.list_news().await }
            })
            .await
            .render()
        }
        AdminSection::Media => {
            load_list(queries, keys::media(), options, move || {
                let api = api.clone();
                async move { api.list_media().await }
            })
            .await
            .render()
        }
        AdminSection::History => {
            load_list(queries, keys::history(), options, move || {
                let api = api.clone();
                async move { api.list_history().await }
            })
            .await
            .render()
        }
        AdminSection::Standings => {
            load_list(queries, keys::standings(), options, move || {
                let api = api.clone();
                async move { api.list_standings().await }
            })
            .await
            .render()
        }
        AdminSection::Messages => {
            load_list(queries, keys::messages(), options, move || {
                let api = api.clone();
                async move { api.list_messages().await }
            })
            .await
            .render()
        }
    }
}

/// Invalidation target for one section: its list key and every item key
/// under it.
pub fn section_filter(section: AdminSection) -> KeyFilter {
    let key = match section {
        AdminSection::Players => keys::players(),
        AdminSection::Coaches => keys::coaches(),
        AdminSection::Matches => keys::matches(),
        AdminSection::News => keys::news_list(),
        AdminSection::Media => keys::media(),
        AdminSection::History => keys::history(),
        AdminSection::Standings => keys::standings(),
        AdminSection::Messages => keys::messages(),
    };
    KeyFilter::prefix(key)
}

/// Delete one record in any section.
pub fn delete_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
    section: AdminSection,
) -> Mutation<i64, ()> {
    let api = api.clone();
    Mutation::builder(queries.clone(), toasts.clone(), move |id: i64| {
        let api = api.clone();
        async move {
            match section {
                AdminSection::Players => api.delete_player(id).await,
                AdminSection::Coaches => api.delete_coach(id).await,
                AdminSection::Matches => api.delete_match(id).await,
                AdminSection::News => api.delete_news(id).await,
                AdminSection::Media => api.delete_media(id).await,
                AdminSection::History => api.delete_history(id).await,
                AdminSection::Standings => api.delete_standing(id).await,
                AdminSection::Messages => api.delete_message(id).await,
            }
        }
    })
    .invalidate(section_filter(section))
    .success_toast("Удалено")
    .build()
}

pub fn create_news_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
) -> Mutation<NewsDraft, News> {
    let api = api.clone();
    Mutation::builder(queries.clone(), toasts.clone(), move |draft: NewsDraft| {
        let api = api.clone();
        async move { api.create_news(&draft).await }
    })
    .invalidate(section_filter(AdminSection::News))
    .success_toast("Новость добавлена")
    .build()
}

pub fn update_news_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
) -> Mutation<(i64, NewsDraft), News> {
    let api = api.clone();
    Mutation::builder(
        queries.clone(),
        toasts.clone(),
        move |(id, draft): (i64, NewsDraft)| {
            let api = api.clone();
            async move { api.update_news(id, &draft).await }
        },
    )
    .invalidate(section_filter(AdminSection::News))
    .success_toast("Новость сохранена")
    .build()
}

pub fn create_coach_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
) -> Mutation<CoachDraft, Coach> {
    let api = api.clone();
    Mutation::builder(queries.clone(), toasts.clone(), move |draft: CoachDraft| {
        let api = api.clone();
        async move { api.create_coach(&draft).await }
    })
    .invalidate(section_filter(AdminSection::Coaches))
    .success_toast("Тренер добавлен")
    .build()
}

pub fn update_coach_mutation(
    api: &ClubApi,
    queries: &QueryClient,
    toasts: &Toasts,
) -> Mutation<(i64, CoachDraft), Coach> {
    let api = api.clone();
    Mutation::builder(
        queries.clone(),
        toasts.clone(),
        move |(id, draft): (i64, CoachDraft)| {
            let api = api.clone();
            async move { api.update_coach(id, &draft).await }
        },
    )
    .invalidate(section_filter(AdminSection::Coaches))
    .success_toast("Изменения сохранены")
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_filter_covers_item_keys() {
        let filter = section_filter(AdminSection::News);
        assert!(filter.matches(&keys::news_list()));
        assert!(filter.matches(&keys::news_item(9)));
        assert!(!filter.matches(&keys::coaches()));
    }

    #[test]
    fn list_renders_ids_and_lines() {
        let state = AdminListReducer::reduce(
            AdminListState::default(),
            AdminListIntent::Loaded(vec![Coach {
                id: 3,
                name: "Петров".to_string(),
                role: "главный тренер".to_string(),
                photo: None,
            }]),
        );
        assert_eq!(state.render(), vec!["#3 Петров · главный тренер".to_string()]);
    }

    #[test]
    fn dashboard_lists_every_section() {
        let lines = dashboard_lines();
        assert_eq!(lines.len(), AdminSection::ALL.len());
        assert!(lines[0].contains("/admin/players"));
    }

    fn filled_form() -> NewsFormState {
        let state = NewsFormState::default();
        let state =
            NewsFormReducer::reduce(state, NewsFormIntent::SetTitle("Победа".to_string()));
        let state =
            NewsFormReducer::reduce(state, NewsFormIntent::SetCategory("Матчи".to_string()));
        NewsFormReducer::reduce(state, NewsFormIntent::SetDate("2024-05-01".to_string()))
    }

    #[test]
    fn complete_news_form_builds_a_draft() {
        let draft = filled_form().draft().expect("Should build draft");
        assert_eq!(draft.title, "Победа");
        assert_eq!(draft.category, "Матчи");
    }

    #[test]
    fn news_form_requires_a_title() {
        let state =
            NewsFormReducer::reduce(filled_form(), NewsFormIntent::SetTitle("  ".to_string()));
        assert!(state.draft().is_err());
    }

    #[test]
    fn failed_save_keeps_the_typed_fields() {
        let state = NewsFormReducer::reduce(
            filled_form(),
            NewsFormIntent::SaveFailed("сервер недоступен".to_string()),
        );
        assert_eq!(state.title, "Победа");
        assert_eq!(state.error.as_deref(), Some("сервер недоступен"));
        assert!(!state.saved);
    }

    #[test]
    fn successful_save_clears_the_form() {
        let state = NewsFormReducer::reduce(filled_form(), NewsFormIntent::Saved);
        assert!(state.saved);
        assert!(state.title.is_empty());
        assert_eq!(state.error, None);
    }
}
