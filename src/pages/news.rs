//! News list and single-article pages.
//!
//! The list filters client-side: an exact category match plus a
//! case-insensitive substring search over titles. Filters never touch
//! the cache; they narrow what is already loaded.

use crate::api::{keys, ClubApi, News};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsListState {
    pub phase: LoadPhase,
    pub items: Vec<News>,
    /// Exact-match category filter; `None` shows every category.
    pub category: Option<String>,
    /// Case-insensitive substring match on titles; empty matches all.
    pub search: String,
}

impl PageState for NewsListState {}

#[derive(Debug)]
pub enum NewsListIntent {
    Loaded(Vec<News>),
    LoadFailed(String),
    SetCategory(Option<String>),
    SetSearch(String),
}

impl Intent for NewsListIntent {}

pub struct NewsListReducer;

impl Reducer for NewsListReducer {
    type State = NewsListState;
    type Intent = NewsListIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            NewsListIntent::Loaded(items) => NewsListState {
                phase: LoadPhase::Ready,
                items,
                ..state
            },
            NewsListIntent::LoadFailed(message) => NewsListState {
                phase: LoadPhase::Failed(message),
                items: Vec::new(),
                ..state
            },
            NewsListIntent::SetCategory(category) => NewsListState { category, ..state },
            NewsListIntent::SetSearch(search) => NewsListState { search, ..state },
        }
    }
}

impl NewsListState {
    /// Items passing both filters, in server order.
    pub fn visible(&self) -> Vec<&News> {
        self.items.iter().filter(|item| self.matches(item)).collect()
    }

    fn matches(&self, item: &News) -> bool {
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if self.search.is_empty() {
            return true;
        }
        item.title
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Distinct categories in first-seen order, for the filter bar.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(item.category.as_str());
            }
        }
        seen
    }

    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => {
                let visible = self.visible();
                if visible.is_empty() {
                    return vec!["Новостей нет".to_string()];
                }
                visible
                    .iter()
                    .map(|item| format!("[{}] {} · {}", item.date, item.category, item.title))
                    .collect()
            }
        }
    }
}

/// Mount the news list: fetch through the cache and reduce the outcome.
pub async fn load(
    api: &ClubApi,
    queries: &QueryClient,
    options: QueryOptions,
) -> NewsListState {
    let api = api.clone();
    let result = observe_once(queries, keys::news_list(), options, move || {
        let api = api.clone();
        async move { api.list_news().await }
    })
    .await;

    let state = NewsListState::default();
    match result {
        Ok(items) => NewsListReducer::reduce(state, NewsListIntent::Loaded((*items).clone())),
        Err(message) => NewsListReducer::reduce(state, NewsListIntent::LoadFailed(message)),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArticleState {
    pub phase: LoadPhase,
    pub article: Option<News>,
}

impl PageState for ArticleState {}

#[derive(Debug)]
pub enum ArticleIntent {
    Loaded(News),
    LoadFailed(String),
}

impl Intent for ArticleIntent {}

pub struct ArticleReducer;

impl Reducer for ArticleReducer {
    type State = ArticleState;
    type Intent = ArticleIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ArticleIntent::Loaded(article) => ArticleState {
                phase: LoadPhase::Ready,
                article: Some(article),
            },
            ArticleIntent::LoadFailed(message) => ArticleState {
                phase: LoadPhase::Failed(message),
                article: None,
            },
        }
    }
}

impl ArticleState {
    pub fn render(&self) -> Vec<String> {
        match (&self.phase, &self.article) {
            (LoadPhase::Loading, _) => vec!["Загрузка...".to_string()],
            (LoadPhase::Failed(message), _) => vec![format!("Ошибка: {message}")],
            (LoadPhase::Ready, Some(article)) => {
                let mut lines = vec![
                    article.title.clone(),
                    format!("{} · {}", article.date, article.category),
                ];
                if !article.text.is_empty() {
                    lines.push(String::new());
                    lines.push(article.text.clone());
                }
                lines
            }
            (LoadPhase::Ready, None) => vec!["Новость не найдена".to_string()],
        }
    }
}

/// Mount one article page by id.
pub async fn load_article(
    api: &ClubApi,
    queries: &QueryClient,
    options: QueryOptions,
    id: i64,
) -> ArticleState {
    let api = api.clone();
    let result = observe_once(queries, keys::news_item(id), options, move || {
        let api = api.clone();
        async move { api.news(id).await }
    })
    .await;

    let state = ArticleState::default();
    match result {
        Ok(article) => ArticleReducer::reduce(state, ArticleIntent::Loaded((*article).clone())),
        Err(message) => ArticleReducer::reduce(state, ArticleIntent::LoadFailed(message)),
    }
}
