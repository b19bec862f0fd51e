//! Blog page: the latest posts, capped by the configured preview limit.

use crate::api::{keys, BlogPost, ClubApi};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogState {
    pub phase: LoadPhase,
    pub posts: Vec<BlogPost>,
    /// How many posts were requested; part of the cache key.
    pub limit: u32,
}

impl PageState for BlogState {}

#[derive(Debug)]
pub enum BlogIntent {
    Loaded(Vec<BlogPost>),
    LoadFailed(String),
}

impl Intent for BlogIntent {}

pub struct BlogReducer;

impl Reducer for BlogReducer {
    type State = BlogState;
    type Intent = BlogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            BlogIntent::Loaded(posts) => BlogState {
                phase: LoadPhase::Ready,
                posts,
                ..state
            },
            BlogIntent::LoadFailed(message) => BlogState {
                phase: LoadPhase::Failed(message),
                posts: Vec::new(),
                ..state
            },
        }
    }
}

impl BlogState {
    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => {
                if self.posts.is_empty() {
                    return vec!["Записей нет".to_string()];
                }
                self.posts
                    .iter()
                    .map(|post| format!("[{}] {}", post.date, post.title))
                    .collect()
            }
        }
    }
}

pub async fn load(
    api: &ClubApi,
    queries: &QueryClient,
    options: QueryOptions,
    limit: u32,
) -> BlogState {
    let api = api.clone();
    let result = observe_once(queries, keys::blog(limit), options, move || {
        let api = api.clone();
        async move { api.blog_posts(limit).await }
    })
    .await;

    let state = BlogState {
        limit,
        ..BlogState::default()
    };
    match result {
        Ok(posts) => BlogReducer::reduce(state, BlogIntent::Loaded((*posts).clone())),
        Err(message) => BlogReducer::reduce(state, BlogIntent::LoadFailed(message)),
    }
}
