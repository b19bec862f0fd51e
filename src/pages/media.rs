//! Media gallery page.

use crate::api::{keys, ClubApi, MediaItem};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaState {
    pub phase: LoadPhase,
    pub items: Vec<MediaItem>,
}

impl PageState for MediaState {}

#[derive(Debug)]
pub enum MediaIntent {
    Loaded(Vec<MediaItem>),
    LoadFailed(String),
}

impl Intent for MediaIntent {}

pub struct MediaReducer;

impl Reducer for MediaReducer {
    type State = MediaState;
    type Intent = MediaIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MediaIntent::Loaded(items) => MediaState {
                phase: LoadPhase::Ready,
                items,
            },
            MediaIntent::LoadFailed(message) => MediaState {
                phase: LoadPhase::Failed(message),
                items: Vec::new(),
            },
        }
    }
}

impl MediaState {
    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => {
                if self.items.is_empty() {
                    return vec!["Галерея пуста".to_string()];
                }
                self.items
                    .iter()
                    .map(|item| format!("[{}] {} ({})", item.date, item.title, item.url))
                    .collect()
            }
        }
    }
}

pub async fn load(api: &ClubApi, queries: &QueryClient, options: QueryOptions) -> MediaState {
    let api = api.clone();
    let result = observe_once(queries, keys::media(), options, move || {
        let api = api.clone();
        async move { api.list_media().await }
    })
    .await;

    let state = MediaState::default();
    match result {
        Ok(items) => MediaReducer::reduce(state, MediaIntent::Loaded((*items).clone())),
        Err(message) => MediaReducer::reduce(state, MediaIntent::LoadFailed(message)),
    }
}
