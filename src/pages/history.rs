//! Club history page: a timeline of events, oldest first.

use crate::api::{keys, ClubApi, HistoryEvent};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryState {
    pub phase: LoadPhase,
    /// Sorted by year ascending.
    pub events: Vec<HistoryEvent>,
}

impl PageState for HistoryState {}

#[derive(Debug)]
pub enum HistoryIntent {
    Loaded(Vec<HistoryEvent>),
    LoadFailed(String),
}

impl Intent for HistoryIntent {}

pub struct HistoryReducer;

impl Reducer for HistoryReducer {
    type State = HistoryState;
    type Intent = HistoryIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            HistoryIntent::Loaded(mut events) => {
                events.sort_by_key(|e| e.year);
                HistoryState {
                    phase: LoadPhase::Ready,
                    events,
                }
            }
            HistoryIntent::LoadFailed(message) => HistoryState {
                phase: LoadPhase::Failed(message),
                events: Vec::new(),
            },
        }
    }
}

impl HistoryState {
    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => self
                .events
                .iter()
                .map(|e| format!("{} · {}", e.year, e.title))
                .collect(),
        }
    }
}

pub async fn load(api: &ClubApi, queries: &QueryClient, options: QueryOptions) -> HistoryState {
    let api = api.clone();
    let result = observe_once(queries, keys::history(), options, move || {
        let api = api.clone();
        async move { api.list_history().await }
    })
    .await;

    let state = HistoryState::default();
    match result {
        Ok(events) => HistoryReducer::reduce(state, HistoryIntent::Loaded((*events).clone())),
        Err(message) => HistoryReducer::reduce(state, HistoryIntent::LoadFailed(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_sort_by_year() {
        let event = |year: i32| HistoryEvent {
            id: 0,
            year,
            title: format!("y{year}"),
            text: String::new(),
        };
        let state = HistoryReducer::reduce(
            HistoryState::default(),
            HistoryIntent::Loaded(vec![event(2010), event(1965), event(1999)]),
        );
        let years: Vec<i32> = state.events.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1965, 1999, 2010]);
    }
}
