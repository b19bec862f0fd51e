//! Team page: the squad and the coaching staff, loaded side by side.

use crate::api::{keys, ClubApi, Coach, Player};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamState {
    pub phase: LoadPhase,
    /// Squad sorted by shirt number; unnumbered players go last.
    pub players: Vec<Player>,
    pub coaches: Vec<Coach>,
}

impl PageState for TeamState {}

#[derive(Debug)]
pub enum TeamIntent {
    Loaded {
        players: Vec<Player>,
        coaches: Vec<Coach>,
    },
    LoadFailed(String),
}

impl Intent for TeamIntent {}

pub struct TeamReducer;

impl Reducer for TeamReducer {
    type State = TeamState;
    type Intent = TeamIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TeamIntent::Loaded {
                mut players,
                coaches,
            } => {
                players.sort_by_key(|p| p.number.map_or(u32::MAX, |n| n));
                TeamState {
                    phase: LoadPhase::Ready,
                    players,
                    coaches,
                }
            }
            TeamIntent::LoadFailed(message) => TeamState {
                phase: LoadPhase::Failed(message),
                players: Vec::new(),
                coaches: Vec::new(),
            },
        }
    }
}

impl TeamState {
    pub fn render(&self) -> Vec<String> {
        match &self.phase {
            LoadPhase::Loading => vec!["Загрузка...".to_string()],
            LoadPhase::Failed(message) => vec![format!("Ошибка: {message}")],
            LoadPhase::Ready => {
                let mut lines = vec!["Тренерский штаб:".to_string()];
                for coach in &self.coaches {
                    lines.push(format!("  {} · {}", coach.name, coach.role));
                }
                lines.push("Состав:".to_string());
                for player in &self.players {
                    let number = player
                        .number
                        .map_or_else(|| "--".to_string(), |n| n.to_string());
                    lines.push(format!("  {number:>2} {} · {}", player.name, player.position));
                }
                lines
            }
        }
    }
}

/// Mount the team page. Both lists load concurrently; one failure fails
/// the page.
pub async fn load(api: &ClubApi, queries: &QueryClient, options: QueryOptions) -> TeamState {
    let players_api = api.clone();
    let coaches_api = api.clone();
    let (players, coaches) = tokio::join!(
        observe_once(queries, keys::players(), options.clone(), move || {
            let api = players_api.clone();
            async move { api.list_players().await }
        }),
        observe_once(queries, keys::coaches(), options, move || {
            let api = coaches_api.clone();
            async move { api.list_coaches().await }
        }),
    );

    let state = TeamState::default();
    match (players, coaches) {
        (Ok(players), Ok(coaches)) => TeamReducer::reduce(
            state,
            TeamIntent::Loaded {
                players: (*players).clone(),
                coaches: (*coaches).clone(),
            },
        ),
        (Err(message), _) | (_, Err(message)) => {
            TeamReducer::reduce(state, TeamIntent::LoadFailed(message))
        }
    }
}
