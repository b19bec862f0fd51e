//! Home page: latest news, the next fixture, and the top of the table.
//!
//! Three independent blocks with independent failure. A dead standings
//! endpoint must not blank the news column.

use crate::api::{keys, ClubApi, Match, News, Standing};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

const NEWS_PREVIEW: usize = 3;
const TABLE_PREVIEW: usize = 5;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeState {
    pub news_phase: LoadPhase,
    /// Latest items only, newest first as the server returns them.
    pub news: Vec<News>,
    pub match_phase: LoadPhase,
    pub next_match: Option<Match>,
    pub standings_phase: LoadPhase,
    /// Leading rows of the table, sorted by position.
    pub standings: Vec<Standing>,
}

impl PageState for HomeState {}

#[derive(Debug)]
pub enum HomeIntent {
    NewsLoaded(Vec<News>),
    NewsFailed(String),
    MatchesLoaded(Vec<Match>),
    MatchesFailed(String),
    StandingsLoaded(Vec<Standing>),
    StandingsFailed(String),
}

impl Intent for HomeIntent {}

pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Intent = HomeIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            HomeIntent::NewsLoaded(mut news) => {
                news.truncate(NEWS_PREVIEW);
                HomeState {
                    news_phase: LoadPhase::Ready,
                    news,
                    ..state
                }
            }
            HomeIntent::NewsFailed(message) => HomeState {
                news_phase: LoadPhase::Failed(message),
                news: Vec::new(),
                ..state
            },
            HomeIntent::MatchesLoaded(matches) => HomeState {
                match_phase: LoadPhase::Ready,
                next_match: matches.into_iter().find(|m| !m.played()),
                ..state
            },
            HomeIntent::MatchesFailed(message) => HomeState {
                match_phase: LoadPhase::Failed(message),
                next_match: None,
                ..state
            },
            HomeIntent::StandingsLoaded(mut standings) => {
                standings.sort_by_key(|s| s.position);
                standings.truncate(TABLE_PREVIEW);
                HomeState {
                    standings_phase: LoadPhase::Ready,
                    standings,
                    ..state
                }
            }
            HomeIntent::StandingsFailed(message) => HomeState {
                standings_phase: LoadPhase::Failed(message),
                standings: Vec::new(),
                ..state
            },
        }
    }
}

impl HomeState {
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["Новости:".to_string()];
        match &self.news_phase {
            LoadPhase::Loading => lines.push("  Загрузка...".to_string()),
            LoadPhase::Failed(message) => lines.push(format!("  Ошибка: {message}")),
            LoadPhase::Ready => {
                for item in &self.news {
                    lines.push(format!("  [{}] {}", item.date, item.title));
                }
            }
        }

        lines.push("Ближайший матч:".to_string());
        match (&self.match_phase, &self.next_match) {
            (LoadPhase::Loading, _) => lines.push("  Загрузка...".to_string()),
            (LoadPhase::Failed(message), _) => lines.push(format!("  Ошибка: {message}")),
            (LoadPhase::Ready, Some(m)) => {
                lines.push(format!("  [{}] {} ({})", m.date, m.opponent, m.competition));
            }
            (LoadPhase::Ready, None) => lines.push("  Матчей не запланировано".to_string()),
        }

        lines.push("Таблица:".to_string());
        match &self.standings_phase {
            LoadPhase::Loading => lines.push("  Загрузка...".to_string()),
            LoadPhase::Failed(message) => lines.push(format!("  Ошибка: {message}")),
            LoadPhase::Ready => {
                for row in &self.standings {
                    lines.push(format!(
                        "  {}. {} · {} очков",
                        row.position, row.team, row.points
                    ));
                }
            }
        }
        lines
    }
}

pub async fn load(api: &ClubApi, queries: &QueryClient, options: QueryOptions) -> HomeState {
    let news_api = api.clone();
    let matches_api = api.clone();
    let standings_api = api.clone();
    let (news, matches, standings) = tokio::join!(
        observe_once(queries, keys::news_list(), options.clone(), move || {
            let api = news_api.clone();
            async move { api.list_news().await }
        }),
        observe_once(queries, keys::matches(), options.clone(), move || {
            let api = matches_api.clone();
            async move { api.list_matches().await }
        }),
        observe_once(queries, keys::standings(), options, move || {
            let api = standings_api.clone();
            async move { api.list_standings().await }
        }),
    );

    let mut state = HomeState::default();
    state = match news {
        Ok(items) => HomeReducer::reduce(state, HomeIntent::NewsLoaded((*items).clone())),
        Err(message) => HomeReducer::reduce(state, HomeIntent::NewsFailed(message)),
    };
    state = match matches {
        Ok(items) => HomeReducer::reduce(state, HomeIntent::MatchesLoaded((*items).clone())),
        Err(message) => HomeReducer::reduce(state, HomeIntent::MatchesFailed(message)),
    };
    match standings {
        Ok(rows) => HomeReducer::reduce(state, HomeIntent::StandingsLoaded((*rows).clone())),
        Err(message) => HomeReducer::reduce(state, HomeIntent::StandingsFailed(message)),
    }
}
