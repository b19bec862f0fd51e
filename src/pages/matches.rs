//! Matches page: played results, the upcoming schedule, and the league
//! table. The match list and the table load independently, so a dead
//! standings endpoint still leaves the results readable.

use crate::api::{keys, ClubApi, Match, Standing};
use crate::pages::{observe_once, Intent, LoadPhase, PageState, Reducer};
use crate::query::{QueryClient, QueryOptions};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchesState {
    pub phase: LoadPhase,
    pub matches: Vec<Match>,
    pub standings_phase: LoadPhase,
    /// Full table, sorted by position.
    pub standings: Vec<Standing>,
}

impl PageState for MatchesState {}

#[derive(Debug)]
pub enum MatchesIntent {
    Loaded(Vec<Match>),
    LoadFailed(String),
    StandingsLoaded(Vec<Standing>),
    StandingsFailed(String),
}

impl Intent for MatchesIntent {}

pub struct MatchesReducer;

impl Reducer for MatchesReducer {
    type State = MatchesState;
    type Intent = MatchesIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MatchesIntent::Loaded(matches) => MatchesState {
                phase: LoadPhase::Ready,
                matches,
                ..state
            },
            MatchesIntent::LoadFailed(message) => MatchesState {
                phase: LoadPhase::Failed(message),
                matches: Vec::new(),
                ..state
            },
            MatchesIntent::StandingsLoaded(mut standings) => {
                standings.sort_by_key(|s| s.position);
                MatchesState {
                    standings_phase: LoadPhase::Ready,
                    standings,
                    ..state
                }
            }
            MatchesIntent::StandingsFailed(message) => MatchesState {
                standings_phase: LoadPhase::Failed(message),
                standings: Vec::new(),
                ..state
            },
        }
    }
}

impl MatchesState {
    pub fn played(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.played()).collect()
    }

    pub fn upcoming(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| !m.played()).collect()
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.phase {
            LoadPhase::Loading => lines.push("Загрузка...".to_string()),
            LoadPhase::Failed(message) => lines.push(format!("Ошибка: {message}")),
            LoadPhase::Ready => {
                lines.push("Результаты:".to_string());
                for m in self.played() {
                    lines.push(format!("  {}", result_line(m)));
                }
                lines.push("Календарь:".to_string());
                for m in self.upcoming() {
                    lines.push(format!("  {}", fixture_line(m)));
                }
            }
        }

        lines.push("Таблица:".to_string());
        match &self.standings_phase {
            LoadPhase::Loading => lines.push("  Загрузка...".to_string()),
            LoadPhase::Failed(message) => lines.push(format!("  Ошибка: {message}")),
            LoadPhase::Ready => {
                for row in &self.standings {
                    lines.push(format!(
                        "  {}. {} · {} · {} очков",
                        row.position,
                        row.team,
                        record_line(row),
                        row.points
                    ));
                }
            }
        }
        lines
    }
}

fn venue(m: &Match) -> &'static str {
    if m.home {
        "дома"
    } else {
        "в гостях"
    }
}

fn result_line(m: &Match) -> String {
    let ours = m.our_score.unwrap_or(0);
    let theirs = m.their_score.unwrap_or(0);
    format!(
        "[{}] {} {}:{} ({}, {})",
        m.date,
        m.opponent,
        ours,
        theirs,
        venue(m),
        m.competition
    )
}

fn fixture_line(m: &Match) -> String {
    format!("[{}] {} ({}, {})", m.date, m.opponent, venue(m), m.competition)
}

fn record_line(row: &Standing) -> String {
    format!("{}-{}-{}", row.won, row.drawn, row.lost)
}

pub async fn load(api: &ClubApi, queries: &QueryClient, options: QueryOptions) -> MatchesState {
    let matches_api = api.clone();
    let standings_api = api.clone();
    let (matches, standings) = tokio::join!(
        observe_once(queries, keys::matches(), options.clone(), move || {
            let api = matches_api.clone();
            async move { api.list_matches().await }
        }),
        observe_once(queries, keys::standings(), options, move || {
            let api = standings_api.clone();
            async move { api.list_standings().await }
        }),
    );

    let mut state = MatchesState::default();
    state = match matches {
        Ok(items) => MatchesReducer::reduce(state, MatchesIntent::Loaded((*items).clone())),
        Err(message) => MatchesReducer::reduce(state, MatchesIntent::LoadFailed(message)),
    };
    match standings {
        Ok(rows) => MatchesReducer::reduce(state, MatchesIntent::StandingsLoaded((*rows).clone())),
        Err(message) => MatchesReducer::reduce(state, MatchesIntent::StandingsFailed(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(opponent: &str, scores: Option<(i32, i32)>) -> Match {
        Match {
            id: 0,
            date: "2024-03-01".to_string(),
            opponent: opponent.to_string(),
            home: true,
            our_score: scores.map(|s| s.0),
            their_score: scores.map(|s| s.1),
            competition: "Лига".to_string(),
        }
    }

    fn row(position: u32, team: &str) -> Standing {
        Standing {
            id: position as i64,
            position,
            team: team.to_string(),
            played: 10,
            won: 6,
            drawn: 2,
            lost: 2,
            points: 20,
        }
    }

    #[test]
    fn played_and_upcoming_partition_the_list() {
        let state = MatchesReducer::reduce(
            MatchesState::default(),
            MatchesIntent::Loaded(vec![game("Заря", Some((2, 1))), game("Торпедо", None)]),
        );
        assert_eq!(state.played().len(), 1);
        assert_eq!(state.upcoming().len(), 1);
        assert_eq!(state.played()[0].opponent, "Заря");
    }

    #[test]
    fn table_sorts_by_position_and_survives_match_failure() {
        let state = MatchesReducer::reduce(
            MatchesState::default(),
            MatchesIntent::StandingsLoaded(vec![row(3, "Зенит"), row(1, "Спартак")]),
        );
        let state =
            MatchesReducer::reduce(state, MatchesIntent::LoadFailed("сервер упал".to_string()));

        assert_eq!(state.standings[0].team, "Спартак");
        let lines = state.render();
        assert_eq!(lines[0], "Ошибка: сервер упал");
        assert!(lines.iter().any(|l| l.contains("1. Спартак")));
    }
}
