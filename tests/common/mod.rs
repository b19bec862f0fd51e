//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use std::path::PathBuf;

use matchday::api::ClubApi;
use matchday::app::AppContext;
use matchday::config::{Config, ConfigStore};
use serde_json::{json, Value};

/// Config pointed at a mock server, with short timeouts.
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.api.connect_timeout_seconds = 2;
    config
}

pub fn make_api(base_url: &str) -> ClubApi {
    ClubApi::from_config(&test_config(base_url).api)
}

pub fn make_app(base_url: &str) -> AppContext {
    let config = ConfigStore::new(
        test_config(base_url),
        PathBuf::from("/tmp/matchday-test.toml"),
    );
    AppContext::new(config)
}

// -- JSON fixtures ------------------------------------------------------------

pub fn news_json(id: i64, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": category,
        "date": "2024-05-01",
        "text": "text",
    })
}

pub fn user_json(id: i64, name: &str, is_admin: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{name}@club.ru"),
        "isAdmin": is_admin,
    })
}

pub fn coach_json(id: i64, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "role": role,
    })
}

pub fn player_json(id: i64, name: &str, number: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "position": "защитник",
        "number": number,
    })
}

pub fn fixture_json(id: i64, opponent: &str) -> Value {
    json!({
        "id": id,
        "date": "2024-09-14",
        "opponent": opponent,
        "home": true,
        "competition": "Чемпионат",
    })
}

pub fn standing_json(id: i64, position: u32, team: &str, points: u32) -> Value {
    json!({
        "id": id,
        "position": position,
        "team": team,
        "played": 10,
        "won": 6,
        "drawn": 2,
        "lost": 2,
        "points": points,
    })
}

pub fn media_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "url": format!("https://cdn.club.ru/{id}.jpg"),
        "date": "2024-05-01",
    })
}
