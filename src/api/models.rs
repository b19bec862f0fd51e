//! Data-transfer records for the club API.
//!
//! The external API owns these schemas; the client only moves them. Every
//! record mirrors the JSON shape the server sends and is validated at the
//! client boundary by serde rather than trusted implicitly. Unknown fields
//! are ignored, optional fields default, so schema additions on the server
//! do not break deserialization here.

use serde::{Deserialize, Serialize};

/// A news article shown on `/news` and managed from the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    /// Free-form category label, e.g. "Общее" or "Матчи".
    pub category: String,
    /// Publication date as sent by the server (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body for creating or replacing a news article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsDraft {
    pub title: String,
    pub category: String,
    pub date: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A blog post; the public blog page fetches a limited slice of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: i64,
    pub name: String,
    /// Staff role, e.g. head coach, goalkeeping coach.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachDraft {
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDraft {
    pub name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A fixture or played match. Scores are absent until the match is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub date: String,
    pub opponent: String,
    #[serde(default)]
    pub home: bool,
    #[serde(default)]
    pub our_score: Option<i32>,
    #[serde(default)]
    pub their_score: Option<i32>,
    #[serde(default)]
    pub competition: String,
}

impl Match {
    /// A match counts as played once both scores are present.
    pub fn played(&self) -> bool {
        self.our_score.is_some() && self.their_score.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDraft {
    pub date: String,
    pub opponent: String,
    pub home: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_score: Option<i32>,
    pub competition: String,
}

/// One row of the league table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub id: i64,
    pub position: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingDraft {
    pub position: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
}

/// A milestone on the club history timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: i64,
    pub year: i32,
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDraft {
    pub year: i32,
    pub title: String,
    pub text: String,
}

/// A gallery entry (photo or video URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDraft {
    pub title: String,
    pub url: String,
    pub date: String,
}

/// A message sent through the contacts page, read from the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub text: String,
    #[serde(default)]
    pub date: String,
}

/// Body for the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub text: String,
}

/// An account known to the site. Only `isAdmin` gates anything client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_parses_minimal_shape() {
        let json = r#"{"id":1,"title":"X","category":"Общее","date":"2024-01-01"}"#;
        let news: News = serde_json::from_str(json).unwrap();
        assert_eq!(news.id, 1);
        assert_eq!(news.category, "Общее");
        assert_eq!(news.text, "");
        assert!(news.image.is_none());
    }

    #[test]
    fn news_ignores_unknown_fields() {
        let json = r#"{"id":2,"title":"Y","category":"Матчи","date":"2024-02-02","likes":17}"#;
        let news: News = serde_json::from_str(json).unwrap();
        assert_eq!(news.title, "Y");
    }

    #[test]
    fn user_admin_flag_uses_camel_case() {
        let json = r#"{"id":7,"name":"admin","isAdmin":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin);

        let json = r#"{"id":8,"name":"fan"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn match_played_requires_both_scores() {
        let mut fixture: Match = serde_json::from_str(
            r#"{"id":1,"date":"2024-05-01","opponent":"FC Dynamo"}"#,
        )
        .unwrap();
        assert!(!fixture.played());
        fixture.our_score = Some(2);
        assert!(!fixture.played());
        fixture.their_score = Some(1);
        assert!(fixture.played());
    }

    #[test]
    fn draft_skips_absent_optionals() {
        let draft = CoachDraft {
            name: "I. Petrov".to_string(),
            role: "head coach".to_string(),
            photo: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("photo"));
    }
}
