// Wire types for the Cybermetrics REST API.
//
// Request and response bodies exchanged with the remote server, plus the
// `PlayerSummary` reference that the search, roster and lineup modules share.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Serialized as `null` when absent; the server treats both the same.
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub firebase_connected: bool,
}

impl HealthResponse {
    /// One-line description shown after a health check, e.g.
    /// "Server is healthy, Firebase is connected".
    pub fn summary(&self) -> String {
        let firebase = if self.firebase_connected {
            "connected"
        } else {
            "disconnected"
        };
        format!("Server is {}, Firebase is {}", self.status, firebase)
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A single hit from the fuzzy player index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSearchResult {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub years_active: String,
}

/// A player stored in the user's saved roster. The server may attach extra
/// fields; they are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_active: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /api/players/saved`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSavedPlayer {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddPlayerResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletePlayerResponse {
    #[serde(default)]
    pub message: String,
}

/// Biographical profile returned by `GET /api/players/{id}/detail`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub years_active: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mlb_played_first: Option<String>,
    pub mlb_played_last: Option<String>,
    pub key_retro: Option<String>,
    pub key_bbref: Option<String>,
    pub key_fangraphs: Option<i64>,
}

impl PlayerDetail {
    /// Labelled rows for the detail overlay. Absent (or empty) fields are
    /// skipped; the MLB id row is always present.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("MLB ID", self.id.to_string())];
        let optional: [(&'static str, Option<String>); 7] = [
            ("First Name", self.first_name.clone()),
            ("Last Name", self.last_name.clone()),
            ("First Year in MLB", self.mlb_played_first.clone()),
            ("Last Year in MLB", self.mlb_played_last.clone()),
            ("Retrosheet ID", self.key_retro.clone()),
            ("Baseball Reference ID", self.key_bbref.clone()),
            ("Fangraphs ID", self.key_fangraphs.map(|k| k.to_string())),
        ];
        for (label, value) in optional {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                rows.push((label, v));
            }
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// PlayerSummary
// ---------------------------------------------------------------------------

/// The player reference carried through search results, the saved roster
/// and the lineup. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
    pub years_active: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl From<&PlayerSearchResult> for PlayerSummary {
    fn from(r: &PlayerSearchResult) -> Self {
        PlayerSummary {
            id: r.id,
            name: r.name.clone(),
            image_url: non_empty(&r.image_url),
            years_active: non_empty(&r.years_active),
        }
    }
}

impl From<&SavedPlayer> for PlayerSummary {
    fn from(p: &SavedPlayer) -> Self {
        PlayerSummary {
            id: p.id,
            name: p.name.clone(),
            image_url: p.image_url.clone(),
            years_active: p.years_active.clone(),
        }
    }
}

impl From<&PlayerSummary> for NewSavedPlayer {
    fn from(p: &PlayerSummary) -> Self {
        NewSavedPlayer {
            id: p.id,
            name: p.name.clone(),
            image_url: p.image_url.clone(),
            years_active: p.years_active.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_summary_wording() {
        let up = HealthResponse {
            status: "healthy".into(),
            firebase_connected: true,
        };
        assert_eq!(up.summary(), "Server is healthy, Firebase is connected");

        let down = HealthResponse {
            status: "degraded".into(),
            firebase_connected: false,
        };
        assert_eq!(down.summary(), "Server is degraded, Firebase is disconnected");
    }

    #[test]
    fn saved_player_keeps_extra_fields() {
        let json = r#"{"id": 545361, "name": "Mike Trout", "team": "LAA", "added_at": "2025-01-01"}"#;
        let p: SavedPlayer = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, 545361);
        assert!(p.image_url.is_none());
        assert_eq!(p.extra.get("team").and_then(|v| v.as_str()), Some("LAA"));
    }

    #[test]
    fn new_saved_player_omits_missing_optionals() {
        let body = NewSavedPlayer {
            id: 1,
            name: "Mike Trout".into(),
            image_url: None,
            years_active: Some("2011-2024".into()),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("image_url").is_none());
        assert_eq!(v["years_active"], "2011-2024");
    }

    #[test]
    fn signup_request_sends_null_display_name() {
        let body = SignupRequest {
            email: "a@b.co".into(),
            password: "secret1".into(),
            display_name: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v["display_name"].is_null());
    }

    #[test]
    fn summary_from_search_result_drops_blank_strings() {
        let r = PlayerSearchResult {
            id: 7,
            name: "Joe Mauer".into(),
            score: 91.5,
            image_url: String::new(),
            years_active: "2004-2018".into(),
        };
        let s = PlayerSummary::from(&r);
        assert_eq!(s.id, 7);
        assert!(s.image_url.is_none());
        assert_eq!(s.years_active.as_deref(), Some("2004-2018"));
    }

    #[test]
    fn detail_rows_skip_absent_fields() {
        let d = PlayerDetail {
            id: 545361,
            name: "Mike Trout".into(),
            image_url: String::new(),
            years_active: None,
            first_name: Some("Mike".into()),
            last_name: Some("Trout".into()),
            mlb_played_first: Some("2011".into()),
            mlb_played_last: None,
            key_retro: Some(String::new()),
            key_bbref: Some("troutmi01".into()),
            key_fangraphs: Some(10155),
        };
        let labels: Vec<&str> = d.rows().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "MLB ID",
                "First Name",
                "Last Name",
                "First Year in MLB",
                "Baseball Reference ID",
                "Fangraphs ID"
            ]
        );
    }
}
