// In-memory stand-in for the remote API, shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, AuthApi, HealthApi, PlayerApi};
use crate::models::*;

/// Records every call and serves canned data. Queued failures are consumed
/// by the next call, whatever it is.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub search_results: Mutex<Vec<PlayerSearchResult>>,
    pub saved: Mutex<Vec<SavedPlayer>>,
    pub calls: Mutex<Vec<String>>,
    pub failures: Mutex<VecDeque<ApiError>>,
    pub token_valid: Mutex<bool>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        *api.token_valid.lock().unwrap() = true;
        api
    }

    pub fn with_search_results(results: Vec<PlayerSearchResult>) -> Self {
        let api = Self::new();
        *api.search_results.lock().unwrap() = results;
        api
    }

    pub fn fail_next(&self, err: ApiError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saved_ids(&self) -> Vec<u64> {
        self.saved.lock().unwrap().iter().map(|p| p.id).collect()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub(crate) fn trout() -> PlayerSearchResult {
    PlayerSearchResult {
        id: 1,
        name: "Mike Trout".into(),
        score: 98.0,
        image_url: "https://img.example/trout.png".into(),
        years_active: "2011-2024".into(),
    }
}

pub(crate) fn server_error(detail: &str) -> ApiError {
    ApiError::Server {
        status: 400,
        detail: Some(detail.to_string()),
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{}", request.email))?;
        Ok(LoginResponse {
            message: "Login successful".into(),
            user_id: "uid-1".into(),
            email: request.email.clone(),
            token: "token-abc".into(),
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.record(format!("signup:{}", request.email))?;
        Ok(SignupResponse {
            message: "User created".into(),
            user_id: "uid-2".into(),
            email: request.email.clone(),
        })
    }

    async fn verify(&self) -> Result<VerifyTokenResponse, ApiError> {
        self.record("verify".into())?;
        if *self.token_valid.lock().unwrap() {
            Ok(VerifyTokenResponse {
                message: "Token valid".into(),
                user_id: "uid-1".into(),
                email: "scout@example.com".into(),
            })
        } else {
            Err(ApiError::Server {
                status: 401,
                detail: Some("Invalid or expired token".into()),
            })
        }
    }
}

#[async_trait]
impl HealthApi for FakeApi {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record("health".into())?;
        Ok(HealthResponse {
            status: "healthy".into(),
            firebase_connected: true,
        })
    }
}

#[async_trait]
impl PlayerApi for FakeApi {
    async fn search(&self, query: &str) -> Result<Vec<PlayerSearchResult>, ApiError> {
        self.record(format!("search:{query}"))?;
        let needle = query.to_lowercase();
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn player_detail(&self, player_id: u64) -> Result<PlayerDetail, ApiError> {
        self.record(format!("detail:{player_id}"))?;
        Ok(PlayerDetail {
            id: player_id,
            name: "Mike Trout".into(),
            image_url: String::new(),
            years_active: Some("2011-2024".into()),
            first_name: Some("Mike".into()),
            last_name: Some("Trout".into()),
            mlb_played_first: Some("2011".into()),
            mlb_played_last: None,
            key_retro: None,
            key_bbref: Some("troutmi01".into()),
            key_fangraphs: Some(10155),
        })
    }

    async fn saved_players(&self) -> Result<Vec<SavedPlayer>, ApiError> {
        self.record("saved".into())?;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save_player(&self, player: &NewSavedPlayer) -> Result<AddPlayerResponse, ApiError> {
        self.record(format!("save:{}", player.id))?;
        let mut saved = self.saved.lock().unwrap();
        saved.retain(|p| p.id != player.id);
        saved.push(SavedPlayer {
            id: player.id,
            name: player.name.clone(),
            image_url: player.image_url.clone(),
            years_active: player.years_active.clone(),
            extra: Default::default(),
        });
        Ok(AddPlayerResponse {
            message: "Player added".into(),
            player_id: player.id.to_string(),
        })
    }

    async fn delete_saved_player(&self, player_id: u64) -> Result<DeletePlayerResponse, ApiError> {
        self.record(format!("delete:{player_id}"))?;
        let mut saved = self.saved.lock().unwrap();
        let before = saved.len();
        saved.retain(|p| p.id != player_id);
        if saved.len() == before {
            return Err(ApiError::Server {
                status: 404,
                detail: Some("Player not found".into()),
            });
        }
        Ok(DeletePlayerResponse {
            message: "Player deleted".into(),
        })
    }
}
