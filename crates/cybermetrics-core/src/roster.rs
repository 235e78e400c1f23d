// Saved-roster mutations.
//
// Adds and removes are never applied optimistically: the mutation goes to
// the server first and, only when it succeeds, the full saved list is
// fetched again. `SavedRoster` holds the last list the server returned plus
// a short-lived banner describing the latest mutation.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::actions::{players, ActionResult};
use crate::api::PlayerApi;
use crate::models::{NewSavedPlayer, PlayerSummary, SavedPlayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

/// Result of one add or remove round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterOutcome {
    pub banner: Banner,
    /// The refreshed list; `None` when the mutation failed or the refresh
    /// itself failed.
    pub players: Option<Vec<SavedPlayer>>,
    pub refresh_error: Option<String>,
}

impl RosterOutcome {
    fn failed(message: String) -> Self {
        Self {
            banner: Banner::error(message),
            players: None,
            refresh_error: None,
        }
    }

    async fn refreshed<A: PlayerApi + ?Sized>(api: &A, banner: Banner) -> Self {
        match players::saved_players(api).await {
            Ok(list) => Self {
                banner,
                players: Some(list),
                refresh_error: None,
            },
            Err(e) => {
                warn!("Saved roster refresh failed: {}", e);
                Self {
                    banner,
                    players: None,
                    refresh_error: Some(e.message),
                }
            }
        }
    }
}

pub async fn add_and_refresh<A: PlayerApi + ?Sized>(
    api: &A,
    player: &PlayerSummary,
) -> RosterOutcome {
    match players::add_player(api, &NewSavedPlayer::from(player)).await {
        Ok(_) => {
            info!("Saved player {} ({})", player.name, player.id);
            let banner = Banner::success(format!("{} added to your roster", player.name));
            RosterOutcome::refreshed(api, banner).await
        }
        Err(e) => RosterOutcome::failed(e.message),
    }
}

pub async fn remove_and_refresh<A: PlayerApi + ?Sized>(api: &A, player_id: u64) -> RosterOutcome {
    match players::delete_player(api, player_id).await {
        Ok(_) => {
            info!("Removed player {}", player_id);
            let banner = Banner::success("Player removed from your roster");
            RosterOutcome::refreshed(api, banner).await
        }
        Err(e) => RosterOutcome::failed(e.message),
    }
}

// ---------------------------------------------------------------------------
// SavedRoster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SavedRoster {
    players: Vec<SavedPlayer>,
    banner: Option<(Banner, Instant)>,
    banner_ttl: Duration,
    load_error: Option<String>,
    loading: bool,
}

impl SavedRoster {
    pub fn new(banner_ttl: Duration) -> Self {
        Self {
            players: Vec::new(),
            banner: None,
            banner_ttl,
            load_error: None,
            loading: false,
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply the result of a plain list fetch (screen mount).
    pub fn apply_list(&mut self, result: ActionResult<Vec<SavedPlayer>>) {
        self.loading = false;
        match result {
            Ok(list) => {
                self.players = list;
                self.load_error = None;
            }
            Err(e) => self.load_error = Some(e.message),
        }
    }

    /// Apply an add/remove outcome. The list changes only when the server
    /// handed back a fresh one.
    pub fn apply(&mut self, outcome: RosterOutcome, now: Instant) {
        if let Some(list) = outcome.players {
            self.players = list;
            self.load_error = None;
        }
        if let Some(err) = outcome.refresh_error {
            self.load_error = Some(err);
        }
        self.banner = Some((outcome.banner, now + self.banner_ttl));
    }

    /// Drop the banner once it has been shown for the configured time.
    /// Returns `true` when something was removed.
    pub fn expire_banners(&mut self, now: Instant) -> bool {
        match self.banner {
            Some((_, expires)) if now >= expires => {
                self.banner = None;
                true
            }
            _ => false,
        }
    }

    pub fn banner_deadline(&self) -> Option<Instant> {
        self.banner.as_ref().map(|(_, at)| *at)
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref().map(|(b, _)| b)
    }

    pub fn players(&self) -> &[SavedPlayer] {
        &self.players
    }

    pub fn contains(&self, player_id: u64) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::fake::{server_error, trout, FakeApi};

    const TTL: Duration = Duration::from_millis(3000);

    fn trout_summary() -> PlayerSummary {
        PlayerSummary::from(&trout())
    }

    #[tokio::test]
    async fn add_saves_then_refetches() {
        let api = FakeApi::new();
        let outcome = add_and_refresh(&api, &trout_summary()).await;

        assert_eq!(api.calls(), vec!["save:1", "saved"]);
        assert_eq!(outcome.banner, Banner::success("Mike Trout added to your roster"));
        assert_eq!(outcome.players.as_ref().map(|l| l.len()), Some(1));
    }

    #[tokio::test]
    async fn failed_add_skips_refresh_and_keeps_list() {
        let api = FakeApi::new();
        let now = Instant::now();
        let mut roster = SavedRoster::new(TTL);
        roster.apply_list(Ok(vec![]));

        api.fail_next(server_error("Player already saved"));
        let outcome = add_and_refresh(&api, &trout_summary()).await;
        assert_eq!(api.calls(), vec!["save:1"]);

        roster.apply(outcome, now);
        assert!(roster.players().is_empty());
        assert_eq!(roster.banner(), Some(&Banner::error("Player already saved")));
    }

    #[tokio::test]
    async fn remove_refreshes_list() {
        let api = FakeApi::new();
        add_and_refresh(&api, &trout_summary()).await;

        let outcome = remove_and_refresh(&api, 1).await;
        assert_eq!(outcome.banner.message, "Player removed from your roster");
        assert_eq!(outcome.players, Some(vec![]));
    }

    #[tokio::test]
    async fn refresh_failure_keeps_success_banner() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Transport("reset".into()));

        let outcome = RosterOutcome::refreshed(&api, Banner::success("ok")).await;
        assert!(outcome.players.is_none());
        assert_eq!(outcome.refresh_error.as_deref(), Some("No response from server"));

        let mut roster = SavedRoster::new(TTL);
        roster.apply(outcome, Instant::now());
        assert_eq!(roster.banner().map(|b| b.kind), Some(BannerKind::Success));
        assert_eq!(roster.load_error(), Some("No response from server"));
    }

    #[test]
    fn banner_expires_after_ttl() {
        let now = Instant::now();
        let mut roster = SavedRoster::new(TTL);
        roster.apply(
            RosterOutcome {
                banner: Banner::success("x"),
                players: Some(vec![]),
                refresh_error: None,
            },
            now,
        );

        assert_eq!(roster.banner_deadline(), Some(now + TTL));
        assert!(!roster.expire_banners(now + Duration::from_millis(2999)));
        assert!(roster.banner().is_some());
        assert!(roster.expire_banners(now + TTL));
        assert!(roster.banner().is_none());
        assert!(roster.banner_deadline().is_none());
    }

    #[test]
    fn contains_tracks_saved_ids() {
        let mut roster = SavedRoster::new(TTL);
        roster.begin_load();
        assert!(roster.is_loading());
        roster.apply_list(Ok(vec![SavedPlayer {
            id: 7,
            name: "Joe Mauer".into(),
            image_url: None,
            years_active: None,
            extra: Default::default(),
        }]));
        assert!(!roster.is_loading());
        assert!(roster.contains(7));
        assert!(!roster.contains(1));
    }

    #[test]
    fn load_failure_keeps_previous_list() {
        let mut roster = SavedRoster::new(TTL);
        roster.apply_list(Ok(vec![]));
        roster.apply_list(Err(crate::actions::ActionError::new(
            "Failed to fetch saved players",
        )));
        assert_eq!(roster.load_error(), Some("Failed to fetch saved players"));
    }
}
