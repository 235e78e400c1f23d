// Player actions: search, detail lookup and the saved roster.

use tracing::debug;

use super::{ActionError, ActionResult};
use crate::api::{ApiError, PlayerApi};
use crate::models::{
    AddPlayerResponse, DeletePlayerResponse, NewSavedPlayer, PlayerDetail, PlayerSearchResult,
    SavedPlayer,
};

const SEARCH_FAILED: &str = "Search failed";
const DETAIL_FAILED: &str = "Failed to fetch player details";
const SAVED_FAILED: &str = "Failed to fetch saved players";
const ADD_FAILED: &str = "Failed to add player";
const DELETE_FAILED: &str = "Failed to delete player";

/// Fuzzy search by name. A blank query is rejected without a request.
pub async fn search_players<A: PlayerApi + ?Sized>(
    api: &A,
    query: &str,
) -> ActionResult<Vec<PlayerSearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        let err = ApiError::Validation("Search query is required".into());
        return Err(ActionError::from_api(&err, SEARCH_FAILED));
    }
    let results = api
        .search(query)
        .await
        .map_err(|e| ActionError::from_api(&e, SEARCH_FAILED))?;
    debug!("Search {:?} returned {} results", query, results.len());
    Ok(results)
}

pub async fn player_detail<A: PlayerApi + ?Sized>(
    api: &A,
    player_id: u64,
) -> ActionResult<PlayerDetail> {
    api.player_detail(player_id)
        .await
        .map_err(|e| ActionError::from_api(&e, DETAIL_FAILED))
}

pub async fn saved_players<A: PlayerApi + ?Sized>(api: &A) -> ActionResult<Vec<SavedPlayer>> {
    api.saved_players()
        .await
        .map_err(|e| ActionError::from_api(&e, SAVED_FAILED))
}

pub async fn add_player<A: PlayerApi + ?Sized>(
    api: &A,
    player: &NewSavedPlayer,
) -> ActionResult<AddPlayerResponse> {
    api.save_player(player)
        .await
        .map_err(|e| ActionError::from_api(&e, ADD_FAILED))
}

pub async fn delete_player<A: PlayerApi + ?Sized>(
    api: &A,
    player_id: u64,
) -> ActionResult<DeletePlayerResponse> {
    api.delete_saved_player(player_id)
        .await
        .map_err(|e| ActionError::from_api(&e, DELETE_FAILED))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{server_error, trout, FakeApi};
    use crate::models::PlayerSummary;

    #[tokio::test]
    async fn search_returns_matches() {
        let api = FakeApi::with_search_results(vec![trout()]);
        let results = search_players(&api, "trout").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Mike Trout");
        assert_eq!(api.calls(), vec!["search:trout"]);
    }

    #[tokio::test]
    async fn blank_search_never_calls_api() {
        let api = FakeApi::new();
        let err = search_players(&api, "   ").await.unwrap_err();
        assert_eq!(err.message, "Search query is required");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn search_failure_fallback() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Server {
            status: 503,
            detail: None,
        });
        let err = search_players(&api, "Trout").await.unwrap_err();
        assert_eq!(err.message, "Search failed");
    }

    #[tokio::test]
    async fn detail_failure_fallback() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Decode("missing id".into()));
        let err = player_detail(&api, 1).await.unwrap_err();
        assert_eq!(err.message, "Failed to fetch player details");
    }

    #[tokio::test]
    async fn add_then_list_saved() {
        let api = FakeApi::new();
        let player = NewSavedPlayer::from(&PlayerSummary::from(&trout()));
        add_player(&api, &player).await.unwrap();

        let saved = saved_players(&api).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, 1);
    }

    #[tokio::test]
    async fn add_failure_surfaces_detail() {
        let api = FakeApi::new();
        api.fail_next(server_error("Player already saved"));
        let player = NewSavedPlayer::from(&PlayerSummary::from(&trout()));
        let err = add_player(&api, &player).await.unwrap_err();
        assert_eq!(err.message, "Player already saved");
        assert!(api.saved_ids().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_player() {
        let api = FakeApi::new();
        let err = delete_player(&api, 99).await.unwrap_err();
        assert_eq!(err.message, "Player not found");
    }

    #[tokio::test]
    async fn saved_failure_fallback() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Server {
            status: 500,
            detail: Some(String::new()),
        });
        let err = saved_players(&api).await.unwrap_err();
        assert_eq!(err.message, "Failed to fetch saved players");

        api.fail_next(ApiError::Server {
            status: 500,
            detail: None,
        });
        let err = delete_player(&api, 1).await.unwrap_err();
        assert_eq!(err.message, "Failed to delete player");
    }
}
