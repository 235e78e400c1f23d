use super::{ActionError, ActionResult};
use crate::api::HealthApi;
use crate::models::HealthResponse;

const HEALTH_FAILED: &str = "Health check failed";

pub async fn check_health<A: HealthApi + ?Sized>(api: &A) -> ActionResult<HealthResponse> {
    api.health()
        .await
        .map_err(|e| ActionError::from_api(&e, HEALTH_FAILED))
}
