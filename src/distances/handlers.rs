use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{dto::DistancesResponse, stats::distance_report};
use crate::{auth::AdminAuth, error::ApiError, state::AppState};

pub fn distance_routes() -> Router<AppState> {
    Router::new().route("/distances", get(get_distances))
}

/// GET /distances: pairwise distances between all users plus summary stats.
#[instrument(skip_all)]
pub async fn get_distances(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DistancesResponse>, ApiError> {
    let users = state.store.list_all().await?;
    let report = distance_report(&users)
        .inspect_err(|e| warn!(error = %e, "distance report failed"))?;
    info!(
        users = users.len(),
        pairs = report.distances.len(),
        "distances computed"
    );
    Ok(Json(report))
}
