//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Workshop statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Total number of inventory items
    pub total_items: i64,
    /// Items currently borrowed
    pub borrowed_items: i64,
    /// Items currently available
    pub available_items: i64,
    /// Total number of user accounts
    pub total_users: i64,
    /// Total number of categories
    pub total_categories: i64,
}

/// Workshop statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current statistics", body = StatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
