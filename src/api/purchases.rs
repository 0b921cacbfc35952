//! Purchase endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        notification::NotificationTemplate,
        purchase::{CreatePurchase, Purchase, PurchaseDetails},
    },
};

use super::AuthenticatedUser;

/// Response for a completed purchase
#[derive(Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub success: bool,
    pub purchase: Purchase,
    /// Active purchase notification template, if one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationTemplate>,
}

/// Purchase an item
#[utoipa::path(
    post,
    path = "/purchases",
    tag = "purchases",
    security(("bearer_auth" = [])),
    request_body = CreatePurchase,
    responses(
        (status = 201, description = "Purchase recorded", body = PurchaseResponse),
        (status = 400, description = "Item is not purchasable or quantity invalid"),
        (status = 403, description = "Account is pending approval"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Insufficient stock")
    )
)]
pub async fn create_purchase(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreatePurchase>,
) -> AppResult<(StatusCode, Json<PurchaseResponse>)> {
    claims.require_member()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (purchase, notification) = state
        .services
        .purchases
        .purchase(claims.user_id, &claims.sub, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            success: true,
            purchase,
            notification,
        }),
    ))
}

/// List all purchases
#[utoipa::path(
    get,
    path = "/purchases",
    tag = "purchases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All purchases, most recent first", body = Vec<PurchaseDetails>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_purchases(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<PurchaseDetails>>> {
    claims.require_admin()?;

    let purchases = state.services.purchases.list().await?;
    Ok(Json(purchases))
}

/// List the authenticated user's purchases
#[utoipa::path(
    get,
    path = "/purchases/mine",
    tag = "purchases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own purchases, most recent first", body = Vec<PurchaseDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_purchases(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<PurchaseDetails>>> {
    let purchases = state.services.purchases.list_for_user(claims.user_id).await?;
    Ok(Json(purchases))
}
