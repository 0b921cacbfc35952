//! Inventory endpoints: item CRUD, borrowing and returning

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::BorrowingHistoryDetails,
        item::{CreateItem, InventoryItem, ItemQuery, UpdateItem},
        notification::NotificationTemplate,
    },
};

use super::AuthenticatedUser;

/// Generic paginated list response
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// Response for a successful borrow
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub success: bool,
    pub item: InventoryItem,
    /// Active borrow notification template, if one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationTemplate>,
}

/// Response for a successful return
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub success: bool,
    pub item: InventoryItem,
}

/// List inventory items with search and pagination
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("name" = Option<String>, Query, description = "Search by name"),
        ("category_id" = Option<i32>, Query, description = "Filter by category"),
        ("available" = Option<bool>, Query, description = "Filter by availability"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of inventory items", body = PaginatedResponse<InventoryItem>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<PaginatedResponse<InventoryItem>>> {
    let (items, total) = state.services.inventory.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get inventory item details by ID
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = InventoryItem),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<InventoryItem>> {
    let item = state.services.inventory.get_by_id(id).await?;
    Ok(Json(item))
}

/// Create an inventory item
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = InventoryItem),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    claims.require_admin()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = state.services.inventory.create(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an inventory item
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = InventoryItem),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateItem>,
) -> AppResult<Json<InventoryItem>> {
    claims.require_admin()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = state.services.inventory.update(id, request).await?;
    Ok(Json(item))
}

/// Delete an inventory item
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.inventory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow an item
#[utoipa::path(
    post,
    path = "/inventory/{id}/borrow",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item borrowed", body = BorrowResponse),
        (status = 403, description = "Account is pending approval"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item is already borrowed")
    )
)]
pub async fn borrow_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowResponse>> {
    claims.require_member()?;

    let (item, notification) = state
        .services
        .inventory
        .borrow(id, claims.user_id, &claims.sub)
        .await?;

    Ok(Json(BorrowResponse {
        success: true,
        item,
        notification,
    }))
}

/// Return a borrowed item
///
/// Allowed for the current borrower and for admins.
#[utoipa::path(
    post,
    path = "/inventory/{id}/return",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item returned", body = ReturnResponse),
        (status = 403, description = "Only the borrower or an admin can return this item"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn return_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let item = state
        .services
        .inventory
        .return_item(id, claims.user_id, claims.is_admin())
        .await?;
    Ok(Json(ReturnResponse { success: true, item }))
}

/// Borrow history of an item
#[utoipa::path(
    get,
    path = "/inventory/{id}/history",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Borrow ledger, most recent first", body = Vec<BorrowingHistoryDetails>),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn item_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BorrowingHistoryDetails>>> {
    claims.require_admin()?;

    let history = state.services.inventory.history(id).await?;
    Ok(Json(history))
}

/// Items currently borrowed by the authenticated user
#[utoipa::path(
    get,
    path = "/inventory/borrowed",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed items", body = Vec<InventoryItem>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn borrowed_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.services.inventory.borrowed_by(claims.user_id).await?;
    Ok(Json(items))
}
