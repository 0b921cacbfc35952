//! Notification template endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::notification::{NotificationTemplate, TemplateType, UpdateTemplate},
};

use super::AuthenticatedUser;

/// List notification templates
#[utoipa::path(
    get,
    path = "/notification-templates",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All templates", body = Vec<NotificationTemplate>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_templates(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<NotificationTemplate>>> {
    claims.require_admin()?;

    let templates = state.services.notifications.list().await?;
    Ok(Json(templates))
}

/// Get a notification template by type
#[utoipa::path(
    get,
    path = "/notification-templates/{template_type}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("template_type" = String, Path, description = "Template type (purchase or borrow)")
    ),
    responses(
        (status = 200, description = "Template details", body = NotificationTemplate),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_template(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(template_type): Path<TemplateType>,
) -> AppResult<Json<NotificationTemplate>> {
    claims.require_admin()?;

    let template = state.services.notifications.get(template_type).await?;
    Ok(Json(template))
}

/// Update a notification template
#[utoipa::path(
    put,
    path = "/notification-templates/{template_type}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("template_type" = String, Path, description = "Template type (purchase or borrow)")
    ),
    request_body = UpdateTemplate,
    responses(
        (status = 200, description = "Template updated", body = NotificationTemplate),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn update_template(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(template_type): Path<TemplateType>,
    Json(request): Json<UpdateTemplate>,
) -> AppResult<Json<NotificationTemplate>> {
    claims.require_admin()?;

    let template = state
        .services
        .notifications
        .update(template_type, request)
        .await?;
    Ok(Json(template))
}
