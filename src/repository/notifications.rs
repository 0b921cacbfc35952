//! Notification template domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::notification::{NotificationTemplate, TemplateType, UpdateTemplate},
};

impl Repository {
    /// List all templates
    pub async fn templates_list(&self) -> AppResult<Vec<NotificationTemplate>> {
        let rows = sqlx::query_as::<_, NotificationTemplate>(
            "SELECT * FROM notification_templates ORDER BY template_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get template by type
    pub async fn templates_get(&self, template_type: TemplateType) -> AppResult<NotificationTemplate> {
        sqlx::query_as::<_, NotificationTemplate>(
            "SELECT * FROM notification_templates WHERE template_type = $1",
        )
        .bind(template_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template '{}' not found", template_type)))
    }

    /// Active template for a type, if any
    pub async fn templates_get_active(
        &self,
        template_type: TemplateType,
    ) -> AppResult<Option<NotificationTemplate>> {
        let row = sqlx::query_as::<_, NotificationTemplate>(
            "SELECT * FROM notification_templates WHERE template_type = $1 AND is_active = TRUE",
        )
        .bind(template_type)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a template
    pub async fn templates_update(
        &self,
        template_type: TemplateType,
        data: &UpdateTemplate,
    ) -> AppResult<NotificationTemplate> {
        let now = Utc::now();
        sqlx::query_as::<_, NotificationTemplate>(
            r#"
            UPDATE notification_templates SET
                title = COALESCE($1, title),
                message = COALESCE($2, message),
                is_active = COALESCE($3, is_active),
                updated_at = $4
            WHERE template_type = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.is_active)
        .bind(now)
        .bind(template_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template '{}' not found", template_type)))
    }
}
