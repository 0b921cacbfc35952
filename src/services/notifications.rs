//! Notification template service

use crate::{
    error::AppResult,
    models::notification::{NotificationTemplate, TemplateType, UpdateTemplate},
    repository::Repository,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<NotificationTemplate>> {
        self.repository.templates_list().await
    }

    pub async fn get(&self, template_type: TemplateType) -> AppResult<NotificationTemplate> {
        self.repository.templates_get(template_type).await
    }

    pub async fn update(
        &self,
        template_type: TemplateType,
        data: UpdateTemplate,
    ) -> AppResult<NotificationTemplate> {
        self.repository.templates_update(template_type, &data).await
    }
}
