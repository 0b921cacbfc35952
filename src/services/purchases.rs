//! Purchase service

use crate::{
    error::{AppError, AppResult},
    models::{
        notification::{NotificationTemplate, TemplateType},
        purchase::{CreatePurchase, Purchase, PurchaseDetails},
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct PurchasesService {
    repository: Repository,
    email: EmailService,
}

impl PurchasesService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Execute a purchase for a user
    ///
    /// Stock check, purchase row, and decrement run in one transaction; the
    /// admin email is a best-effort side effect after commit. Returns the
    /// purchase and the active purchase template, if configured.
    pub async fn purchase(
        &self,
        user_id: i32,
        username: &str,
        data: CreatePurchase,
    ) -> AppResult<(Purchase, Option<NotificationTemplate>)> {
        if data.quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".to_string()));
        }

        let purchase = self
            .repository
            .purchases_create(data.item_id, user_id, data.quantity, data.price_per_unit)
            .await?;

        let item = self.repository.items_get_by_id(data.item_id).await?;
        self.email
            .notify_admins(
                &self.repository,
                format!("Item purchased: {}", item.name),
                format!(
                    "{} purchased {} x \"{}\" for a total of {}.",
                    username, purchase.quantity, item.name, purchase.total_price
                ),
            )
            .await;

        let notification = self.repository.templates_get_active(TemplateType::Purchase).await?;
        Ok((purchase, notification))
    }

    /// All purchases (admin view)
    pub async fn list(&self) -> AppResult<Vec<PurchaseDetails>> {
        self.repository.purchases_list().await
    }

    /// Purchases of one user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PurchaseDetails>> {
        self.repository.purchases_list_for_user(user_id).await
    }
}
