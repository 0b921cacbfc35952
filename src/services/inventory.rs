//! Inventory service: item CRUD and the borrow/return flows

use crate::{
    error::AppResult,
    models::{
        borrowing::BorrowingHistoryDetails,
        item::{CreateItem, InventoryItem, ItemQuery, UpdateItem},
        notification::{NotificationTemplate, TemplateType},
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    email: EmailService,
}

impl InventoryService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    pub async fn search(&self, query: &ItemQuery) -> AppResult<(Vec<InventoryItem>, i64)> {
        self.repository.items_search(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<InventoryItem> {
        self.repository.items_get_by_id(id).await
    }

    pub async fn create(&self, data: CreateItem) -> AppResult<InventoryItem> {
        // Ensure the category reference is valid before inserting
        self.repository.categories_get_by_id(data.category_id).await?;
        self.repository.items_create(&data).await
    }

    pub async fn update(&self, id: i32, data: UpdateItem) -> AppResult<InventoryItem> {
        if let Some(category_id) = data.category_id {
            self.repository.categories_get_by_id(category_id).await?;
        }
        self.repository.items_update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.items_delete(id).await
    }

    /// Borrow an item for a user
    ///
    /// The state change is transactional; the admin email notification is a
    /// best-effort side effect that never fails the borrow. Returns the item
    /// and the active borrow template, if one is configured.
    pub async fn borrow(
        &self,
        item_id: i32,
        borrower_id: i32,
        borrower_name: &str,
    ) -> AppResult<(InventoryItem, Option<NotificationTemplate>)> {
        let item = self.repository.items_borrow(item_id, borrower_id).await?;

        self.email
            .notify_admins(
                &self.repository,
                format!("Item borrowed: {}", item.name),
                format!("{} borrowed \"{}\".", borrower_name, item.name),
            )
            .await;

        let notification = self.repository.templates_get_active(TemplateType::Borrow).await?;
        Ok((item, notification))
    }

    /// Return an item, allowed for the current borrower and for admins
    pub async fn return_item(
        &self,
        item_id: i32,
        caller_id: i32,
        caller_is_admin: bool,
    ) -> AppResult<InventoryItem> {
        self.repository
            .items_return(item_id, caller_id, caller_is_admin)
            .await
    }

    /// Borrow ledger for an item
    pub async fn history(&self, item_id: i32) -> AppResult<Vec<BorrowingHistoryDetails>> {
        self.repository.items_history(item_id).await
    }

    /// Items currently borrowed by a user
    pub async fn borrowed_by(&self, user_id: i32) -> AppResult<Vec<InventoryItem>> {
        self.repository.items_borrowed_by(user_id).await
    }
}
