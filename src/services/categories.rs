//! Category management service

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CreateCategory, UpdateCategory},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.repository.categories_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        self.repository.categories_get_by_id(id).await
    }

    pub async fn create(&self, data: CreateCategory) -> AppResult<Category> {
        if self.repository.categories_name_exists(&data.name, None).await? {
            return Err(AppError::Conflict("Category name already exists".to_string()));
        }
        self.repository.categories_create(&data).await
    }

    pub async fn update(&self, id: i32, data: UpdateCategory) -> AppResult<Category> {
        if let Some(ref name) = data.name {
            if self.repository.categories_name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict("Category name already exists".to_string()));
            }
        }
        self.repository.categories_update(id, &data).await
    }

    /// Delete a category; refused while inventory items still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.categories_get_by_id(id).await?;

        let in_use = self.repository.categories_item_count(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category is referenced by {} inventory item(s)",
                in_use
            )));
        }

        self.repository.categories_delete(id).await
    }
}
