//! Inventory item domain methods on Repository
//!
//! Owns the borrow/return transactional core. Both flows lock the item row
//! with SELECT ... FOR UPDATE so the availability check and the writes are
//! serialized against concurrent requests on the same item.

use chrono::Utc;
use sqlx::Row;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::BorrowingHistoryDetails,
        item::{CreateItem, InventoryItem, ItemQuery, UpdateItem},
    },
};

impl Repository {
    /// Search items with pagination
    pub async fn items_search(&self, query: &ItemQuery) -> AppResult<(Vec<InventoryItem>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 0;

        if query.name.is_some() {
            idx += 1;
            conditions.push(format!("LOWER(name) LIKE ${}", idx));
        }
        if query.category_id.is_some() {
            idx += 1;
            conditions.push(format!("category_id = ${}", idx));
        }
        if query.available.is_some() {
            idx += 1;
            conditions.push(format!("is_available = ${}", idx));
        }

        let where_clause = conditions.join(" AND ");
        let name_pattern = query.name.as_ref().map(|n| format!("%{}%", n.to_lowercase()));

        let count_sql = format!("SELECT COUNT(*) FROM inventory_items WHERE {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref pattern) = name_pattern {
            count_query = count_query.bind(pattern);
        }
        if let Some(category_id) = query.category_id {
            count_query = count_query.bind(category_id);
        }
        if let Some(available) = query.available {
            count_query = count_query.bind(available);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM inventory_items WHERE {} ORDER BY name LIMIT ${} OFFSET ${}",
            where_clause,
            idx + 1,
            idx + 2
        );
        let mut list_query = sqlx::query_as::<_, InventoryItem>(&list_sql);
        if let Some(ref pattern) = name_pattern {
            list_query = list_query.bind(pattern);
        }
        if let Some(category_id) = query.category_id {
            list_query = list_query.bind(category_id);
        }
        if let Some(available) = query.available {
            list_query = list_query.bind(available);
        }
        let items = list_query.bind(per_page).bind(offset).fetch_all(&self.pool).await?;

        Ok((items, total))
    }

    /// Get item by ID
    pub async fn items_get_by_id(&self, id: i32) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Create item
    pub async fn items_create(&self, data: &CreateItem) -> AppResult<InventoryItem> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (
                name, description, category_id, location,
                purchase_price, purchase_date, image_url, external_link,
                is_purchasable, price_per_unit, stock_quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 0), COALESCE($11, 0))
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category_id)
        .bind(&data.location)
        .bind(data.purchase_price)
        .bind(data.purchase_date)
        .bind(&data.image_url)
        .bind(&data.external_link)
        .bind(data.is_purchasable)
        .bind(data.price_per_unit)
        .bind(data.stock_quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    /// Update item (borrow state fields are never touched here)
    pub async fn items_update(&self, id: i32, data: &UpdateItem) -> AppResult<InventoryItem> {
        let now = Utc::now();
        sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                category_id = COALESCE($3, category_id),
                location = COALESCE($4, location),
                purchase_price = COALESCE($5, purchase_price),
                purchase_date = COALESCE($6, purchase_date),
                image_url = COALESCE($7, image_url),
                external_link = COALESCE($8, external_link),
                is_purchasable = COALESCE($9, is_purchasable),
                price_per_unit = COALESCE($10, price_per_unit),
                stock_quantity = COALESCE($11, stock_quantity),
                updated_at = $12
            WHERE id = $13
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category_id)
        .bind(&data.location)
        .bind(data.purchase_price)
        .bind(data.purchase_date)
        .bind(&data.image_url)
        .bind(&data.external_link)
        .bind(data.is_purchasable)
        .bind(data.price_per_unit)
        .bind(data.stock_quantity)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Delete item
    pub async fn items_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }

    /// Borrow an item
    ///
    /// Atomically: verify the item exists and is available, mark it borrowed,
    /// and open a borrowing_history row. Refused with a conflict when the
    /// item is already out; no partial state is ever visible.
    pub async fn items_borrow(&self, item_id: i32, borrower_id: i32) -> AppResult<InventoryItem> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT is_available FROM inventory_items WHERE id = $1 FOR UPDATE")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let is_available: bool = row.get("is_available");
        if !is_available {
            return Err(AppError::Conflict("Item is already borrowed".to_string()));
        }

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET is_available = FALSE, current_borrower_id = $1, borrowed_at = $2, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(borrower_id)
        .bind(now)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO borrowing_history (item_id, borrower_id, borrowed_at, is_returned)
            VALUES ($1, $2, $3, FALSE)
            "#,
        )
        .bind(item_id)
        .bind(borrower_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Return an item
    ///
    /// Atomically clears the borrower fields and closes the latest unreturned
    /// history row. The admin-or-borrower policy is checked on the locked row
    /// so a concurrent re-borrow cannot be cleared by a stale borrower. A
    /// missing open history row indicates drift between item state and
    /// ledger: the state reset still proceeds, with a warning.
    pub async fn items_return(
        &self,
        item_id: i32,
        caller_id: i32,
        caller_is_admin: bool,
    ) -> AppResult<InventoryItem> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT current_borrower_id FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let current_borrower_id: Option<i32> = row.get("current_borrower_id");
        if !caller_is_admin && current_borrower_id != Some(caller_id) {
            return Err(AppError::Authorization(
                "Only the borrower or an admin can return this item".to_string(),
            ));
        }

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET is_available = TRUE, current_borrower_id = NULL, borrowed_at = NULL, updated_at = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        let closed = sqlx::query(
            r#"
            UPDATE borrowing_history
            SET returned_at = $1, is_returned = TRUE
            WHERE id = (
                SELECT id FROM borrowing_history
                WHERE item_id = $2 AND is_returned = FALSE
                ORDER BY borrowed_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(now)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() == 0 {
            tracing::warn!(
                item_id,
                "return with no open borrowing_history row; item state and ledger have drifted"
            );
        }

        tx.commit().await?;
        Ok(item)
    }

    /// Borrowing ledger for an item, newest first
    pub async fn items_history(&self, item_id: i32) -> AppResult<Vec<BorrowingHistoryDetails>> {
        // Existence check gives a clean 404 for unknown items
        self.items_get_by_id(item_id).await?;

        let rows = sqlx::query_as::<_, BorrowingHistoryDetails>(
            r#"
            SELECT h.id, h.item_id, i.name AS item_name,
                   h.borrower_id, u.username AS borrower_username,
                   h.borrowed_at, h.returned_at, h.is_returned
            FROM borrowing_history h
            JOIN inventory_items i ON h.item_id = i.id
            JOIN users u ON h.borrower_id = u.id
            WHERE h.item_id = $1
            ORDER BY h.borrowed_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Open borrows for a user (unreturned history rows)
    pub async fn items_borrowed_by(&self, user_id: i32) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE current_borrower_id = $1 ORDER BY borrowed_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of open borrows held by a user (delete guard)
    pub async fn items_borrowed_count(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_items WHERE current_borrower_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
