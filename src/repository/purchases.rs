//! Purchase domain methods on Repository
//!
//! The purchase flow locks the item row, verifies stock inside the same
//! transaction, records the immutable purchase row, and decrements stock.
//! Two concurrent purchases of the same item serialize on the row lock, so
//! stock can never go negative.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::purchase::{Purchase, PurchaseDetails},
};

impl Repository {
    /// Execute a purchase transaction
    pub async fn purchases_create(
        &self,
        item_id: i32,
        user_id: i32,
        quantity: i32,
        price_per_unit: Option<Decimal>,
    ) -> AppResult<Purchase> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT is_purchasable, price_per_unit, stock_quantity FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

        let is_purchasable: bool = row.get("is_purchasable");
        if !is_purchasable {
            return Err(AppError::Validation("Item is not purchasable".to_string()));
        }

        let stock_quantity: i32 = row.get("stock_quantity");
        if stock_quantity < quantity {
            return Err(AppError::InsufficientStock(format!(
                "Requested {} but only {} in stock",
                quantity, stock_quantity
            )));
        }

        let unit_price = price_per_unit.unwrap_or_else(|| row.get("price_per_unit"));
        let total_price = unit_price * Decimal::from(quantity);

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (item_id, user_id, quantity, price_per_unit, total_price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_price)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE inventory_items SET stock_quantity = stock_quantity - $1, updated_at = $2 WHERE id = $3",
        )
        .bind(quantity)
        .bind(now)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(purchase)
    }

    /// List all purchases, newest first
    pub async fn purchases_list(&self) -> AppResult<Vec<PurchaseDetails>> {
        let rows = sqlx::query_as::<_, PurchaseDetails>(
            r#"
            SELECT p.id, p.item_id, i.name AS item_name,
                   p.user_id, u.username,
                   p.quantity, p.price_per_unit, p.total_price, p.created_at
            FROM purchases p
            JOIN inventory_items i ON p.item_id = i.id
            JOIN users u ON p.user_id = u.id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List purchases made by one user, newest first
    pub async fn purchases_list_for_user(&self, user_id: i32) -> AppResult<Vec<PurchaseDetails>> {
        let rows = sqlx::query_as::<_, PurchaseDetails>(
            r#"
            SELECT p.id, p.item_id, i.name AS item_name,
                   p.user_id, u.username,
                   p.quantity, p.price_per_unit, p.total_price, p.created_at
            FROM purchases p
            JOIN inventory_items i ON p.item_id = i.id
            JOIN users u ON p.user_id = u.id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
