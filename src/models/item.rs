//! Inventory item model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Inventory item
///
/// Availability invariant: `is_available` is false exactly when
/// `current_borrower_id` is set. Both sides are only ever written together,
/// inside the borrow/return transactions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    /// Where the item lives in the workshop (shelf, drawer, ...)
    pub location: Option<String>,
    #[schema(value_type = Option<String>)]
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    /// Link to the supplier / product page
    pub external_link: Option<String>,
    pub is_purchasable: bool,
    #[schema(value_type = String)]
    pub price_per_unit: Decimal,
    pub stock_quantity: i32,
    pub is_available: bool,
    pub current_borrower_id: Option<i32>,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Item list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Substring match on name
    pub name: Option<String>,
    pub category_id: Option<i32>,
    /// Only items currently available for borrowing
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub location: Option<String>,
    #[schema(value_type = Option<String>)]
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    #[serde(default)]
    pub is_purchasable: bool,
    #[schema(value_type = Option<String>)]
    pub price_per_unit: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: Option<i32>,
}

/// Update item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>)]
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub is_purchasable: Option<bool>,
    #[schema(value_type = Option<String>)]
    pub price_per_unit: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: Option<i32>,
}
