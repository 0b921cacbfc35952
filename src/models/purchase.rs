//! Purchase model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Immutable purchase record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Purchase {
    pub id: i32,
    pub item_id: i32,
    pub user_id: i32,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price_per_unit: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Create purchase request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchase {
    pub item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Unit price at the time of purchase; defaults to the item's current
    /// price when omitted
    #[schema(value_type = Option<String>)]
    pub price_per_unit: Option<Decimal>,
}

/// Purchase with item name, for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PurchaseDetails {
    pub id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub user_id: i32,
    pub username: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price_per_unit: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}
