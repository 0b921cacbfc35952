//! Borrowing history ledger model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row per borrow event. The latest unreturned row per item mirrors the
/// item's own availability state; at most one such row exists at any time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowingHistory {
    pub id: i32,
    pub item_id: i32,
    pub borrower_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

/// History entry with item and borrower names, for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BorrowingHistoryDetails {
    pub id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub borrower_id: i32,
    pub borrower_username: String,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub is_returned: bool,
}
