//! Statistics queries on Repository

use super::Repository;
use crate::error::AppResult;

/// Raw aggregate counts, recomputed on every call
#[derive(Debug, Clone, Copy)]
pub struct StatsCounts {
    pub total_items: i64,
    pub borrowed_items: i64,
    pub total_users: i64,
    pub total_categories: i64,
}

impl Repository {
    /// Count totals for the stats endpoint
    pub async fn stats_counts(&self) -> AppResult<StatsCounts> {
        let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        let borrowed_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE is_available = FALSE")
                .fetch_one(&self.pool)
                .await?;

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(StatsCounts {
            total_items,
            borrowed_items,
            total_users,
            total_categories,
        })
    }
}
