//! Statistics service

use crate::{api::stats::StatsResponse, error::AppResult, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Workshop statistics, recomputed on every call (small data volumes,
    /// not a hot path)
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let counts = self.repository.stats_counts().await?;

        Ok(StatsResponse {
            total_items: counts.total_items,
            borrowed_items: counts.borrowed_items,
            available_items: counts.total_items - counts.borrowed_items,
            total_users: counts.total_users,
            total_categories: counts.total_categories,
        })
    }
}
