//! Repository layer for database operations
//!
//! Sole writer of all entities. Domain methods live in `impl Repository`
//! blocks, one file per entity.

mod categories;
mod items;
mod notifications;
mod purchases;
mod stats;
mod users;

pub use stats::StatsCounts;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
