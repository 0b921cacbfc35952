//! Toolshed Server
//!
//! A REST JSON API for a shared workshop: members browse the tool
//! inventory, borrow and return items, and buy consumables; admins
//! manage the catalog, categories, users, and notification templates.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
