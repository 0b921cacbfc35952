//! Business logic services

pub mod categories;
pub mod email;
pub mod inventory;
pub mod notifications;
pub mod purchases;
pub mod stats;
pub mod users;

use crate::config::{AuthConfig, EmailConfig};
use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub categories: categories::CategoriesService,
    pub inventory: inventory::InventoryService,
    pub purchases: purchases::PurchasesService,
    pub notifications: notifications::NotificationsService,
    pub stats: stats::StatsService,
    pub email: email::EmailService,
    /// Shared handle kept for readiness probes
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            categories: categories::CategoriesService::new(repository.clone()),
            inventory: inventory::InventoryService::new(repository.clone(), email.clone()),
            purchases: purchases::PurchasesService::new(repository.clone(), email.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            email,
            repository,
        }
    }
}
