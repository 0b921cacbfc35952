//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, categories, health, inventory, notifications, purchases, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toolshed API",
        version = "1.0.0",
        description = "Workshop inventory tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::update_role,
        users::delete_user,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Inventory
        inventory::list_items,
        inventory::get_item,
        inventory::create_item,
        inventory::update_item,
        inventory::delete_item,
        inventory::borrow_item,
        inventory::return_item,
        inventory::item_history,
        inventory::borrowed_items,
        // Purchases
        purchases::create_purchase,
        purchases::list_purchases,
        purchases::my_purchases,
        // Notification templates
        notifications::list_templates,
        notifications::get_template,
        notifications::update_template,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::UpdateRole,
            // Categories
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Inventory
            crate::models::item::InventoryItem,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::borrowing::BorrowingHistory,
            crate::models::borrowing::BorrowingHistoryDetails,
            inventory::BorrowResponse,
            inventory::ReturnResponse,
            // Purchases
            crate::models::purchase::Purchase,
            crate::models::purchase::PurchaseDetails,
            crate::models::purchase::CreatePurchase,
            purchases::PurchaseResponse,
            // Notification templates
            crate::models::notification::NotificationTemplate,
            crate::models::notification::TemplateType,
            crate::models::notification::UpdateTemplate,
            // Stats
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "categories", description = "Category management"),
        (name = "inventory", description = "Inventory and borrowing"),
        (name = "purchases", description = "Purchases"),
        (name = "notifications", description = "Notification templates"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
