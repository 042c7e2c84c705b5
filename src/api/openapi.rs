//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{activities, audit, auth, catalogs, consumables, equipment, health, reservations, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventra API",
        version = "1.0.0",
        description = "IT Asset Inventory & Scheduling REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Inventra Team", email = "dev@inventra.cl")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users & profiles
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::get_my_profile,
        users::update_my_profile,
        users::upload_profile_photo,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::attach_invoice,
        equipment::bulk_create_equipment,
        // Consumables
        consumables::list_consumables,
        consumables::get_consumable,
        consumables::create_consumable,
        consumables::update_consumable,
        consumables::delete_consumable,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        // Catalogs
        catalogs::list_types,
        catalogs::create_type,
        catalogs::list_statuses,
        catalogs::create_status,
        catalogs::list_suppliers,
        catalogs::create_supplier,
        catalogs::list_branches,
        catalogs::create_branch,
        // Activities & tasks
        activities::list_activities,
        activities::list_notifications,
        activities::list_tasks,
        activities::get_task,
        activities::create_task,
        activities::update_task,
        activities::complete_task,
        activities::delete_task,
        // Audit
        audit::list_audit,
        // Dashboard
        stats::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Profile,
            crate::models::user::UserWithProfile,
            crate::models::user::ProfileData,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateOwnProfile,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::EquipmentRefs,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            equipment::EquipmentPage,
            // Consumables
            crate::models::consumable::Consumable,
            crate::models::consumable::CreateConsumable,
            crate::models::consumable::UpdateConsumable,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            // Catalogs
            crate::models::catalog::EquipmentType,
            crate::models::catalog::Status,
            crate::models::catalog::Supplier,
            crate::models::catalog::Branch,
            crate::models::catalog::CreateCatalogEntry,
            crate::models::catalog::CreateBranch,
            // Activities
            crate::models::activity::Activity,
            crate::models::activity::ActivityKind,
            crate::models::activity::ActivityLabel,
            crate::models::activity::CreateTask,
            crate::models::activity::UpdateTask,
            // Audit
            crate::models::audit::AuditRecord,
            crate::models::audit::AuditRecordDetails,
            // Dashboard
            stats::DashboardResponse,
            stats::DashboardKpis,
            stats::EquipmentUsage,
            stats::StatEntry,
            stats::YearSupplierCount,
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
        (name = "profile", description = "Own profile"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "consumables", description = "Consumable stock"),
        (name = "reservations", description = "Equipment reservations"),
        (name = "catalogs", description = "Catalog reference tables"),
        (name = "activities", description = "Activity and notification feeds"),
        (name = "tasks", description = "Task management"),
        (name = "audit", description = "Audit trail"),
        (name = "dashboard", description = "Dashboard aggregation")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
