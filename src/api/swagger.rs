use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User CRUD API",
        version = "1.0.0",
        description = "Create, read, update and delete users.\n\nErrors always carry a human-readable `message` field.",
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::welcome,
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserRecord,
            crate::models::UserPayload,
            crate::api::users::MessageResponse,
            crate::api::error::ErrorBody,
            crate::api::health::HealthResponse,
            crate::api::health::WelcomeResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User records stored in MongoDB."),
        (name = "Health", description = "Health check and request metrics."),
    )
)]
pub struct ApiDoc;
