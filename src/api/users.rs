use crate::{
    api::error::{ApiError, ErrorBody},
    models::{UserFields, UserPayload, UserRecord},
    services::UserStore,
};
use actix_web::{delete, get, post, put, web, Either, HttpResponse};
use serde::{Deserialize, Serialize};

/// Body de POST/PUT: JSON ou formulário HTML (`application/x-www-form-urlencoded`).
pub type UserBody = Either<web::Json<UserPayload>, web::Form<UserPayload>>;

fn into_fields(body: UserBody) -> UserFields {
    let payload = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    UserFields::from(payload)
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/users - Lista todos os usuários (mais recentes primeiro)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserRecord>),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    )
)]
#[get("")]
pub async fn list_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, ApiError> {
    let users = store.list().await?;
    log::debug!("📋 GET /users - {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id} - Busca usuário específico
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserRecord),
        (status = 404, description = "No user with this id", body = ErrorBody)
    )
)]
#[get("/{id}")]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = store.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/users - Cria novo usuário
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserRecord),
        (status = 400, description = "Missing name or email", body = ErrorBody)
    )
)]
#[post("")]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: UserBody,
) -> Result<HttpResponse, ApiError> {
    let fields = into_fields(body);

    log::info!("📝 POST /users - Creating {} <{}>", fields.name, fields.email);

    match store.create(fields).await {
        Ok(user) => {
            log::info!("✅ User created: {}", user.id);
            Ok(HttpResponse::Created().json(user))
        }
        Err(e) => {
            log::warn!("⚠️ Failed to create user: {}", e);
            Err(e.into())
        }
    }
}

/// PUT /api/users/{id} - Substitui os campos do usuário
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserRecord),
        (status = 400, description = "Missing name or email", body = ErrorBody),
        (status = 404, description = "No user with this id", body = ErrorBody)
    )
)]
#[put("/{id}")]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: UserBody,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    log::info!("🔧 PUT /users/{} - Updating", user_id);

    match store.update(&user_id, into_fields(body)).await {
        Ok(user) => {
            log::info!("✅ User updated: {}", user.id);
            Ok(HttpResponse::Ok().json(user))
        }
        Err(e) => {
            log::warn!("⚠️ Failed to update user {}: {}", user_id, e);
            Err(e.into())
        }
    }
}

/// DELETE /api/users/{id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "No user with this id", body = ErrorBody)
    )
)]
#[delete("/{id}")]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    log::info!("🗑️  DELETE /users/{} - Removing", user_id);

    store.delete(&user_id).await.map_err(|e| {
        log::warn!("⚠️ Failed to delete user {}: {}", user_id, e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// Rotas de `/api/users`, registradas no `App` do servidor e nos testes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .app_data(
                web::JsonConfig::default().error_handler(crate::api::error::json_error_handler),
            )
            .app_data(
                web::FormConfig::default().error_handler(crate::api::error::form_error_handler),
            )
            .service(list_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    );
}
