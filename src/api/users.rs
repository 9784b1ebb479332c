use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::api::parse_body;
use crate::database::UserStore;
use crate::models::{DeleteResponse, User};
use crate::services::user_service;
use crate::utils::{AppError, ErrorResponse};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "A list of users sorted by name, only name and age", body = [User]),
        (status = 500, description = "Users file unreadable or corrupt", body = ErrorResponse)
    )
)]
pub async fn list_users(store: web::Data<UserStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /users");

    let users = user_service::list_users(&store).await?;
    log::info!("✅ Listed {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{name}",
    tag = "Users",
    params(
        ("name" = String, Path, description = "The name of the user to retrieve")
    ),
    responses(
        (status = 200, description = "Details of the user", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Users file unreadable or corrupt", body = ErrorResponse)
    )
)]
pub async fn get_user(
    store: web::Data<UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    log::info!("🔍 GET /users/{}", name);

    let user = user_service::get_user(&store, &name).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User,
            headers(("Location" = String, description = "Path of the new user"))),
        (status = 400, description = "Bad Request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid Authorization header", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 409, description = "Conflict - User already exists", body = ErrorResponse),
        (status = 500, description = "Users file could not be written", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    req: HttpRequest,
    store: web::Data<UserStore>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    log::info!("➕ POST /users");

    let body = parse_body(&req, &body)?;
    let created = user_service::create_user(&store, body).await?;
    log::info!("✅ Created user at {}", created.location);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, created.location))
        .json(created.user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{name}",
    tag = "Users",
    params(
        ("name" = String, Path, description = "Name of the user(s) to delete")
    ),
    responses(
        (status = 200, description = "Users deleted", body = DeleteResponse),
        (status = 401, description = "Missing or invalid Authorization header", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Users file unreadable, corrupt or not writable", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    store: web::Data<UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    log::info!("🗑️  DELETE /users/{}", name);

    let removed = user_service::delete_user(&store, &name).await?;
    log::info!("✅ Deleted {} user(s) named {}", removed, name);
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Utenti eliminati : {}", removed),
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/{name}",
    tag = "Users",
    params(
        ("name" = String, Path, description = "Name of the user to update")
    ),
    request_body = User,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Stored user is missing name or age", body = ErrorResponse),
        (status = 401, description = "Missing or invalid Authorization header", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Users file unreadable, corrupt or not writable", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    req: HttpRequest,
    store: web::Data<UserStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    log::info!("✏️  PUT /users/{}", name);

    let body = parse_body(&req, &body)?;
    let updated = user_service::update_user(&store, &name, body).await?;
    Ok(HttpResponse::Ok().json(updated))
}
