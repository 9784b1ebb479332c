use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::database::UserStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the users file loads, `degraded` otherwise
    pub status: String,
    pub users_file: String,
    /// Records currently in the users file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub version: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Users file is readable", body = HealthResponse),
        (status = 503, description = "Users file is missing or corrupt", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<UserStore>) -> HttpResponse {
    let (status, users, error) = match store.load().await {
        Ok(users) => ("healthy", Some(users.len()), None),
        Err(e) => {
            log::warn!("⚠️  Health check: {}", e);
            ("degraded", None, Some(e.to_string()))
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        users_file: store.path().display().to_string(),
        users,
        error,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if body.error.is_none() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use tempfile::TempDir;

    macro_rules! init_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($store))
                    .route("/health", web::get().to(health_check)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_counts_users() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"[{"name":"Bob","age":30},{"name":"Ann","age":3}]"#).unwrap();
        let app = init_app!(UserStore::new(path, false));

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: HealthResponse = test::read_body_json(res).await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.users, Some(2));
        assert!(body.error.is_none());
        assert!(body.users_file.ends_with("users.json"));
        assert!(body.timestamp > 0);
    }

    #[actix_web::test]
    async fn test_health_degraded_when_file_missing_or_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let app = init_app!(UserStore::new(path.clone(), false));

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: HealthResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "degraded");
        assert!(body.users.is_none());
        assert!(body.error.unwrap().starts_with("failed to read users file"));

        std::fs::write(&path, "{not json").unwrap();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "degraded");
        assert!(body.error.unwrap().starts_with("failed to parse users file"));
    }
}
