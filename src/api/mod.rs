pub mod health;
pub mod swagger;
pub mod users;

use actix_web::{web, HttpMessage, HttpRequest};
use serde_json::{json, Value};

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

pub const MSG_INVALID_BODY: &str = "Bad Request: invalid JSON body.";

/// Request bodies are capped at 100 KiB.
pub fn payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(100 * 1024)
}

fn is_json(req: &HttpRequest) -> bool {
    match req.mime_type() {
        Ok(Some(mime)) => {
            mime.subtype().as_str() == "json"
                || mime.suffix().map_or(false, |s| s.as_str() == "json")
        }
        _ => false,
    }
}

/// Decode a request body. Bodies not declared as JSON, and empty ones,
/// decode to `{}`; declared JSON must be an object or an array.
pub fn parse_body(req: &HttpRequest, body: &[u8]) -> Result<Value, AppError> {
    if !is_json(req) || body.is_empty() {
        return Ok(json!({}));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(AppError::InvalidRequest(MSG_INVALID_BODY.to_string())),
        Err(e) => {
            log::warn!("⚠️  Rejected body for {} {}: {}", req.method(), req.path(), e);
            Err(AppError::InvalidRequest(MSG_INVALID_BODY.to_string()))
        }
    }
}

/// User routes under `/api`. Mutating methods require `api_token`.
pub fn configure(api_token: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api")
                .wrap(AuthMiddleware::new(&api_token))
                .app_data(payload_config())
                .route("/users", web::get().to(users::list_users))
                .route("/users", web::post().to(users::create_user))
                .route("/users/{name}", web::get().to(users::get_user))
                .route("/users/{name}", web::put().to(users::update_user))
                .route("/users/{name}", web::delete().to(users::delete_user)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, test};

    #[::core::prelude::v1::test]
    fn test_parse_body_json_content() {
        let req = test::TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_http_request();
        assert_eq!(parse_body(&req, br#"{"name":"Bob","age":3}"#).unwrap(), json!({"name": "Bob", "age": 3}));
        assert_eq!(parse_body(&req, b"[1]").unwrap(), json!([1]));
        assert_eq!(parse_body(&req, b"").unwrap(), json!({}));
        assert_eq!(
            parse_body(&req, b"{oops").unwrap_err(),
            AppError::InvalidRequest(MSG_INVALID_BODY.to_string())
        );
        assert_eq!(
            parse_body(&req, b"\"Bob\"").unwrap_err(),
            AppError::InvalidRequest(MSG_INVALID_BODY.to_string())
        );
    }

    #[::core::prelude::v1::test]
    fn test_parse_body_other_content_is_empty_object() {
        let plain = test::TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .to_http_request();
        assert_eq!(parse_body(&plain, br#"{"name":"Bob"}"#).unwrap(), json!({}));

        let missing = test::TestRequest::default().to_http_request();
        assert_eq!(parse_body(&missing, b"anything").unwrap(), json!({}));

        let suffixed = test::TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/merge-patch+json"))
            .to_http_request();
        assert_eq!(parse_body(&suffixed, br#"{"age":4}"#).unwrap(), json!({"age": 4}));
    }
}
