use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::Server;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD API over a single collection of users stored in a JSON file.\n\n**Authentication:** POST, PUT and DELETE require a static Bearer token."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::delete_user,
        crate::api::users::update_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::DeleteResponse,
            crate::utils::ErrorResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Create, read, update and delete users."),
        (name = "Health", description = "Users file availability."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Static shared API token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI document, advertising `public_url` as the server when given.
pub fn openapi(public_url: Option<&str>) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if let Some(url) = public_url {
        doc.servers = Some(vec![Server::new(url)]);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_document_lists_user_routes() {
        let doc: Value = serde_json::to_value(openapi(None)).unwrap();

        let users = &doc["paths"]["/api/users"];
        assert!(users["get"].is_object());
        assert!(users["post"].is_object());

        let by_name = &doc["paths"]["/api/users/{name}"];
        for method in ["get", "put", "delete"] {
            assert!(by_name[method].is_object(), "missing {}", method);
        }
        assert!(doc["paths"]["/health"]["get"].is_object());
        assert!(doc["servers"].is_null());
    }

    #[test]
    fn test_only_mutations_require_bearer() {
        let doc: Value = serde_json::to_value(openapi(None)).unwrap();

        assert_eq!(doc["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
        assert!(doc["paths"]["/api/users"]["post"]["security"].is_array());
        assert!(doc["paths"]["/api/users/{name}"]["put"]["security"].is_array());
        assert!(doc["paths"]["/api/users/{name}"]["delete"]["security"].is_array());
        assert!(doc["paths"]["/api/users"]["get"]["security"].is_null());
    }

    #[test]
    fn test_public_url_becomes_server() {
        let doc: Value = serde_json::to_value(openapi(Some("https://api.example.com/api"))).unwrap();
        assert_eq!(doc["servers"][0]["url"], "https://api.example.com/api");
    }
}
