use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::utils::AppError;

pub const MSG_MISSING_HEADER: &str = "Unauthorized: Missing or invalid Authorization header.";
pub const MSG_INVALID_TOKEN: &str = "Forbidden: Invalid token.";

/// Static shared-secret check for mutating requests (POST, PUT, DELETE).
/// Every other method passes straight through.
pub struct AuthMiddleware {
    token: Rc<str>,
}

impl AuthMiddleware {
    pub fn new(token: &str) -> Self {
        Self { token: Rc::from(token) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            token: self.token.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    token: Rc<str>,
}

fn requires_auth(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::DELETE
}

/// Checks an `Authorization` header value against the expected token.
/// The token is the second space-separated segment after `Bearer `.
pub fn check_bearer(header_value: Option<&str>, expected: &str) -> Result<(), AppError> {
    let header_str = match header_value {
        Some(value) if value.starts_with("Bearer ") => value,
        _ => return Err(AppError::Unauthorized(MSG_MISSING_HEADER.to_string())),
    };

    let token = header_str.split(' ').nth(1).unwrap_or("");
    if token != expected {
        return Err(AppError::Forbidden(MSG_INVALID_TOKEN.to_string()));
    }

    Ok(())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !requires_auth(req.method()) {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        // Non-UTF8 header values count as missing
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match check_bearer(header_value, &self.token) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                // Answer here so outer middleware (CORS, logger) still sees a response
                let res = req.into_response(e.error_response()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
