/// Role-gated JWT authentication middleware for Bearer tokens
/// Validates the token, checks its role against the route's allowed set, and
/// adds the identity claim to request extensions
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{IdentityClaim, Role};
use crate::security::TokenIssuer;

/// Identity of the caller, available to handlers behind `RequireRole`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub IdentityClaim);

/// Decide whether a request carrying `auth_header` may proceed.
///
/// Missing, malformed, badly signed, or expired tokens are `Unauthorized`;
/// a valid token whose role is not in `allowed` is `Forbidden`.
pub fn authorize(
    auth_header: Option<&str>,
    issuer: &TokenIssuer,
    allowed: &[Role],
) -> crate::error::Result<IdentityClaim> {
    let auth_header = auth_header
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid Authorization scheme, expected Bearer".to_string())
    })?;

    let claims = issuer.validate(token).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))?;

    if !allowed.contains(&claims.role) {
        return Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to access this resource",
            claims.role
        )));
    }

    Ok(IdentityClaim {
        id,
        email: claims.username,
        role: claims.role,
        name: claims.name,
    })
}

fn authorize_request(
    req: &ServiceRequest,
    allowed: &[Role],
) -> crate::error::Result<IdentityClaim> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|h| h.to_str())
        .transpose()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::Internal("Token issuer not configured".to_string()))?;

    authorize(auth_header, issuer, allowed)
}

/// Middleware factory guarding a route with an allowed-role set.
pub struct RequireRole {
    allowed: Rc<Vec<Role>>,
}

impl RequireRole {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Rc::new(allowed.into_iter().collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            match authorize_request(&req, &allowed) {
                Ok(claim) => {
                    tracing::debug!(user_id = %claim.id, role = %claim.role, "request authorized");
                    req.extensions_mut().insert(AuthenticatedUser(claim));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                // Rejections short-circuit with the error body; the wrapped service never runs
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "request rejected");
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(AppError::Unauthorized(
                "Identity missing in request extensions".to_string(),
            )
            .into())),
        }
    }
}
