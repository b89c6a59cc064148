//! Bearer-token authentication middleware.
//!
//! Validates the JWT on every non-public route and injects `AuthInfo` into
//! request extensions for the `Auth` extractor.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use freight_admin_core::{JwtError, JwtValidator};
use http::{Request, Response, StatusCode};
use phf::phf_set;
use tower::{Layer, Service};
use tracing::{Span, debug};

/// Infrastructure routes that bypass authentication.
static PUBLIC_ROUTES: phf::Set<&'static str> = phf_set! {
    "/",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
};

#[derive(Clone)]
pub struct AuthLayer {
    validator: JwtValidator,
}

impl AuthLayer {
    #[must_use]
    pub const fn new(validator: JwtValidator) -> Self {
        Self { validator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            validator: self.validator.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    validator: JwtValidator,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // CORS preflight carries no credentials
        if req.method() == http::Method::OPTIONS || PUBLIC_ROUTES.contains(req.uri().path()) {
            let mut inner = super::take_ready(&mut self.inner);
            return Box::pin(async move { inner.call(req).await });
        }

        match self.authenticate(&req) {
            Ok(auth_info) => {
                Span::current().record("user_id", auth_info.user_id.to_string());
                debug!(user_id = %auth_info.user_id, role = %auth_info.role, "Authenticated");
                req.extensions_mut().insert(auth_info);
                let mut inner = super::take_ready(&mut self.inner);
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                debug!(path = req.uri().path(), error = %err, "Authentication failed");
                Box::pin(async move { Ok(unauthorized(&err)) })
            }
        }
    }
}

impl<S> AuthMiddleware<S> {
    const BEARER_PREFIX: &str = "Bearer ";

    fn authenticate<T>(
        &self,
        req: &Request<T>,
    ) -> Result<freight_admin_core::AuthInfo, JwtError> {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(JwtError::MissingHeader)?;

        let token = header
            .strip_prefix(Self::BEARER_PREFIX)
            .or_else(|| header.strip_prefix("bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(JwtError::InvalidFormat)?;

        self.validator.validate(token)
    }
}

fn unauthorized(err: &JwtError) -> Response<Body> {
    let mut response = Response::new(Body::from(
        serde_json::json!({ "error": err.to_string() }).to_string(),
    ));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        http::header::WWW_AUTHENTICATE,
        http::HeaderValue::from_static("Bearer"),
    );
    response
}
