//! `x-request-id` propagation.
//!
//! Accepts a caller-supplied id when it is short and visible ASCII, otherwise
//! generates one. The id is recorded on the request span and echoed on the
//! response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderName, HeaderValue, Request, Response};
use tower::{Layer, Service};
use tracing::Span;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LENGTH: usize = 64;

#[derive(Debug, PartialEq, Eq)]
struct RequestId(Arc<str>);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept a caller-supplied id if it is usable as a header and log field.
    fn accept(raw: &str) -> Option<Self> {
        let usable = !raw.is_empty()
            && raw.len() <= MAX_REQUEST_ID_LENGTH
            && raw.bytes().all(|b| b.is_ascii_graphic());
        usable.then(|| Self(raw.into()))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(RequestId::accept)
            .unwrap_or_else(RequestId::generate);

        Span::current().record("request_id", request_id.as_str());

        let mut inner = super::take_ready(&mut self.inner);
        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                response
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER.clone(), value);
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn caller_ids_are_filtered() {
        assert_eq!(
            RequestId::accept("trace-42").map(|id| id.to_string()),
            Some("trace-42".to_string())
        );
        assert!(RequestId::accept("").is_none());
        assert!(RequestId::accept("has space").is_none());
        assert!(RequestId::accept(&"x".repeat(65)).is_none());
    }
}
