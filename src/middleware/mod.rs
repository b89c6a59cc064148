//! Tower middleware applied to every route.
//!
//! Layers run top-to-bottom on the request (see `startup::app_router`):
//! 1. TraceLayer - request span
//! 2. RequestIdLayer - extract or generate `x-request-id`
//! 3. TimeoutLayer / GlobalConcurrencyLimitLayer - backpressure
//! 4. CorsLayer - preflight before auth
//! 5. AuthLayer - bearer token validation (skips public routes)
//! 6. MetricsLayer - per-route request count and latency

pub mod auth;
pub mod metrics;
pub mod request_id;

pub use auth::AuthLayer;
pub use metrics::MetricsLayer;
pub use request_id::RequestIdLayer;

/// Hand the service that `poll_ready` was called on to the request and leave
/// a fresh clone in its place.
fn take_ready<S: Clone>(inner: &mut S) -> S {
    let clone = inner.clone();
    std::mem::replace(inner, clone)
}
