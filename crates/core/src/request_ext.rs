//! Axum extractors for the authenticated principal.
//!
//! The auth middleware injects `AuthInfo` into request extensions; handlers
//! pull it back out with these extractors:
//!
//! ```ignore
//! async fn handler(Auth(auth): Auth) -> AppResult<Json<Value>> {
//!     auth.require("export")?;
//!     // ...
//! }
//! ```

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;

use crate::AppError;
use crate::jwt::AuthInfo;

/// Required authentication. Rejects with 401 when no principal is present.
#[derive(Debug, Clone)]
pub struct Auth(pub AuthInfo);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthInfo>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Auth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthInfo>().cloned().map(Self))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::jwt::UserRole;

    fn parts_with(auth: Option<AuthInfo>) -> Parts {
        let mut req = http::Request::new(());
        if let Some(auth) = auth {
            req.extensions_mut().insert(auth);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn extracts_injected_principal() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with(Some(AuthInfo {
            user_id,
            email: "ops@freight.test".to_string(),
            name: "Ops".to_string(),
            role: UserRole::User,
            permissions: vec![],
        }));
        let Auth(auth) = <Auth as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[tokio::test]
    async fn missing_principal_is_unauthenticated() {
        let mut parts = parts_with(None);
        let result = <Auth as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));

        let optional =
            <Auth as OptionalFromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        assert!(optional.unwrap().is_none());
    }
}
