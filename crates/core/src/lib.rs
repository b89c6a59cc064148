//! Core library with shared types for the freight admin panel.
//!
//! - Error type with automatic HTTP response conversion
//! - JWT validation and the authenticated principal
//! - Axum extractors for the principal
//! - Declarative field validation

pub mod error;
pub mod jwt;
pub mod request_ext;
pub mod validation;

pub use error::{AppError, AppResult, ResultExt};
pub use jwt::{AuthInfo, JwtError, JwtSubject, JwtValidator, UserRole};
pub use request_ext::Auth;
pub use validation::{Rule, RuleSet, ValidationErrors};
