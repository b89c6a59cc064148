//! Form requests: an authorization predicate plus field rules for a write endpoint.

mod store_team;

use freight_admin_core::{AppError, AppResult, AuthInfo, RuleSet};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

pub use store_team::{StoreTeamRequest, TeamInput};

/// A validated write request.
pub trait FormRequest {
    /// Typed payload produced once the rules pass.
    type Input: DeserializeOwned;

    /// Whether the principal may issue this request.
    fn authorize(&self, user: &AuthInfo) -> bool;

    /// Field name to constraints.
    fn rules(&self) -> RuleSet;

    /// Authorize, validate and decode `body`.
    ///
    /// # Errors
    /// - `AppError::PermissionDenied` when `authorize` is false
    /// - `AppError::InvalidArgument` when the body is not a JSON object
    /// - `AppError::Validation` with field-level errors when a rule fails
    fn validate(&self, user: &AuthInfo, body: Value) -> AppResult<Self::Input> {
        if !self.authorize(user) {
            return Err(AppError::PermissionDenied(
                "This action is unauthorized".to_string(),
            ));
        }

        let Value::Object(input) = body else {
            return Err(AppError::InvalidArgument(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let validated = self.rules().validate(&input).inspect_err(|errors| {
            debug!(user_id = %user.user_id, fields = errors.len(), "Request validation failed");
        })?;

        decode(validated)
    }
}

fn decode<T: DeserializeOwned>(validated: Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(validated))
        .map_err(|e| AppError::InvalidArgument(format!("Malformed request: {e}")))
}
