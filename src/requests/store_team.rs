use freight_admin_core::{AuthInfo, Rule, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FormRequest;

/// Permission required to create a team.
pub const CREATE_PERMISSION: &str = "create";

/// Request creating a team.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreTeamRequest;

/// Validated team payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_members: Option<u64>,
    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
}

impl FormRequest for StoreTeamRequest {
    type Input = TeamInput;

    fn authorize(&self, user: &AuthInfo) -> bool {
        user.can(CREATE_PERMISSION)
    }

    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
            .field("description", [Rule::Nullable, Rule::String])
            .field("max_members", [Rule::Nullable, Rule::Integer, Rule::Min(2)])
            .field("settings", [Rule::Nullable, Rule::Map])
    }
}

#[cfg(test)]
mod tests {
    use freight_admin_core::{AppError, UserRole};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn user(permissions: &[&str]) -> AuthInfo {
        AuthInfo {
            user_id: Uuid::new_v4(),
            email: "dispatch@freight.test".to_string(),
            name: "Dispatch".to_string(),
            role: UserRole::User,
            permissions: permissions.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn authorize_requires_create_permission() {
        assert!(StoreTeamRequest.authorize(&user(&["create"])));
        assert!(!StoreTeamRequest.authorize(&user(&["export"])));
    }

    #[test]
    fn unauthorized_principal_is_rejected_before_validation() {
        let result = StoreTeamRequest.validate(&user(&[]), json!({}));
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }

    #[test]
    fn accepts_name_only() {
        let input = StoreTeamRequest
            .validate(&user(&["create"]), json!({"name": "Night dispatch"}))
            .unwrap();
        assert_eq!(input.name, "Night dispatch");
        assert!(input.description.is_none());
        assert!(input.settings.is_none());
        assert!(input.max_members.is_none());
    }

    #[test]
    fn rejects_max_members_below_two() {
        for max_members in [json!(1), json!(0), json!(-4)] {
            let result = StoreTeamRequest.validate(
                &user(&["create"]),
                json!({"name": "Solo", "max_members": max_members}),
            );
            let Err(AppError::Validation(errors)) = result else {
                panic!("expected validation error");
            };
            assert_eq!(
                errors.messages("max_members"),
                ["The max members field must be at least 2."]
            );
        }
    }

    #[test]
    fn rejects_long_name_and_non_map_settings() {
        let result = StoreTeamRequest.validate(
            &user(&["create"]),
            json!({"name": "x".repeat(256), "settings": ["a"]}),
        );
        let Err(AppError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.has("name"));
        assert!(errors.has("settings"));
    }

    #[test]
    fn keeps_settings_and_description() {
        let input = StoreTeamRequest
            .validate(
                &user(&["create"]),
                json!({
                    "name": "Rail desk",
                    "description": "Intermodal bookings",
                    "max_members": 8,
                    "settings": {"notify": true},
                }),
            )
            .unwrap();
        assert_eq!(input.max_members, Some(8));
        assert_eq!(input.description.as_deref(), Some("Intermodal bookings"));
        assert_eq!(input.settings.unwrap()["notify"], json!(true));
    }

    #[test]
    fn non_object_body_is_invalid_argument() {
        let result = StoreTeamRequest.validate(&user(&["create"]), json!("team"));
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }
}
