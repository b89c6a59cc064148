//! Route table: health checks, admin pages and actions, the team endpoint.

use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::Serialize;

use crate::handlers::{actions, pages, teams};
use crate::startup::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    store: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            message: Some(message.into()),
        }
    }
}

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build every application route with the given state.
pub fn rest_routes(state: AppState) -> Router {
    let prefix = state.panel.prefix().to_string();

    Router::new()
        .route("/", get(|| async { "freight-admin" }))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .route(&prefix, get(pages::dashboard))
        .route(
            &format!("{prefix}/{{resource}}"),
            get(pages::list_page).post(actions::create_record),
        )
        .route(
            &format!("{prefix}/{{resource}}/create"),
            get(pages::create_page),
        )
        .route(
            &format!("{prefix}/{{resource}}/export"),
            get(actions::export_records),
        )
        .route(
            &format!("{prefix}/{{resource}}/{{id}}"),
            axum::routing::put(actions::update_record).delete(actions::delete_record),
        )
        .route(
            &format!("{prefix}/{{resource}}/{{id}}/edit"),
            get(pages::edit_page),
        )
        .route("/api/teams", post(teams::store_team))
        .with_state(state)
}

/// Prometheus scrape endpoint.
#[cfg(feature = "prometheus")]
pub fn metrics_routes(handle: freight_admin_telemetry::PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

async fn readiness_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_check = if state.store.health_check().await {
        CheckResult::healthy()
    } else {
        CheckResult::unhealthy("Record store unreachable")
    };

    Json(HealthResponse {
        status: store_check.status,
        version: VERSION,
        checks: Some(HealthChecks { store: store_check }),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use freight_admin_core::{JwtSubject, JwtValidator};
    use freight_admin_db::{MemoryStore, RecordStore};
    use http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::tests::test_config;
    use crate::panel::Panel;
    use crate::startup::{AppState, app_router};

    struct Operator {
        id: Uuid,
        role: &'static str,
        permissions: Vec<String>,
    }

    impl JwtSubject for Operator {
        fn user_id(&self) -> Uuid {
            self.id
        }
        fn email(&self) -> &str {
            "ops@freight.test"
        }
        fn name(&self) -> &str {
            "Ops"
        }
        fn role(&self) -> &str {
            self.role
        }
        fn permissions(&self) -> &[String] {
            &self.permissions
        }
    }

    struct Harness {
        app: axum::Router,
        store: Arc<MemoryStore>,
        validator: JwtValidator,
    }

    impl Harness {
        fn new() -> Self {
            let config = test_config();
            let store = Arc::new(MemoryStore::new());
            let state = AppState::new(store.clone(), Panel::new(&config.admin_prefix), 2);
            Self {
                app: app_router(&config, state, axum::Router::new()),
                store,
                validator: JwtValidator::new(&config.jwt_secret_key),
            }
        }

        fn token(&self, role: &'static str, permissions: &[&str]) -> String {
            let operator = Operator {
                id: Uuid::new_v4(),
                role,
                permissions: permissions.iter().map(ToString::to_string).collect(),
            };
            self.validator.generate_access_token(&operator, 5).unwrap()
        }

        fn admin(&self) -> String {
            self.token("administrator", &[])
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, http::HeaderMap, Vec<u8>) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, bytes.to_vec())
        }

        async fn json(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let (status, _, bytes) = self.send(method, uri, token, body).await;
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    }

    #[tokio::test]
    async fn health_routes_are_public() {
        let harness = Harness::new();
        for uri in ["/health", "/health/live"] {
            let (status, _, body) = harness.send(Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, b"OK");
        }

        let (status, body) = harness.json(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["store"]["status"], "healthy");
    }

    #[tokio::test]
    async fn admin_requires_bearer_token() {
        let harness = Harness::new();
        let (status, headers, _) = harness.send(Method::GET, "/admin", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

        let (status, _) = harness
            .json(Method::GET, "/admin", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let harness = Harness::new();
        let (_, headers, _) = harness.send(Method::GET, "/health", None, None).await;
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn dashboard_lists_every_resource() {
        let harness = Harness::new();
        let token = harness.token("user", &[]);
        let (status, body) = harness.json(Method::GET, "/admin", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let navigation = body["navigation"].as_array().unwrap();
        assert_eq!(navigation.len(), 11);
        assert!(
            navigation
                .iter()
                .any(|item| item["url"] == "/admin/shipments")
        );
    }

    #[tokio::test]
    async fn list_page_exposes_export_then_create() {
        let harness = Harness::new();
        let token = harness.admin();
        let (status, body) = harness
            .json(Method::GET, "/admin/tenders", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "list");

        let actions = body["header_actions"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0]["name"], "export");
        assert_eq!(actions[0]["exporter"], "TenderExporter");
        assert_eq!(actions[1]["name"], "create");

        let (_, body) = harness
            .json(Method::GET, "/admin/warehouses", Some(&token), None)
            .await;
        let actions = body["header_actions"].as_array().unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0]["name"], "create");
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let harness = Harness::new();
        let token = harness.admin();
        let (status, _) = harness
            .json(Method::GET, "/admin/spaceships", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_edit_and_delete_a_record() {
        let harness = Harness::new();
        let token = harness.admin();

        let (status, body) = harness
            .json(Method::GET, "/admin/warehouses/create", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submit"]["method"], "POST");

        let (status, invalid) = harness
            .json(Method::POST, "/admin/warehouses", Some(&token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(invalid["errors"]["name"].is_array());

        let (status, created) = harness
            .json(
                Method::POST,
                "/admin/warehouses",
                Some(&token),
                Some(json!({ "name": "Rotterdam North", "city": "Rotterdam", "country_code": "NL" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, edit) = harness
            .json(
                Method::GET,
                &format!("/admin/warehouses/{id}/edit"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edit["kind"], "edit");
        assert_eq!(edit["header_actions"][0]["name"], "delete");
        assert_eq!(edit["record"]["data"]["name"], "Rotterdam North");

        let (status, _, _) = harness
            .send(
                Method::DELETE,
                &format!("/admin/warehouses/{id}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let id = Uuid::parse_str(&id).unwrap();
        assert!(harness.store.get("warehouses", id).await.is_err());
    }

    #[tokio::test]
    async fn actions_require_their_permission() {
        let harness = Harness::new();
        let reader = harness.token("user", &["export"]);

        let (status, _) = harness
            .json(
                Method::POST,
                "/admin/warehouses",
                Some(&reader),
                Some(json!({ "name": "Depot", "city": "Gent", "country_code": "BE" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = harness
            .send(Method::GET, "/admin/tenders/export", Some(&reader), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn save_checks_permission_validates_and_merges() {
        let harness = Harness::new();
        let mut data = serde_json::Map::new();
        data.insert("name".to_string(), json!("Antwerp Dock"));
        data.insert("city".to_string(), json!("Antwerp"));
        data.insert("country_code".to_string(), json!("BE"));
        data.insert("capacity_m2".to_string(), json!(12000));
        let record = harness.store.create("warehouses", data).await.unwrap();
        let uri = format!("/admin/warehouses/{}", record.id);
        let renamed = json!({ "name": "Antwerp South", "city": "Antwerp", "country_code": "BE" });

        let creator = harness.token("user", &["create"]);
        let (status, _) = harness
            .json(Method::PUT, &uri, Some(&creator), Some(renamed.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let token = harness.admin();
        let (status, invalid) = harness
            .json(Method::PUT, &uri, Some(&token), Some(json!({ "name": "" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(invalid["errors"]["name"].is_array());

        let (status, saved) = harness
            .json(Method::PUT, &uri, Some(&token), Some(renamed))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["data"]["name"], "Antwerp South");
        assert_eq!(saved["data"]["capacity_m2"], 12000);

        let stored = harness.store.get("warehouses", record.id).await.unwrap();
        assert_eq!(stored.data["name"], json!("Antwerp South"));
    }

    #[tokio::test]
    async fn delete_requires_delete_permission() {
        let harness = Harness::new();
        let mut data = serde_json::Map::new();
        data.insert("name".to_string(), json!("Gent Hub"));
        let record = harness.store.create("warehouses", data).await.unwrap();

        let editor = harness.token("user", &["create", "update"]);
        let (status, _, _) = harness
            .send(
                Method::DELETE,
                &format!("/admin/warehouses/{}", record.id),
                Some(&editor),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(harness.store.get("warehouses", record.id).await.is_ok());
    }

    #[tokio::test]
    async fn list_page_filters_and_paginates() {
        let harness = Harness::new();
        for title in ["Lane Hamburg", "Lane Lyon", "Bulk Oslo"] {
            let mut data = serde_json::Map::new();
            data.insert("title".to_string(), json!(title));
            harness.store.create("tenders", data).await.unwrap();
        }

        let token = harness.admin();
        let (status, body) = harness
            .json(
                Method::GET,
                "/admin/tenders?search=lane&per_page=1",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["per_page"], 1);
        assert_eq!(body["pagination"]["last_page"], 2);

        let (_, body) = harness
            .json(
                Method::GET,
                "/admin/tenders?search=lane&per_page=1&page=2",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn export_without_exporter_is_not_found() {
        let harness = Harness::new();
        let token = harness.admin();
        let (status, _) = harness
            .json(Method::GET, "/admin/warehouses/export", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_writes_capped_csv_attachment() {
        let harness = Harness::new();
        let token = harness.admin();
        for title in ["Lane A", "Lane B", "Lane C"] {
            let mut data = serde_json::Map::new();
            data.insert("title".to_string(), json!(title));
            harness.store.create("tenders", data).await.unwrap();
        }

        let (status, headers, body) = harness
            .send(Method::GET, "/admin/tenders/export", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = headers
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"tenders-"));
        assert!(disposition.ends_with(".csv\""));

        let csv = String::from_utf8(body).unwrap();
        // header row plus the two-row cap
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn store_team_validates_and_creates() {
        let harness = Harness::new();
        let creator = harness.token("user", &["create"]);

        let (status, body) = harness
            .json(
                Method::POST,
                "/api/teams",
                Some(&creator),
                Some(json!({ "name": "", "max_members": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "The given data was invalid");
        assert!(body["errors"]["name"].is_array());
        assert!(body["errors"]["max_members"].is_array());

        let (status, body) = harness
            .json(
                Method::POST,
                "/api/teams",
                Some(&creator),
                Some(json!({ "name": "Night dispatch", "max_members": 4 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resource"], "teams");
        assert_eq!(body["data"]["name"], "Night dispatch");
        assert_eq!(body["data"]["max_members"], 4);
    }

    #[tokio::test]
    async fn store_team_rejects_missing_permission() {
        let harness = Harness::new();
        let viewer = harness.token("user", &["export"]);
        let (status, _) = harness
            .json(
                Method::POST,
                "/api/teams",
                Some(&viewer),
                Some(json!({ "name": "Night dispatch" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = harness
            .json(
                Method::POST,
                "/api/teams",
                None,
                Some(json!({ "name": "Night dispatch" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
