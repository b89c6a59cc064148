//! Page endpoints: navigation, list table, create form and edit form.

use axum::Json;
use axum::extract::{Path, Query, State};
use freight_admin_core::{AppResult, Auth, Rule};
use freight_admin_db::{ListQuery, Record};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::{authorize_action, resolve};
use crate::panel::{ActionView, Field, NavigationItem, PageKind, Resource};
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    title: &'static str,
    user: String,
    navigation: Vec<NavigationItem>,
}

/// Form field as rendered on create and edit pages.
#[derive(Debug, Serialize)]
pub struct FieldView {
    name: &'static str,
    label: &'static str,
    required: bool,
    rules: String,
}

impl From<&Field> for FieldView {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name,
            label: field.label,
            required: field.is_required(),
            rules: field
                .rules
                .iter()
                .map(Rule::expression)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Column {
    name: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    page: u32,
    per_page: u32,
    total: u64,
    last_page: u32,
}

#[derive(Debug, Serialize)]
pub struct ListPageView {
    resource: &'static str,
    kind: PageKind,
    title: String,
    header_actions: Vec<ActionView>,
    columns: Vec<Column>,
    records: Vec<Record>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct FormPageView {
    resource: &'static str,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<PageKind>,
    header_actions: Vec<ActionView>,
    fields: Vec<FieldView>,
    submit: ActionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<Record>,
}

fn fields(resource: Resource) -> Vec<FieldView> {
    resource.fields().iter().map(FieldView::from).collect()
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn dashboard(State(state): State<AppState>, Auth(auth): Auth) -> Json<Dashboard> {
    Json(Dashboard {
        title: "Dashboard",
        user: auth.name,
        navigation: state.panel.navigation(),
    })
}

#[instrument(skip(state, auth, params), fields(user_id = %auth.user_id))]
pub async fn list_page(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListPageView>> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let prefix = state.panel.prefix();
    let query = ListQuery::new(params.page, params.per_page, params.search);
    let page = state.store.list(resource.slug(), &query).await?;

    Ok(Json(ListPageView {
        resource: resource.slug(),
        kind: pages.list.kind(),
        title: pages.list.title(),
        header_actions: pages
            .list
            .header_actions()
            .iter()
            .map(|a| a.view(prefix, resource, None))
            .collect(),
        columns: resource
            .fields()
            .iter()
            .map(|f| Column {
                name: f.name,
                label: f.label,
            })
            .collect(),
        pagination: Pagination {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page(),
        },
        records: page.records,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn create_page(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path(slug): Path<String>,
) -> AppResult<Json<FormPageView>> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let create = authorize_action(&pages.list, "create", &auth)?;

    Ok(Json(FormPageView {
        resource: resource.slug(),
        title: format!("Create {}", resource.label()),
        kind: None,
        header_actions: Vec::new(),
        fields: fields(resource),
        submit: create.view(state.panel.prefix(), resource, None),
        record: None,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn edit_page(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path((slug, id)): Path<(String, Uuid)>,
) -> AppResult<Json<FormPageView>> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let record = state.store.get(resource.slug(), id).await?;
    let prefix = state.panel.prefix();

    let title = record
        .data
        .get(resource.title_field())
        .and_then(|v| v.as_str())
        .map_or_else(|| pages.edit.title(), |t| format!("Edit {t}"));

    Ok(Json(FormPageView {
        resource: resource.slug(),
        title,
        kind: Some(pages.edit.kind()),
        header_actions: pages
            .edit
            .header_actions()
            .iter()
            .map(|a| a.view(prefix, resource, Some(id)))
            .collect(),
        fields: fields(resource),
        submit: ActionView {
            name: "save",
            label: "Save changes",
            method: http::Method::PUT.to_string(),
            url: format!("{prefix}/{}/{id}", resource.slug()),
            requires_confirmation: false,
            exporter: None,
        },
        record: Some(record),
    }))
}
