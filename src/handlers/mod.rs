//! HTTP handlers for panel pages, header actions and the team endpoint.
//!
//! Thin handlers: resolve the page, check the action is bound and permitted,
//! then delegate to the record store or exporter.

pub mod actions;
pub mod pages;
pub mod teams;

use freight_admin_core::{AppError, AppResult, AuthInfo};
use tracing::info;

use crate::panel::{HeaderAction, Page, Panel, Resource, ResourcePages};

/// Resolve a slug to its resource and pages.
fn resolve<'a>(panel: &'a Panel, slug: &str) -> AppResult<(Resource, &'a ResourcePages)> {
    panel
        .resource(slug)
        .zip(panel.pages(slug))
        .ok_or_else(|| AppError::not_found("Resource", slug))
}

/// Find `action` among the page's header actions and check the principal may run it.
fn authorize_action(page: &Page, action: &str, auth: &AuthInfo) -> AppResult<HeaderAction> {
    let bound = page.allows(action).ok_or_else(|| {
        AppError::NotFound(format!(
            "{} is not available for {}",
            capitalize(action),
            page.resource().plural_label()
        ))
    })?;
    auth.require(bound.permission())?;
    Ok(bound)
}

/// Count and log a completed header action.
fn record_action(resource: Resource, action: &'static str, auth: &AuthInfo) {
    metrics::counter!(
        "admin_actions_total",
        "resource" => resource.slug(),
        "action" => action
    )
    .increment(1);
    info!(
        resource = resource.slug(),
        action,
        user_id = %auth.user_id,
        "Header action completed"
    );
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("export"), "Export");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn resolve_unknown_slug_is_not_found() {
        let panel = Panel::default();
        assert!(matches!(resolve(&panel, "users"), Err(AppError::NotFound(_))));
        assert_eq!(resolve(&panel, "tenders").unwrap().0, Resource::Tender);
    }
}
