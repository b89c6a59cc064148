//! Header actions attached to resource pages.

use http::Method;
use serde::Serialize;
use uuid::Uuid;

use super::Resource;
use crate::export::ExporterId;

/// A user-invokable operation shown in a page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderAction {
    Create,
    Delete,
    Export(ExporterId),
}

impl HeaderAction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Export(_) => "export",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "New",
            Self::Delete => "Delete",
            Self::Export(_) => "Export",
        }
    }

    /// Permission the principal must hold to invoke the action.
    #[must_use]
    pub const fn permission(self) -> &'static str {
        self.name()
    }

    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Create => Method::POST,
            Self::Delete => Method::DELETE,
            Self::Export(_) => Method::GET,
        }
    }

    /// Whether the action asks for confirmation before running.
    #[must_use]
    pub const fn requires_confirmation(self) -> bool {
        matches!(self, Self::Delete)
    }

    #[must_use]
    pub const fn exporter(self) -> Option<ExporterId> {
        match self {
            Self::Export(id) => Some(id),
            Self::Create | Self::Delete => None,
        }
    }

    /// Endpoint invoking the action. `record` is required for `Delete`.
    #[must_use]
    pub fn url(self, prefix: &str, resource: Resource, record: Option<Uuid>) -> String {
        let base = format!("{prefix}/{}", resource.slug());
        match (self, record) {
            (Self::Create, _) => base,
            (Self::Export(_), _) => format!("{base}/export"),
            (Self::Delete, Some(id)) => format!("{base}/{id}"),
            (Self::Delete, None) => format!("{base}/{{record}}"),
        }
    }

    /// Serializable description for a rendered page.
    #[must_use]
    pub fn view(self, prefix: &str, resource: Resource, record: Option<Uuid>) -> ActionView {
        ActionView {
            name: self.name(),
            label: self.label(),
            method: self.method().to_string(),
            url: self.url(prefix, resource, record),
            requires_confirmation: self.requires_confirmation(),
            exporter: self.exporter(),
        }
    }
}

/// Header action as rendered in a page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub name: &'static str,
    pub label: &'static str,
    pub method: String,
    pub url: String,
    pub requires_confirmation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exporter: Option<ExporterId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_resource_slug() {
        let id = Uuid::nil();
        assert_eq!(
            HeaderAction::Create.url("/admin", Resource::Tender, None),
            "/admin/tenders"
        );
        assert_eq!(
            HeaderAction::Export(ExporterId::Tender).url("/admin", Resource::Tender, None),
            "/admin/tenders/export"
        );
        assert_eq!(
            HeaderAction::Delete.url("/admin", Resource::Tender, Some(id)),
            format!("/admin/tenders/{id}")
        );
    }

    #[test]
    fn view_carries_exporter_only_for_export() {
        let export = HeaderAction::Export(ExporterId::Invoice).view("/admin", Resource::Invoice, None);
        assert_eq!(export.exporter, Some(ExporterId::Invoice));
        assert_eq!(export.method, "GET");

        let delete = HeaderAction::Delete.view("/admin", Resource::Invoice, Some(Uuid::nil()));
        assert!(delete.exporter.is_none());
        assert!(delete.requires_confirmation);
        assert_eq!(delete.method, "DELETE");
    }
}
