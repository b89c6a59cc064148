//! List and Edit page definitions.
//!
//! A page binds exactly one resource and declares its header actions:
//! - List: `Export` (when the resource has a designated exporter), then `Create`.
//! - Edit: `Delete`.

use serde::Serialize;
use uuid::Uuid;

use super::{HeaderAction, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    List,
    Edit,
}

/// A resource page and its ordered header actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    resource: Resource,
    kind: PageKind,
    header_actions: Vec<HeaderAction>,
}

impl Page {
    /// The list page (table) for a resource.
    #[must_use]
    pub fn list(resource: Resource) -> Self {
        let header_actions = resource
            .exporter()
            .map(HeaderAction::Export)
            .into_iter()
            .chain([HeaderAction::Create])
            .collect();
        Self {
            resource,
            kind: PageKind::List,
            header_actions,
        }
    }

    /// The edit page (form) for a resource record.
    #[must_use]
    pub fn edit(resource: Resource) -> Self {
        Self {
            resource,
            kind: PageKind::Edit,
            header_actions: vec![HeaderAction::Delete],
        }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    #[must_use]
    pub const fn kind(&self) -> PageKind {
        self.kind
    }

    #[must_use]
    pub fn header_actions(&self) -> &[HeaderAction] {
        &self.header_actions
    }

    /// Whether an action of the same kind is bound to this page.
    #[must_use]
    pub fn allows(&self, action: &str) -> Option<HeaderAction> {
        self.header_actions
            .iter()
            .copied()
            .find(|a| a.name() == action)
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> String {
        match self.kind {
            PageKind::List => self.resource.plural_label().to_string(),
            PageKind::Edit => format!("Edit {}", self.resource.label()),
        }
    }

    /// Route of the page under `prefix`. `record` is required for edit pages.
    #[must_use]
    pub fn path(&self, prefix: &str, record: Option<Uuid>) -> String {
        let slug = self.resource.slug();
        match (self.kind, record) {
            (PageKind::List, _) => format!("{prefix}/{slug}"),
            (PageKind::Edit, Some(id)) => format!("{prefix}/{slug}/{id}/edit"),
            (PageKind::Edit, None) => format!("{prefix}/{slug}/{{record}}/edit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExporterId;

    #[test]
    fn every_list_page_has_create() {
        for resource in Resource::ALL {
            let page = Page::list(resource);
            assert_eq!(page.header_actions().last(), Some(&HeaderAction::Create));
        }
    }

    #[test]
    fn every_edit_page_has_delete() {
        for resource in Resource::ALL {
            assert_eq!(Page::edit(resource).header_actions(), [HeaderAction::Delete]);
        }
    }

    #[test]
    fn export_precedes_create_with_designated_exporter() {
        for resource in Resource::ALL {
            let page = Page::list(resource);
            match resource.exporter() {
                Some(id) => {
                    assert_eq!(
                        page.header_actions(),
                        [HeaderAction::Export(id), HeaderAction::Create]
                    );
                    assert_eq!(id.resource(), resource);
                }
                None => assert_eq!(page.header_actions(), [HeaderAction::Create]),
            }
        }
    }

    #[test]
    fn shipments_export_with_shipment_exporter() {
        let page = Page::list(Resource::Shipment);
        assert_eq!(
            page.allows("export"),
            Some(HeaderAction::Export(ExporterId::Shipment))
        );
        assert!(Page::list(Resource::Warehouse).allows("export").is_none());
        assert!(page.allows("delete").is_none());
    }

    #[test]
    fn paths_and_titles() {
        let id = Uuid::nil();
        let edit = Page::edit(Resource::DrivingBan);
        assert_eq!(
            edit.path("/admin", Some(id)),
            format!("/admin/driving-bans/{id}/edit")
        );
        assert_eq!(edit.title(), "Edit Driving Ban");
        assert_eq!(Page::list(Resource::Company).title(), "Companies");
    }
}
