//! The admin panel: resource descriptors, their pages and header actions.
//!
//! The [`Panel`] is static configuration built once at startup and shared
//! read-only across requests.

mod action;
mod page;
mod resource;

use std::collections::BTreeMap;

use serde::Serialize;

pub use action::{ActionView, HeaderAction};
pub use page::{Page, PageKind};
pub use resource::{Field, Resource};

/// Default mount point of the panel.
pub const DEFAULT_PREFIX: &str = "/admin";

/// The list and edit pages registered for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePages {
    pub list: Page,
    pub edit: Page,
}

/// Navigation entry for one resource.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationItem {
    pub resource: &'static str,
    pub label: &'static str,
    pub url: String,
}

/// Registry of every resource page, keyed by slug.
#[derive(Debug, Clone)]
pub struct Panel {
    prefix: String,
    pages: BTreeMap<&'static str, (Resource, ResourcePages)>,
}

impl Panel {
    /// Register list and edit pages for every resource under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        let pages = Resource::ALL
            .into_iter()
            .map(|resource| {
                let pages = ResourcePages {
                    list: Page::list(resource),
                    edit: Page::edit(resource),
                };
                (resource.slug(), (resource, pages))
            })
            .collect();
        Self { prefix, pages }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn resource(&self, slug: &str) -> Option<Resource> {
        self.pages.get(slug).map(|(resource, _)| *resource)
    }

    #[must_use]
    pub fn pages(&self, slug: &str) -> Option<&ResourcePages> {
        self.pages.get(slug).map(|(_, pages)| pages)
    }

    #[must_use]
    pub fn list_page(&self, slug: &str) -> Option<&Page> {
        self.pages(slug).map(|p| &p.list)
    }

    #[must_use]
    pub fn edit_page(&self, slug: &str) -> Option<&Page> {
        self.pages(slug).map(|p| &p.edit)
    }

    pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
        self.pages.values().map(|(resource, _)| *resource)
    }

    /// Navigation sorted by plural label.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavigationItem> {
        let mut items: Vec<NavigationItem> = self
            .pages
            .values()
            .map(|(resource, pages)| NavigationItem {
                resource: resource.slug(),
                label: resource.plural_label(),
                url: pages.list.path(&self.prefix, None),
            })
            .collect();
        items.sort_by_key(|item| item.label);
        items
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_resource_once() {
        let panel = Panel::default();
        assert_eq!(panel.resources().count(), Resource::ALL.len());
        for resource in Resource::ALL {
            assert_eq!(panel.resource(resource.slug()), Some(resource));
        }
    }

    #[test]
    fn each_page_references_its_own_resource() {
        let panel = Panel::default();
        for resource in Resource::ALL {
            let pages = panel.pages(resource.slug()).unwrap();
            assert_eq!(pages.list.resource(), resource);
            assert_eq!(pages.edit.resource(), resource);
            assert_eq!(pages.list.kind(), PageKind::List);
            assert_eq!(pages.edit.kind(), PageKind::Edit);
        }
    }

    #[test]
    fn prefix_is_normalized() {
        let panel = Panel::new("/backoffice/");
        assert_eq!(panel.prefix(), "/backoffice");
        let nav = panel.navigation();
        assert_eq!(nav[0].label, "Carbon Footprints");
        assert_eq!(nav[0].url, "/backoffice/carbon-footprints");
    }

    #[test]
    fn unknown_slug_has_no_pages() {
        let panel = Panel::default();
        assert!(panel.list_page("users").is_none());
        assert!(panel.edit_page("users").is_none());
    }
}
