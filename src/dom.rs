//! In-memory document model
//!
//! The stand-in for the browser document tree: one container per navigable
//! section plus an active-section marker. Containers exist whether or not
//! their section is visible, so a late-arriving render for an inactive
//! section lands in its hidden container and disturbs nothing. Setting a
//! container's content always replaces it wholesale; stale markup never
//! accumulates.

use std::collections::BTreeMap;

use crate::render::{empty_state, Node};
use crate::router::Section;

/// Per-section render target
#[derive(Debug, Default)]
pub struct Container {
    content: Option<Node>,
}

/// The page: five section containers and exactly one active section
#[derive(Debug)]
pub struct Document {
    containers: BTreeMap<Section, Container>,
    active: Section,
}

impl Document {
    pub fn new() -> Self {
        let mut containers = BTreeMap::new();
        for section in Section::ALL {
            containers.insert(section, Container::default());
        }
        Self {
            containers,
            active: Section::Dashboard,
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Mark a section visible; all others become hidden
    pub fn activate(&mut self, section: Section) {
        self.active = section;
    }

    /// Replace a section's content wholesale
    pub fn set_content(&mut self, section: Section, node: Node) {
        if let Some(container) = self.containers.get_mut(&section) {
            container.content = Some(node);
        }
    }

    /// Drop a section's content; it renders the placeholder until refreshed
    pub fn clear(&mut self, section: Section) {
        if let Some(container) = self.containers.get_mut(&section) {
            container.content = None;
        }
    }

    pub fn is_rendered(&self, section: Section) -> bool {
        self.containers
            .get(&section)
            .map(|c| c.content.is_some())
            .unwrap_or(false)
    }

    /// Serialized markup of a section's container
    ///
    /// An unrendered (or cleared) section shows the "no data" placeholder
    /// rather than empty markup.
    pub fn html(&self, section: Section) -> String {
        match self.containers.get(&section).and_then(|c| c.content.as_ref()) {
            Some(node) => node.to_html(),
            None => empty_state("No data available").to_html(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
