//! View router
//!
//! Maps navigation targets onto sections and runs each section's refresh
//! routine. Exactly one section is active at a time; refreshes are
//! idempotent and always rebuild the section container from the latest
//! fetch. A failed load degrades to the placeholder render plus an error
//! notification instead of leaving stale content.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::dom::Document;
use crate::gateway::{QrImage, SupplyChainApi};
use crate::model::StakeholderDirectory;
use crate::notify::Notifier;
use crate::render::{self, el};
use crate::types::FurrowError;

/// Navigable sections; Dashboard is the initial state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Dashboard,
    Products,
    Analytics,
    Track,
    Register,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Products,
        Section::Analytics,
        Section::Track,
        Section::Register,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Products => "products",
            Section::Analytics => "analytics",
            Section::Track => "track",
            Section::Register => "register",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the document, the gateway handle, and the per-session directory
pub struct ViewRouter {
    api: Arc<dyn SupplyChainApi>,
    directory: Arc<StakeholderDirectory>,
    notifier: Notifier,
    document: Document,
    /// QR image held for the track section; released on section change
    qr: Option<QrImage>,
    /// Last tracked product id, so re-entering the track section re-renders
    last_tracked: Option<String>,
}

impl ViewRouter {
    pub fn new(
        api: Arc<dyn SupplyChainApi>,
        directory: Arc<StakeholderDirectory>,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            directory,
            notifier,
            document: Document::new(),
            qr: None,
            last_tracked: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn directory(&self) -> &StakeholderDirectory {
        &self.directory
    }

    pub fn qr_image(&self) -> Option<&QrImage> {
        self.qr.as_ref()
    }

    /// Deactivate the current section, activate the target, refresh it
    pub async fn navigate(&mut self, section: Section) {
        let leaving = self.document.active();
        if leaving == Section::Track && section != Section::Track {
            // Release the QR image handle when the track view goes away
            self.qr = None;
        }
        debug!(from = %leaving, to = %section, "navigate");
        self.document.activate(section);
        self.refresh(section).await;
    }

    /// Run a section's refresh routine (idempotent, wholesale rebuild)
    pub async fn refresh(&mut self, section: Section) {
        match section {
            Section::Dashboard => self.refresh_dashboard().await,
            Section::Products => self.refresh_products().await,
            Section::Analytics => self.refresh_analytics().await,
            Section::Track => self.refresh_track().await,
            Section::Register => self.refresh_register(),
        }
    }

    /// Dashboard: aggregate counters plus the most-recent-first feed
    pub async fn refresh_dashboard(&mut self) {
        match self.api.stats().await {
            Ok(stats) => {
                let content = el("div")
                    .class("dashboard")
                    .child(render::activity::stats_panel(&stats))
                    .child(render::activity::dashboard_feed(&stats.recent_activity));
                self.document.set_content(Section::Dashboard, content);
            }
            Err(e) => self.degrade(Section::Dashboard, e),
        }
    }

    /// Products: one card per product in server order
    pub async fn refresh_products(&mut self) {
        match self.api.products().await {
            Ok(products) => {
                let content = render::products::product_grid(&products);
                self.document.set_content(Section::Products, content);
            }
            Err(e) => self.degrade(Section::Products, e),
        }
    }

    /// Analytics: last-five activity slice in arrival order
    pub async fn refresh_analytics(&mut self) {
        match self.api.stats().await {
            Ok(stats) => {
                let content = el("div")
                    .class("analytics")
                    .child(render::activity::analytics_feed(&stats.recent_activity));
                self.document.set_content(Section::Analytics, content);
            }
            Err(e) => self.degrade(Section::Analytics, e),
        }
    }

    /// Analytics for one product: computed card plus the in-order feed
    pub async fn analyze(&mut self, product_id: &str) {
        if product_id.trim().is_empty() {
            self.notifier
                .error(FurrowError::validation("product_id").user_message());
            return;
        }

        let (product, stats) =
            futures::join!(self.api.product(product_id), self.api.stats());

        let product = match product {
            Ok(p) => p,
            Err(e) => {
                self.notifier.error(e.user_message());
                self.document.clear(Section::Analytics);
                return;
            }
        };

        let feed = match stats {
            Ok(stats) => render::activity::analytics_feed(&stats.recent_activity),
            Err(e) => {
                warn!(error = %e, "stats fetch failed during analyze, feed degrades");
                render::empty_state("No recent activity")
            }
        };

        let content = el("div")
            .class("analytics")
            .child(render::journey::analytics_card(&product))
            .child(feed);
        self.document.set_content(Section::Analytics, content);
    }

    /// Track: journey timeline + analytics card + QR image for one product
    pub async fn track(&mut self, product_id: &str) {
        if product_id.trim().is_empty() {
            self.notifier
                .error(FurrowError::validation("product_id").user_message());
            return;
        }

        self.document.activate(Section::Track);

        let product = match self.api.product(product_id).await {
            Ok(p) => p,
            Err(e) => {
                self.qr = None;
                self.last_tracked = None;
                self.document.clear(Section::Track);
                self.notifier.error(e.user_message());
                return;
            }
        };

        // QR failure is non-fatal: the timeline still renders, the image
        // slot stays empty
        self.qr = match self.api.qr_code(product_id).await {
            Ok(img) => Some(img),
            Err(e) => {
                warn!(product_id, error = %e, "QR fetch failed");
                None
            }
        };

        let mut content = el("div")
            .class("track")
            .child(render::journey::journey_timeline(&product, &self.directory))
            .child(render::journey::analytics_card(&product));
        if self.qr.is_some() {
            content = content.child(
                el("img")
                    .class("qr-code")
                    .attr("alt", format!("QR code for {}", product.id)),
            );
        }
        self.document.set_content(Section::Track, content);
        self.last_tracked = Some(product_id.to_string());
    }

    async fn refresh_track(&mut self) {
        match self.last_tracked.clone() {
            Some(id) => self.track(&id).await,
            None => {
                let content =
                    render::empty_state("Enter a product ID to trace its journey");
                self.document.set_content(Section::Track, content);
            }
        }
    }

    fn refresh_register(&mut self) {
        let content = render::forms::register_form(&self.directory);
        self.document.set_content(Section::Register, content);
    }

    /// Reload the stakeholder directory wholesale (explicit reload only)
    pub async fn reload_directory(&mut self) {
        match self.api.stakeholders().await {
            Ok(map) => {
                self.directory.replace(map);
                debug!(entries = self.directory.len(), "stakeholder directory reloaded");
            }
            Err(e) => self.notifier.error(e.user_message()),
        }
    }

    /// Failed section load: placeholder instead of stale content, plus an
    /// error notification
    fn degrade(&mut self, section: Section, error: FurrowError) {
        warn!(section = %section, error = %error, "section load failed");
        self.document.clear(section);
        self.notifier.error(error.user_message());
    }
}
