//! End-to-end pipeline tests against an in-process fake backend
//!
//! Drives the router and action handlers through the `SupplyChainApi` seam
//! and asserts the view-state guarantees: dependent refreshes after
//! mutations, modal behavior, validation short-circuits, degradation on
//! missing products, and QR handle release on section change.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use furrow::actions::{ActionHandlers, Phase, RegisterForm, TransferForm};
use furrow::gateway::{QrImage, SupplyChainApi};
use furrow::model::{
    Ack, Activity, Product, ProductReport, ProductSummary, QualityCheckRequest, RegisterRequest,
    RegisterResponse, StakeholderDirectory, SystemStats, TransferRequest, VerifyResponse,
};
use furrow::notify::Notifier;
use furrow::router::{Section, ViewRouter};
use furrow::types::{FurrowError, Result};

// ============================================================================
// Fake backend
// ============================================================================

struct FakeApi {
    calls: Mutex<Vec<String>>,
    products: Mutex<Vec<ProductSummary>>,
    product: Mutex<Option<Product>>,
    stats: Mutex<SystemStats>,
    transfer_error: Mutex<Option<String>>,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            products: Mutex::new(vec![summary("PROD_000001", "Organic Tomatoes")]),
            product: Mutex::new(Some(sample_product())),
            stats: Mutex::new(sample_stats()),
            transfer_error: Mutex::new(None),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn set_transfer_error(&self, message: &str) {
        *self.transfer_error.lock().unwrap() = Some(message.to_string());
    }
}

fn summary(id: &str, name: &str) -> ProductSummary {
    ProductSummary {
        id: id.to_string(),
        name: name.to_string(),
        origin: "Sunny Valley Farm, California".to_string(),
        harvest_date: "2024-01-15".to_string(),
        current_owner: "Organic Farms Co.".to_string(),
        current_owner_id: "farmer_001".to_string(),
        transaction_count: 1,
    }
}

fn sample_product() -> Product {
    serde_json::from_value(serde_json::json!({
        "id": "PROD_000001",
        "name": "Organic Tomatoes",
        "origin": "Sunny Valley Farm, California",
        "harvest_date": "2024-01-15",
        "current_owner": "farmer_001",
        "current_owner_name": "Organic Farms Co.",
        "quality_history": [],
        "price_history": [
            {"price": 0, "timestamp": "2024-01-15T08:00:00", "stage": "Registration"},
            {"price": 120, "timestamp": "2024-01-16T09:30:00", "stage": "Transfer"}
        ],
        "transaction_history": [
            {
                "from_address": "0x0",
                "to_address": "farmer_001",
                "price": 0,
                "timestamp": "2024-01-15T08:00:00",
                "quality_update": "Grade AA",
                "action": "REGISTERED"
            },
            {
                "from_address": "farmer_001",
                "to_address": "distributor_002",
                "price": 120,
                "timestamp": "2024-01-16T09:30:00",
                "quality_update": "Temperature controlled transport",
                "action": "TRANSFER"
            }
        ]
    }))
    .unwrap()
}

fn sample_stats() -> SystemStats {
    SystemStats {
        total_products: 1,
        total_transactions: 2,
        total_quality_checks: 1,
        active_stakeholders: 5,
        avg_price_increase: 41.7,
        recent_activity: vec![],
    }
}

#[async_trait]
impl SupplyChainApi for FakeApi {
    async fn stakeholders(&self) -> Result<HashMap<String, String>> {
        self.record("stakeholders");
        Ok(HashMap::new())
    }

    async fn stats(&self) -> Result<SystemStats> {
        self.record("stats");
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn products(&self) -> Result<Vec<ProductSummary>> {
        self.record("products");
        Ok(self.products.lock().unwrap().clone())
    }

    async fn product(&self, id: &str) -> Result<Product> {
        self.record(format!("product:{}", id));
        match self.product.lock().unwrap().clone() {
            Some(p) if p.id == id => Ok(p),
            _ => Err(FurrowError::NotFound(format!("Product {}", id))),
        }
    }

    async fn qr_code(&self, id: &str) -> Result<QrImage> {
        self.record(format!("qr:{}", id));
        Ok(QrImage {
            product_id: id.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"\x89PNG fake"),
        })
    }

    async fn verify(&self, id: &str) -> Result<VerifyResponse> {
        self.record(format!("verify:{}", id));
        let exists = self
            .product
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| p.id == id)
            .unwrap_or(false);
        Ok(VerifyResponse {
            product_id: id.to_string(),
            authentic: exists,
            message: Some(if exists {
                "Product is authentic".to_string()
            } else {
                "Product not found".to_string()
            }),
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse> {
        self.record("register");
        self.products
            .lock()
            .unwrap()
            .push(summary("PROD_000002", &req.name));
        Ok(RegisterResponse {
            product_id: "PROD_000002".to_string(),
            message: Some("Product registered successfully".to_string()),
        })
    }

    async fn transfer(&self, id: &str, req: &TransferRequest) -> Result<Ack> {
        self.record(format!("transfer:{}", id));
        if let Some(msg) = self.transfer_error.lock().unwrap().clone() {
            return Err(FurrowError::Application(msg));
        }
        // Reflect the new owner in subsequent list fetches
        if let Some(p) = self.products.lock().unwrap().iter_mut().find(|p| p.id == id) {
            p.current_owner = req.to_address.clone();
            p.current_owner_id = req.to_address.clone();
            p.transaction_count += 1;
        }
        let mut stats = self.stats.lock().unwrap();
        stats.total_transactions += 1;
        Ok(Ack {
            message: Some("Ownership transferred successfully".to_string()),
            success: true,
        })
    }

    async fn quality_check(&self, id: &str, _req: &QualityCheckRequest) -> Result<Ack> {
        self.record(format!("quality:{}", id));
        Ok(Ack {
            message: Some("Quality check added successfully".to_string()),
            success: true,
        })
    }

    async fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        self.record(format!("activity:{}", limit));
        Ok(vec![])
    }

    async fn product_report(&self, id: &str) -> Result<ProductReport> {
        self.record(format!("report:{}", id));
        Err(FurrowError::NotFound(format!("Product {}", id)))
    }
}

fn pipeline() -> (Arc<FakeApi>, ViewRouter, ActionHandlers, Notifier) {
    let api = Arc::new(FakeApi::new());
    let directory = Arc::new(StakeholderDirectory::builtin());
    let notifier = Notifier::default();
    let router = ViewRouter::new(
        Arc::clone(&api) as Arc<dyn SupplyChainApi>,
        directory,
        notifier.clone(),
    );
    let handlers = ActionHandlers::new(Arc::clone(&api) as Arc<dyn SupplyChainApi>, notifier.clone());
    (api, router, handlers, notifier)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn successful_transfer_closes_modal_and_refreshes_dependents() {
    let (api, mut router, mut handlers, notifier) = pipeline();
    router.navigate(Section::Products).await;

    let form = TransferForm {
        product_id: "PROD_000001".to_string(),
        from_address: "farmer_001".to_string(),
        to_address: "distributor_002".to_string(),
        price: "120".to_string(),
        quality_update: "Temperature controlled".to_string(),
    };
    handlers.transfer.open_modal();
    handlers.submit_transfer(&mut router, &form).await;

    assert_eq!(handlers.transfer.phase, Phase::Succeeded);
    assert!(!handlers.transfer.modal_open, "success closes the modal");
    assert_eq!(
        notifier.latest().unwrap().message,
        "Ownership transferred successfully"
    );

    // Both dependent views were re-fetched after the transfer call
    let calls = api.calls();
    let transfer_pos = calls.iter().position(|c| c == "transfer:PROD_000001").unwrap();
    let after = &calls[transfer_pos + 1..];
    assert!(after.contains(&"products".to_string()));
    assert!(after.contains(&"stats".to_string()));

    // The grid now reflects the new owner
    assert!(router
        .document()
        .html(Section::Products)
        .contains("distributor_002"));
}

#[tokio::test]
async fn failed_transfer_keeps_modal_open_with_server_message() {
    let (api, mut router, mut handlers, notifier) = pipeline();
    api.set_transfer_error("Current owner is farmer_001, not retailer_003");

    let form = TransferForm {
        product_id: "PROD_000001".to_string(),
        from_address: "retailer_003".to_string(),
        to_address: "consumer_004".to_string(),
        price: "320".to_string(),
        quality_update: String::new(),
    };
    handlers.transfer.open_modal();
    handlers.submit_transfer(&mut router, &form).await;

    assert_eq!(handlers.transfer.phase, Phase::Failed);
    assert!(handlers.transfer.modal_open, "modal stays open for retry");
    assert_eq!(
        notifier.latest().unwrap().message,
        "Current owner is farmer_001, not retailer_003"
    );

    // No dependent refreshes after a failed mutation
    let calls = api.calls();
    let transfer_pos = calls.iter().position(|c| c == "transfer:PROD_000001").unwrap();
    assert!(calls[transfer_pos + 1..].is_empty());
}

#[tokio::test]
async fn blank_required_field_never_issues_a_network_call() {
    let (api, mut router, mut handlers, notifier) = pipeline();

    let form = RegisterForm {
        name: "Organic Apples".to_string(),
        origin: String::new(), // blank required field
        harvest_date: "2024-01-12".to_string(),
        quality: "Grade A".to_string(),
        farmer_id: String::new(),
    };
    handlers.register.open_modal();
    handlers.submit_register(&mut router, &form).await;

    assert_eq!(handlers.register.phase, Phase::Failed);
    assert!(handlers.register.modal_open);
    assert!(api.calls().is_empty(), "validation aborts before any request");
    assert!(notifier.latest().unwrap().message.contains("origin"));
}

#[tokio::test]
async fn tracking_a_missing_product_degrades_without_a_timeline() {
    let (api, mut router, _handlers, notifier) = pipeline();

    router.track("P-404").await;

    assert_eq!(router.document().active(), Section::Track);
    let html = router.document().html(Section::Track);
    assert!(html.contains("No data available"));
    assert!(!html.contains("timeline"));
    assert!(notifier
        .latest()
        .unwrap()
        .message
        .contains("Product P-404 was not found"));

    // The QR endpoint is never consulted for a missing product
    assert_eq!(api.calls(), vec!["product:P-404".to_string()]);
}

#[tokio::test]
async fn tracking_renders_timeline_and_releases_qr_on_section_change() {
    let (_api, mut router, _handlers, _notifier) = pipeline();

    router.track("PROD_000001").await;

    let html = router.document().html(Section::Track);
    assert!(html.contains("timeline"));
    assert!(html.contains("Organic Tomatoes"));
    assert!(router.qr_image().is_some());

    // Leaving the track section drops the image handle
    router.navigate(Section::Products).await;
    assert!(router.qr_image().is_none());
}

#[tokio::test]
async fn verify_is_read_only() {
    let (api, _router, handlers, notifier) = pipeline();

    handlers.verify("PROD_000001").await;
    assert_eq!(notifier.latest().unwrap().message, "Product is authentic");
    assert_eq!(api.calls(), vec!["verify:PROD_000001".to_string()]);

    handlers.verify("P-404").await;
    assert_eq!(notifier.latest().unwrap().message, "Product not found");
}

#[tokio::test]
async fn late_refresh_for_an_inactive_section_is_harmless() {
    let (_api, mut router, _handlers, _notifier) = pipeline();
    router.navigate(Section::Products).await;

    // A dashboard response arriving while products is active resolves into
    // the hidden dashboard container
    router.refresh_dashboard().await;

    assert_eq!(router.document().active(), Section::Products);
    assert!(router.document().is_rendered(Section::Dashboard));
    assert!(router.document().html(Section::Dashboard).contains("stats-panel"));
}

#[tokio::test]
async fn navigation_refreshes_the_target_section() {
    let (api, mut router, _handlers, _notifier) = pipeline();

    router.navigate(Section::Products).await;
    assert_eq!(router.document().active(), Section::Products);
    assert!(router.document().html(Section::Products).contains("Organic Tomatoes"));

    // Navigating again re-fetches rather than reusing stale content
    router.navigate(Section::Products).await;
    let products_calls = api.calls().iter().filter(|c| *c == "products").count();
    assert_eq!(products_calls, 2);
}
