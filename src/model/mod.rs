//! Client-side view models for the supply-chain backend
//!
//! These are transient wire types: the backend owns persistence, and every
//! section reload fetches them fresh. Nothing here is diffed or patched
//! incrementally. The one long-lived structure is the stakeholder directory,
//! loaded once at startup and replaced wholesale on explicit reload.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// ============================================================================
// Transactions and products
// ============================================================================

/// Action recorded on a product's transaction history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxAction {
    #[serde(rename = "REGISTERED")]
    Registered,
    #[serde(rename = "TRANSFER")]
    Transfer,
    #[serde(rename = "QUALITY_CHECK")]
    QualityCheck,
}

impl TxAction {
    /// Wire label as the backend spells it (underscores and all)
    pub fn wire_label(&self) -> &'static str {
        match self {
            TxAction::Registered => "REGISTERED",
            TxAction::Transfer => "TRANSFER",
            TxAction::QualityCheck => "QUALITY_CHECK",
        }
    }
}

/// One entry of a product's chronological transaction history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub action: TxAction,
    pub from_address: String,
    pub to_address: String,
    /// Display name resolved by the backend, when it knows one
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to_name: Option<String>,
    /// Absent or zero on REGISTERED and QUALITY_CHECK rows
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quality_update: Option<String>,
    /// ISO-8601 timestamp string, backend-controlled
    pub timestamp: String,
}

/// Quality history entry (registration seeds one, checks append more)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRecord {
    pub quality: String,
    pub timestamp: String,
    #[serde(default)]
    pub checked_by: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
}

/// Price history point; stage is a human label like "Transfer to ..."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub timestamp: String,
    #[serde(default)]
    pub stage: Option<String>,
}

/// Summary row from `GET /products` (owner already resolved to a name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub origin: String,
    pub harvest_date: String,
    /// Display name — the list endpoint resolves it server-side
    pub current_owner: String,
    pub current_owner_id: String,
    pub transaction_count: u64,
}

/// Full product detail from `GET /products/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub origin: String,
    pub harvest_date: String,
    /// Stakeholder id of the current owner
    pub current_owner: String,
    pub current_owner_name: String,
    #[serde(default)]
    pub quality_history: Vec<QualityRecord>,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    #[serde(default)]
    pub transaction_history: Vec<Transaction>,
}

// ============================================================================
// Activity feed and stats
// ============================================================================

/// Kind of a recent-activity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    #[serde(rename = "REGISTER")]
    Register,
    #[serde(rename = "TRANSFER")]
    Transfer,
    #[serde(rename = "QUALITY_CHECK")]
    QualityCheck,
}

/// Denormalized projection of a product event for the activity feeds
///
/// Actor fields vary by kind: REGISTER and QUALITY_CHECK carry by/by_name,
/// TRANSFER carries from/to pairs and a price. Everything optional in the
/// wire type; renderers fall back to raw ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub timestamp: String,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub by_name: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub to_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quality_note: Option<String>,
}

/// Aggregate counters from `GET /stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_products: u64,
    pub total_transactions: u64,
    pub total_quality_checks: u64,
    #[serde(default)]
    pub active_stakeholders: u64,
    /// Already rounded to one decimal by the backend
    pub avg_price_increase: f64,
    #[serde(default)]
    pub recent_activity: Vec<Activity>,
}

/// Server-computed journey report from `GET /products/{id}/report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReport {
    pub product_id: String,
    pub product_name: String,
    pub origin: String,
    pub harvest_date: String,
    /// Display name of the current owner
    pub current_owner: String,
    pub current_owner_id: String,
    pub transaction_count: u64,
    pub price_increase: f64,
    pub price_increase_percent: f64,
    pub final_price: f64,
    pub quality_checks: u64,
    pub stakeholders_involved: u64,
}

// ============================================================================
// Stakeholder directory
// ============================================================================

/// Cheap read-only snapshot of the directory map
pub type DirectorySnapshot = Arc<HashMap<String, String>>;

/// Session-wide stakeholder id → display name lookup
///
/// Written exactly once at startup (or once more on explicit reload), read
/// concurrently by renderers and handlers. Replacement is wholesale: readers
/// take an `Arc` snapshot and never observe a half-updated map.
pub struct StakeholderDirectory {
    inner: RwLock<DirectorySnapshot>,
}

impl StakeholderDirectory {
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            inner: RwLock::new(Arc::new(map)),
        }
    }

    /// Fixed built-in set used when the backend is unreachable at startup.
    /// Mirrors the five stakeholders the backend itself seeds.
    pub fn builtin() -> Self {
        let mut map = HashMap::new();
        map.insert("farmer_001".to_string(), "Organic Farms Co.".to_string());
        map.insert("distributor_002".to_string(), "Fresh Distributors Ltd.".to_string());
        map.insert("retailer_003".to_string(), "Green Grocers Market".to_string());
        map.insert("consumer_004".to_string(), "End Consumer".to_string());
        map.insert("processor_005".to_string(), "Quality Processors Inc.".to_string());
        Self::from_map(map)
    }

    /// Replace the whole directory (explicit reload only)
    pub fn replace(&self, map: HashMap<String, String>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(map);
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Display name for a stakeholder id, falling back to the raw id
    pub fn name_of(&self, id: &str) -> String {
        self.snapshot()
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

// ============================================================================
// Request/response bodies for the POST operations
// ============================================================================

/// Body for `POST /products/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub origin: String,
    pub harvest_date: String,
    pub quality: String,
    pub farmer_id: String,
}

/// Success payload of `POST /products/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub product_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body for `POST /products/{id}/transfer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_address: String,
    pub to_address: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_update: Option<String>,
}

/// Body for `POST /products/{id}/quality-check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheckRequest {
    pub checked_by: String,
    pub quality_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Generic acknowledgement payload for the mutating POSTs
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: bool,
}

/// Payload of `GET /products/{id}/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub product_id: String,
    pub authentic: bool,
    #[serde(default)]
    pub message: Option<String>,
}
