//! Action handlers: register, transfer, quality-check, verify
//!
//! Each mutating action runs the same machine: idle → submitting →
//! (succeeded | failed). Required-field validation runs before any network
//! call — a blank field aborts the submission entirely. Success closes the
//! action's modal, raises a success notification, and refreshes the two
//! dependent views (product grid and dashboard stats) before the handler
//! returns. Failure keeps the modal open so the user can retry without
//! re-entering data. Verify is read-only and only notifies.

use std::sync::Arc;
use tracing::info;

use crate::gateway::SupplyChainApi;
use crate::model::{QualityCheckRequest, RegisterRequest, TransferRequest};
use crate::notify::Notifier;
use crate::router::ViewRouter;
use crate::types::{FurrowError, Result};

/// Owner id the backend assigns when registration leaves the farmer blank
pub const DEFAULT_FARMER_ID: &str = "farmer_001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Per-action submission state plus the modal flag
#[derive(Debug)]
pub struct ActionState {
    pub phase: Phase,
    pub modal_open: bool,
}

impl ActionState {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            modal_open: false,
        }
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
        self.phase = Phase::Idle;
    }

    fn begin(&mut self) {
        self.phase = Phase::Submitting;
    }

    fn succeed(&mut self) {
        self.phase = Phase::Succeeded;
        self.modal_open = false;
    }

    fn fail(&mut self) {
        self.phase = Phase::Failed;
        // Modal stays open for retry
    }
}

// ============================================================================
// Input forms and client-side validation
// ============================================================================

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FurrowError::validation(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub origin: String,
    pub harvest_date: String,
    pub quality: String,
    pub farmer_id: String,
}

impl RegisterForm {
    /// All four product fields are required; a blank farmer falls back to
    /// the backend's default farmer id
    pub fn validate(&self) -> Result<RegisterRequest> {
        Ok(RegisterRequest {
            name: required(&self.name, "name")?,
            origin: required(&self.origin, "origin")?,
            harvest_date: required(&self.harvest_date, "harvest_date")?,
            quality: required(&self.quality, "quality")?,
            farmer_id: if self.farmer_id.trim().is_empty() {
                DEFAULT_FARMER_ID.to_string()
            } else {
                self.farmer_id.trim().to_string()
            },
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferForm {
    pub product_id: String,
    pub from_address: String,
    pub to_address: String,
    pub price: String,
    pub quality_update: String,
}

impl TransferForm {
    pub fn validate(&self) -> Result<(String, TransferRequest)> {
        let product_id = required(&self.product_id, "product_id")?;
        let from_address = required(&self.from_address, "from_address")?;
        let to_address = required(&self.to_address, "to_address")?;
        let price_text = required(&self.price, "price")?;
        let price: f64 = price_text
            .parse()
            .map_err(|_| FurrowError::validation("price"))?;
        if price < 0.0 {
            return Err(FurrowError::validation("price"));
        }
        let quality_update = match self.quality_update.trim() {
            "" => None,
            q => Some(q.to_string()),
        };
        Ok((
            product_id,
            TransferRequest {
                from_address,
                to_address,
                price,
                quality_update,
            },
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct QualityCheckForm {
    pub product_id: String,
    pub checked_by: String,
    pub quality_note: String,
    pub temperature: String,
}

impl QualityCheckForm {
    pub fn validate(&self) -> Result<(String, QualityCheckRequest)> {
        let product_id = required(&self.product_id, "product_id")?;
        let checked_by = required(&self.checked_by, "checked_by")?;
        let quality_note = required(&self.quality_note, "quality_note")?;
        let temperature = match self.temperature.trim() {
            "" => None,
            t => Some(
                t.parse::<f64>()
                    .map_err(|_| FurrowError::validation("temperature"))?,
            ),
        };
        Ok((
            product_id,
            QualityCheckRequest {
                checked_by,
                quality_note,
                temperature,
            },
        ))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Drives the submission machines and the dependent refreshes
pub struct ActionHandlers {
    api: Arc<dyn SupplyChainApi>,
    notifier: Notifier,
    pub register: ActionState,
    pub transfer: ActionState,
    pub quality: ActionState,
}

impl ActionHandlers {
    pub fn new(api: Arc<dyn SupplyChainApi>, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            register: ActionState::new(),
            transfer: ActionState::new(),
            quality: ActionState::new(),
        }
    }

    /// Register a new product batch
    pub async fn submit_register(&mut self, router: &mut ViewRouter, form: &RegisterForm) {
        self.register.begin();
        let req = match form.validate() {
            Ok(req) => req,
            Err(e) => {
                self.register.fail();
                self.notifier.error(e.user_message());
                return;
            }
        };

        match self.api.register(&req).await {
            Ok(resp) => {
                info!(product_id = %resp.product_id, "product registered");
                self.register.succeed();
                self.notifier.success(
                    resp.message
                        .unwrap_or_else(|| format!("Product registered: {}", resp.product_id)),
                );
                refresh_dependents(router).await;
            }
            Err(e) => {
                self.register.fail();
                self.notifier.error(e.user_message());
            }
        }
    }

    /// Transfer ownership to the next stakeholder
    pub async fn submit_transfer(&mut self, router: &mut ViewRouter, form: &TransferForm) {
        self.transfer.begin();
        let (product_id, req) = match form.validate() {
            Ok(v) => v,
            Err(e) => {
                self.transfer.fail();
                self.notifier.error(e.user_message());
                return;
            }
        };

        match self.api.transfer(&product_id, &req).await {
            Ok(ack) => {
                info!(product_id = %product_id, to = %req.to_address, "ownership transferred");
                self.transfer.succeed();
                self.notifier.success(
                    ack.message
                        .unwrap_or_else(|| "Ownership transferred successfully".to_string()),
                );
                refresh_dependents(router).await;
            }
            Err(e) => {
                self.transfer.fail();
                self.notifier.error(e.user_message());
            }
        }
    }

    /// Record a quality check without transferring ownership
    pub async fn submit_quality_check(&mut self, router: &mut ViewRouter, form: &QualityCheckForm) {
        self.quality.begin();
        let (product_id, req) = match form.validate() {
            Ok(v) => v,
            Err(e) => {
                self.quality.fail();
                self.notifier.error(e.user_message());
                return;
            }
        };

        match self.api.quality_check(&product_id, &req).await {
            Ok(ack) => {
                info!(product_id = %product_id, by = %req.checked_by, "quality check recorded");
                self.quality.succeed();
                self.notifier.success(
                    ack.message
                        .unwrap_or_else(|| "Quality check added successfully".to_string()),
                );
                refresh_dependents(router).await;
            }
            Err(e) => {
                self.quality.fail();
                self.notifier.error(e.user_message());
            }
        }
    }

    /// Verify authenticity; read-only, never refreshes dependent views
    pub async fn verify(&self, product_id: &str) {
        if product_id.trim().is_empty() {
            self.notifier
                .error(FurrowError::validation("product_id").user_message());
            return;
        }

        match self.api.verify(product_id).await {
            Ok(resp) if resp.authentic => {
                self.notifier.success(
                    resp.message
                        .unwrap_or_else(|| "Product is authentic".to_string()),
                );
            }
            Ok(resp) => {
                self.notifier.error(
                    resp.message
                        .unwrap_or_else(|| "Product could not be verified".to_string()),
                );
            }
            Err(e) => self.notifier.error(e.user_message()),
        }
    }
}

/// The product grid and dashboard stats are the only views dependent on
/// product/transaction mutations; both must complete before the action is
/// considered finished (their relative order is unspecified).
async fn refresh_dependents(router: &mut ViewRouter) {
    router.refresh_products().await;
    router.refresh_dashboard().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_all_product_fields() {
        let mut form = RegisterForm {
            name: "Organic Tomatoes".to_string(),
            origin: "Sunny Valley Farm".to_string(),
            harvest_date: "2024-01-15".to_string(),
            quality: "Grade AA".to_string(),
            farmer_id: String::new(),
        };
        let req = form.validate().unwrap();
        assert_eq!(req.farmer_id, DEFAULT_FARMER_ID);

        form.origin = "   ".to_string();
        match form.validate() {
            Err(FurrowError::Validation { field }) => assert_eq!(field, "origin"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_transfer_price_must_be_a_nonnegative_number() {
        let mut form = TransferForm {
            product_id: "PROD_000001".to_string(),
            from_address: "farmer_001".to_string(),
            to_address: "distributor_002".to_string(),
            price: "120".to_string(),
            quality_update: String::new(),
        };
        let (id, req) = form.validate().unwrap();
        assert_eq!(id, "PROD_000001");
        assert_eq!(req.price, 120.0);
        assert!(req.quality_update.is_none());

        form.price = "a lot".to_string();
        assert!(matches!(
            form.validate(),
            Err(FurrowError::Validation { field: "price" })
        ));

        form.price = "-5".to_string();
        assert!(matches!(
            form.validate(),
            Err(FurrowError::Validation { field: "price" })
        ));
    }

    #[test]
    fn test_quality_check_temperature_is_optional() {
        let mut form = QualityCheckForm {
            product_id: "PROD_000001".to_string(),
            checked_by: "distributor_002".to_string(),
            quality_note: "Received in perfect condition".to_string(),
            temperature: String::new(),
        };
        let (_, req) = form.validate().unwrap();
        assert!(req.temperature.is_none());

        form.temperature = "15.0".to_string();
        let (_, req) = form.validate().unwrap();
        assert_eq!(req.temperature, Some(15.0));
    }

    #[test]
    fn test_modal_state_machine() {
        let mut state = ActionState::new();
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.modal_open);

        state.open_modal();
        state.begin();
        assert_eq!(state.phase, Phase::Submitting);

        state.fail();
        assert_eq!(state.phase, Phase::Failed);
        assert!(state.modal_open, "modal stays open for retry");

        state.begin();
        state.succeed();
        assert_eq!(state.phase, Phase::Succeeded);
        assert!(!state.modal_open, "success closes the modal");
    }
}
