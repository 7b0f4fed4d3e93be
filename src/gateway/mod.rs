//! Remote data gateway for the supply-chain backend
//!
//! One operation per backend capability, pure request/response: a single
//! attempt per call, no retries, no timeouts, no backoff. Failures map onto
//! the crate error taxonomy — transport problems become `Network`, id-scoped
//! GETs returning non-2xx become `NotFound`, and rejected POSTs become
//! `Application` carrying the server's own message.
//!
//! The `SupplyChainApi` trait is the seam the router and action handlers
//! depend on; `HttpGateway` is the reqwest implementation.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::model::{
    Ack, Activity, Product, ProductReport, ProductSummary, QualityCheckRequest, RegisterRequest,
    RegisterResponse, SystemStats, TransferRequest, VerifyResponse,
};
use crate::types::{FurrowError, Result};

/// Error body the backend attaches to rejected requests
#[derive(Debug, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Displayable QR image for a product
///
/// A scoped resource: the router holds at most one of these for the track
/// section and drops it on section change, releasing the buffer.
#[derive(Debug, Clone)]
pub struct QrImage {
    pub product_id: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl QrImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Every backend capability the pipeline consumes
#[async_trait]
pub trait SupplyChainApi: Send + Sync {
    async fn stakeholders(&self) -> Result<HashMap<String, String>>;
    async fn stats(&self) -> Result<SystemStats>;
    async fn products(&self) -> Result<Vec<ProductSummary>>;
    async fn product(&self, id: &str) -> Result<Product>;
    async fn qr_code(&self, id: &str) -> Result<QrImage>;
    async fn verify(&self, id: &str) -> Result<VerifyResponse>;
    async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse>;
    async fn transfer(&self, id: &str, req: &TransferRequest) -> Result<Ack>;
    async fn quality_check(&self, id: &str, req: &QualityCheckRequest) -> Result<Ack>;
    async fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>>;
    async fn product_report(&self, id: &str) -> Result<ProductReport>;
}

/// reqwest-backed gateway against the fixed REST surface
pub struct HttpGateway {
    base: String,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway for the given API base (e.g. "http://localhost:5000/api")
    pub fn new(api_base: &str) -> Self {
        Self {
            base: api_base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// GET returning JSON; non-2xx surfaces as a network-class failure
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FurrowError::Network(format!(
                "GET {} failed with status {}",
                url, status
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| FurrowError::Network(format!("failed to parse response from {}: {}", url, e)))
    }

    /// GET for an id-scoped resource; non-2xx means the id does not exist
    async fn get_scoped_json<T: DeserializeOwned>(&self, url: &str, what: String) -> Result<T> {
        debug!(url, "GET");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FurrowError::NotFound(what));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| FurrowError::Network(format!("failed to parse response from {}: {}", url, e)))
    }

    /// POST a JSON body; non-2xx becomes an application error with the
    /// server's message when the body parses as `{error}`
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&text) {
                return Err(FurrowError::Application(err.error));
            }
            return Err(FurrowError::Application(format!(
                "request failed ({}): {}",
                status, text
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| FurrowError::Network(format!("failed to parse response from {}: {}", url, e)))
    }
}

#[async_trait]
impl SupplyChainApi for HttpGateway {
    async fn stakeholders(&self) -> Result<HashMap<String, String>> {
        self.get_json(&format!("{}/stakeholders", self.base)).await
    }

    async fn stats(&self) -> Result<SystemStats> {
        self.get_json(&format!("{}/stats", self.base)).await
    }

    async fn products(&self) -> Result<Vec<ProductSummary>> {
        self.get_json(&format!("{}/products", self.base)).await
    }

    async fn product(&self, id: &str) -> Result<Product> {
        let url = format!("{}/products/{}", self.base, id);
        self.get_scoped_json(&url, format!("Product {}", id)).await
    }

    async fn qr_code(&self, id: &str) -> Result<QrImage> {
        let url = format!("{}/products/{}/qrcode", self.base, id);
        debug!(url = %url, "GET");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FurrowError::NotFound(format!("QR code for {}", id)));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(QrImage {
            product_id: id.to_string(),
            content_type,
            bytes,
        })
    }

    async fn verify(&self, id: &str) -> Result<VerifyResponse> {
        let url = format!("{}/products/{}/verify", self.base, id);
        self.get_scoped_json(&url, format!("Product {}", id)).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse> {
        self.post_json(&format!("{}/products/register", self.base), req)
            .await
    }

    async fn transfer(&self, id: &str, req: &TransferRequest) -> Result<Ack> {
        self.post_json(&format!("{}/products/{}/transfer", self.base, id), req)
            .await
    }

    async fn quality_check(&self, id: &str, req: &QualityCheckRequest) -> Result<Ack> {
        self.post_json(&format!("{}/products/{}/quality-check", self.base, id), req)
            .await
    }

    async fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        self.get_json(&format!("{}/activity?limit={}", self.base, limit))
            .await
    }

    async fn product_report(&self, id: &str) -> Result<ProductReport> {
        let url = format!("{}/products/{}/report", self.base, id);
        self.get_scoped_json(&url, format!("Product {}", id)).await
    }
}
