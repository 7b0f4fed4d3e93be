//! Furrow - provenance console for agricultural supply-chain tracking
//!
//! A view-state synchronization and rendering pipeline over a REST backend:
//! the gateway fetches JSON, renderers map it to typed markup trees, the
//! router keeps exactly one section active and rebuilds its container on
//! every refresh, and action handlers submit mutations and refresh the
//! dependent views.
//!
//! ## Components
//!
//! - **Gateway**: one operation per backend capability, single attempt per call
//! - **Router**: section navigation and idempotent per-section refresh
//! - **Renderers**: pure domain-data → render-tree mappings with structural escaping
//! - **Actions**: validated submissions with success/failure notification and
//!   dependent-view refresh

pub mod actions;
pub mod config;
pub mod dom;
pub mod gateway;
pub mod model;
pub mod notify;
pub mod render;
pub mod router;
pub mod types;

pub use config::Args;
pub use gateway::{HttpGateway, SupplyChainApi};
pub use router::{Section, ViewRouter};
pub use types::{FurrowError, Result};
