//! Renderers: pure mappings from domain data to render trees
//!
//! Each renderer takes the fetched JSON (and the stakeholder directory where
//! names need resolving) and returns a `Node` tree for a fixed section
//! container. Renderers never fetch and never mutate shared state, so a
//! late-arriving render into a hidden container is always harmless.
//!
//! User-supplied text (names, origins, quality notes) enters the tree as
//! text nodes and is escaped on serialization; ids, numbers, and dates are
//! server-controlled and inserted verbatim.

pub mod activity;
pub mod forms;
pub mod journey;
pub mod node;
pub mod products;

pub use node::{el, text, Node};

use chrono::NaiveDateTime;

/// Placeholder rendered instead of an empty (or failed) section
pub fn empty_state(message: &str) -> Node {
    el("div")
        .class("empty-state")
        .child(el("p").text(message))
}

/// Human date-time for a backend ISO-8601 timestamp
///
/// The backend emits `datetime.isoformat()` strings without a zone suffix.
/// Unparseable values fall back to the raw string rather than failing the
/// render.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%b %-d, %Y, %-I:%M %p").to_string();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return dt.format("%b %-d, %Y, %-I:%M %p").to_string();
    }
    ts.to_string()
}

/// Currency-prefixed price, or the literal "N/A" when absent
///
/// Zero is a real price here; rows whose action implies "no price" (a zero
/// on a REGISTERED or QUALITY_CHECK row) filter it out before calling this.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${}", p),
        None => "N/A".to_string(),
    }
}
