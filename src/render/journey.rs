//! Journey timeline and per-product analytics card

use std::collections::HashSet;

use crate::model::{PricePoint, Product, StakeholderDirectory, Transaction, TxAction};
use crate::render::{el, empty_state, format_price, format_timestamp, text, Node};

/// One entry per transaction_history item, in received (chronological) order
pub fn journey_timeline(product: &Product, directory: &StakeholderDirectory) -> Node {
    let header = el("div")
        .class("journey-header")
        .child(el("h2").text(&product.name))
        .child(el("p").class("product-id").text(&product.id))
        .child(labeled("Origin", &product.origin))
        .child(labeled("Harvested", &product.harvest_date))
        .child(labeled("Current Owner", &product.current_owner_name));

    if product.transaction_history.is_empty() {
        return el("div")
            .class("journey")
            .child(header)
            .child(empty_state("No journey recorded yet"));
    }

    el("div").class("journey").child(header).child(
        el("ol")
            .class("timeline")
            .children(
                product
                    .transaction_history
                    .iter()
                    .map(|tx| timeline_entry(tx, directory)),
            ),
    )
}

fn timeline_entry(tx: &Transaction, directory: &StakeholderDirectory) -> Node {
    let from = party_name(&tx.from_name, &tx.from_address, directory);
    let to = party_name(&tx.to_name, &tx.to_address, directory);
    let quality = tx
        .quality_update
        .clone()
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| "No quality update".to_string());

    el("li")
        .class("timeline-entry")
        .child(el("h4").text(action_label(tx)))
        .child(
            el("span")
                .class("timestamp")
                .text(format_timestamp(&tx.timestamp)),
        )
        .child(labeled("From", &from))
        .child(labeled("To", &to))
        .child(labeled("Price", &price_text(tx)))
        .child(labeled("Quality", &quality))
}

/// Transfer rows show whatever price they carry (zero included); on
/// REGISTERED and QUALITY_CHECK rows a zero price means "no price" and
/// renders as "N/A"
fn price_text(tx: &Transaction) -> String {
    match tx.action {
        TxAction::Transfer => format_price(tx.price),
        TxAction::Registered | TxAction::QualityCheck => {
            format_price(tx.price.filter(|p| *p > 0.0))
        }
    }
}

/// Action label with underscores replaced by spaces ("QUALITY_CHECK" → "QUALITY CHECK")
fn action_label(tx: &Transaction) -> String {
    tx.action.wire_label().replace('_', " ")
}

/// Backend-resolved name, then directory lookup, then the raw address
fn party_name(name: &Option<String>, address: &str, directory: &StakeholderDirectory) -> String {
    name.clone().unwrap_or_else(|| directory.name_of(address))
}

/// Computed analytics for one product
pub fn analytics_card(product: &Product) -> Node {
    el("div")
        .class("analytics-card")
        .child(el("h3").text(&product.name))
        .child(metric(
            "Transactions",
            product.transaction_history.len().to_string(),
        ))
        .child(metric(
            "Current Value",
            format!("${}", current_value(&product.price_history)),
        ))
        .child(metric(
            "Price Increase",
            format!("{}%", price_increase_percent(&product.price_history)),
        ))
        .child(metric(
            "Stakeholders",
            distinct_stakeholders(&product.transaction_history).to_string(),
        ))
}

fn metric(label: &str, value: String) -> Node {
    el("div")
        .class("metric")
        .child(el("span").class("metric-value").text(value))
        .child(el("span").class("metric-label").text(label))
}

fn labeled(label: &str, value: &str) -> Node {
    el("p")
        .child(el("strong").text(format!("{}: ", label)))
        .child(text(value))
}

/// Price of the last price_history entry, 0 if there is none
pub fn current_value(history: &[PricePoint]) -> f64 {
    history.last().map(|p| p.price).unwrap_or(0.0)
}

/// (last − first) / first × 100, rounded to one decimal
///
/// A zero first price yields the literal 0 rather than dividing by zero.
pub fn price_increase_percent(history: &[PricePoint]) -> f64 {
    let (first, last) = match (history.first(), history.last()) {
        (Some(f), Some(l)) => (f.price, l.price),
        _ => return 0.0,
    };
    if first == 0.0 {
        return 0.0;
    }
    let percent = (last - first) / first * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Size of the union of all from/to addresses, floored at 1
pub fn distinct_stakeholders(history: &[Transaction]) -> usize {
    let mut set = HashSet::new();
    for tx in history {
        set.insert(tx.from_address.as_str());
        set.insert(tx.to_address.as_str());
    }
    set.len().max(1)
}
