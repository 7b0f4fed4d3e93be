//! Dashboard stats panel and the two activity feeds
//!
//! Both feeds take the last five activities of the stats payload. The
//! dashboard feed renders them most-recent-first; the analytics feed renders
//! the same slice in arrival order. The asymmetry is inherited behavior and
//! is preserved on purpose.

use crate::model::{Activity, ActivityKind, SystemStats};
use crate::render::{el, empty_state, format_timestamp, Node};

const FEED_LEN: usize = 5;

/// Aggregate counters for the dashboard header
pub fn stats_panel(stats: &SystemStats) -> Node {
    el("div")
        .class("stats-panel")
        .child(stat_card("Products", stats.total_products.to_string()))
        .child(stat_card("Transactions", stats.total_transactions.to_string()))
        .child(stat_card("Quality Checks", stats.total_quality_checks.to_string()))
        .child(stat_card(
            "Avg Price Increase",
            format!("{}%", stats.avg_price_increase),
        ))
}

fn stat_card(label: &str, value: String) -> Node {
    el("div")
        .class("stat-card")
        .child(el("span").class("stat-value").text(value))
        .child(el("span").class("stat-label").text(label))
}

/// Dashboard feed: last five activities, most-recent-first
pub fn dashboard_feed(activities: &[Activity]) -> Node {
    feed(last_five(activities).iter().rev())
}

/// Analytics feed: the same last-five slice, in arrival order
pub fn analytics_feed(activities: &[Activity]) -> Node {
    feed(last_five(activities).iter())
}

fn last_five(activities: &[Activity]) -> &[Activity] {
    let start = activities.len().saturating_sub(FEED_LEN);
    &activities[start..]
}

fn feed<'a>(entries: impl Iterator<Item = &'a Activity>) -> Node {
    let items: Vec<Node> = entries.map(activity_entry).collect();
    if items.is_empty() {
        return empty_state("No recent activity");
    }
    el("ul").class("activity-feed").children(items)
}

fn activity_entry(activity: &Activity) -> Node {
    let description = match activity.kind {
        ActivityKind::Register => format!(
            "{} registered {}",
            actor(&activity.by_name, &activity.by),
            activity.product_name
        ),
        ActivityKind::Transfer => format!(
            "{} transferred {} to {}",
            actor(&activity.from_name, &activity.from),
            activity.product_name,
            actor(&activity.to_name, &activity.to)
        ),
        ActivityKind::QualityCheck => format!(
            "{} quality-checked {}",
            actor(&activity.by_name, &activity.by),
            activity.product_name
        ),
    };

    let mut entry = el("li")
        .class(kind_class(activity.kind))
        .attr("data-product-id", &activity.product_id)
        .child(el("span").class("description").text(description));

    if let Some(price) = activity.price {
        if price > 0.0 {
            entry = entry.child(el("span").class("price").text(format!("${}", price)));
        }
    }
    if let Some(ref note) = activity.quality_note {
        entry = entry.child(el("span").class("note").text(note));
    }

    entry.child(
        el("span")
            .class("timestamp")
            .text(format_timestamp(&activity.timestamp)),
    )
}

/// Display name, falling back to the raw id, then to "unknown"
fn actor(name: &Option<String>, id: &Option<String>) -> String {
    name.clone()
        .or_else(|| id.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn kind_class(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Register => "activity-register",
        ActivityKind::Transfer => "activity-transfer",
        ActivityKind::QualityCheck => "activity-quality",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(n: usize) -> Activity {
        Activity {
            kind: ActivityKind::Register,
            product_id: format!("PROD_{:06}", n),
            product_name: format!("Batch {}", n),
            timestamp: "2024-01-15T08:00:00".to_string(),
            by: Some("farmer_001".to_string()),
            by_name: Some("Organic Farms Co.".to_string()),
            from: None,
            from_name: None,
            to: None,
            to_name: None,
            price: None,
            quality_note: None,
        }
    }

    fn positions(html: &str, names: &[&str]) -> Vec<usize> {
        names.iter().map(|n| html.find(n).unwrap()).collect()
    }

    #[test]
    fn test_dashboard_feed_reverses_last_five() {
        let activities: Vec<Activity> = (1..=6).map(act).collect();
        let html = dashboard_feed(&activities).to_html();

        // a1 fell off the end; the rest appear most-recent-first
        assert!(!html.contains("Batch 1"));
        let pos = positions(&html, &["Batch 6", "Batch 5", "Batch 4", "Batch 3", "Batch 2"]);
        assert!(pos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_analytics_feed_keeps_arrival_order() {
        let activities: Vec<Activity> = (1..=6).map(act).collect();
        let html = analytics_feed(&activities).to_html();

        assert!(!html.contains("Batch 1"));
        let pos = positions(&html, &["Batch 2", "Batch 3", "Batch 4", "Batch 5", "Batch 6"]);
        assert!(pos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_feed_renders_placeholder() {
        let html = dashboard_feed(&[]).to_html();
        assert!(html.contains("No recent activity"));
    }

    #[test]
    fn test_transfer_entry_shows_both_parties_and_price() {
        let mut a = act(1);
        a.kind = ActivityKind::Transfer;
        a.from_name = Some("Organic Farms Co.".to_string());
        a.to = Some("distributor_002".to_string());
        a.to_name = None; // falls back to the raw id
        a.price = Some(120.0);

        let html = analytics_feed(&[a]).to_html();
        assert!(html.contains("Organic Farms Co. transferred Batch 1 to distributor_002"));
        assert!(html.contains("$120"));
    }

    #[test]
    fn test_stats_panel_shows_all_counters() {
        let stats = SystemStats {
            total_products: 3,
            total_transactions: 12,
            total_quality_checks: 5,
            active_stakeholders: 5,
            avg_price_increase: 41.7,
            recent_activity: vec![],
        };
        let html = stats_panel(&stats).to_html();
        assert!(html.contains("3"));
        assert!(html.contains("12"));
        assert!(html.contains("41.7%"));
    }
}
