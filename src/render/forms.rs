//! Static form markup for the register section
//!
//! Forms are chrome: the decision logic lives in the action handlers. The
//! register section still needs content when activated, so it renders the
//! input skeleton with the known stakeholders as farmer options.

use crate::model::StakeholderDirectory;
use crate::render::{el, Node};

pub fn register_form(directory: &StakeholderDirectory) -> Node {
    let snapshot = directory.snapshot();
    let mut ids: Vec<&String> = snapshot.keys().collect();
    ids.sort();

    el("form")
        .class("register-form")
        .child(field("name", "Product name"))
        .child(field("origin", "Origin"))
        .child(field("harvest_date", "Harvest date"))
        .child(field("quality", "Initial quality"))
        .child(
            el("select").attr("name", "farmer_id").children(ids.iter().map(|id| {
                el("option")
                    .attr("value", id.as_str())
                    .text(snapshot.get(*id).map(String::as_str).unwrap_or(id.as_str()))
            })),
        )
}

fn field(name: &'static str, label: &str) -> Node {
    el("label")
        .text(label)
        .child(el("input").attr("name", name))
}
