//! Product grid renderer

use crate::model::ProductSummary;
use crate::render::{el, empty_state, Node};

/// One card per product, in server-supplied order
///
/// An empty list renders the "No products found" placeholder, never an empty
/// container.
pub fn product_grid(products: &[ProductSummary]) -> Node {
    if products.is_empty() {
        return empty_state("No products found");
    }

    el("div")
        .class("product-grid")
        .children(products.iter().map(product_card))
}

fn product_card(product: &ProductSummary) -> Node {
    el("div")
        .class("product-card")
        .attr("data-product-id", &product.id)
        .child(el("h3").text(&product.name))
        .child(el("p").class("product-id").text(&product.id))
        .child(labeled("Origin", &product.origin))
        .child(labeled("Harvested", &product.harvest_date))
        .child(labeled("Owner", &product.current_owner))
        .child(
            el("span")
                .class("badge")
                .text(format!("{} transactions", product.transaction_count)),
        )
}

fn labeled(label: &str, value: &str) -> Node {
    el("p")
        .child(el("strong").text(format!("{}: ", label)))
        .child(crate::render::text(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, name: &str) -> ProductSummary {
        ProductSummary {
            id: id.to_string(),
            name: name.to_string(),
            origin: "Sunny Valley Farm, California".to_string(),
            harvest_date: "2024-01-15".to_string(),
            current_owner: "Organic Farms Co.".to_string(),
            current_owner_id: "farmer_001".to_string(),
            transaction_count: 4,
        }
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let html = product_grid(&[]).to_html();
        assert!(html.contains("No products found"));
        assert!(!html.contains("product-grid"));
    }

    #[test]
    fn test_cards_preserve_server_order() {
        let products = vec![summary("PROD_000002", "Eggs"), summary("PROD_000001", "Tomatoes")];
        let html = product_grid(&products).to_html();
        let eggs = html.find("Eggs").unwrap();
        let tomatoes = html.find("Tomatoes").unwrap();
        assert!(eggs < tomatoes);
    }

    #[test]
    fn test_product_name_is_escaped() {
        let products = vec![summary("PROD_000001", "<script>x</script>")];
        let html = product_grid(&products).to_html();
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
