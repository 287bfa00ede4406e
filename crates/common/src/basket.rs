use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ProductId = i32;
pub type Quantity = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl BasketLine {
    pub fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A buyer's basket as held by the store. Lines are unique by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBasket {
    pub buyer_id: String,
    #[serde(default)]
    pub items: Vec<BasketLine>,
}

impl CustomerBasket {
    pub fn empty(buyer_id: impl Into<String>) -> Self {
        Self {
            buyer_id: buyer_id.into(),
            items: Vec::new(),
        }
    }

    /// Builds a basket from a product -> quantity mapping, dropping
    /// zero-quantity entries.
    pub fn from_quantities(
        buyer_id: impl Into<String>,
        quantities: &BTreeMap<ProductId, Quantity>,
    ) -> Self {
        let items = quantities
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(pid, qty)| BasketLine::new(*pid, *qty))
            .collect();
        Self {
            buyer_id: buyer_id.into(),
            items,
        }
    }

    /// Collapses lines into a mapping. When a product appears more than
    /// once the last line wins.
    pub fn quantities(&self) -> BTreeMap<ProductId, Quantity> {
        collect_quantities(&self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|l| l.quantity == 0)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

pub fn collect_quantities(lines: &[BasketLine]) -> BTreeMap<ProductId, Quantity> {
    lines
        .iter()
        .map(|l| (l.product_id, l.quantity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_quantities_drops_zero_lines() {
        let mut q = BTreeMap::new();
        q.insert(1, 2);
        q.insert(2, 0);
        let basket = CustomerBasket::from_quantities("u1", &q);
        assert_eq!(basket.items, vec![BasketLine::new(1, 2)]);
    }

    #[test]
    fn duplicate_lines_last_wins() {
        let basket = CustomerBasket {
            buyer_id: "u1".into(),
            items: vec![BasketLine::new(7, 1), BasketLine::new(7, 4)],
        };
        assert_eq!(basket.quantities().get(&7), Some(&4));
    }

    #[test]
    fn zero_only_basket_reads_as_empty() {
        let basket = CustomerBasket {
            buyer_id: "u1".into(),
            items: vec![BasketLine::new(3, 0)],
        };
        assert!(basket.is_empty());
        assert!(CustomerBasket::empty("u1").is_empty());
    }

    #[test]
    fn missing_items_field_deserializes_empty() {
        let basket: CustomerBasket = serde_json::from_str(r#"{"buyer_id":"u1"}"#).unwrap();
        assert!(basket.items.is_empty());
    }
}
