use std::collections::{BTreeMap, BTreeSet};

use basket_common::{ProductId, Quantity};

/// What moved between two snapshots of one basket.
///
/// `added` and `removed` hold positive deltas. A product in
/// `newly_introduced` has its full quantity in `added`; a product in
/// `fully_removed` has its full previous quantity in `removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: BTreeMap<ProductId, Quantity>,
    pub removed: BTreeMap<ProductId, Quantity>,
    pub newly_introduced: BTreeSet<ProductId>,
    pub fully_removed: BTreeSet<ProductId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn total_added(&self) -> u64 {
        self.added.values().map(|q| *q as u64).sum()
    }

    pub fn total_removed(&self) -> u64 {
        self.removed.values().map(|q| *q as u64).sum()
    }

    /// Removals that leave the product in the basket.
    pub fn partial_removals(&self) -> impl Iterator<Item = (ProductId, Quantity)> + '_ {
        self.removed
            .iter()
            .filter(|(pid, _)| !self.fully_removed.contains(*pid))
            .map(|(pid, q)| (*pid, *q))
    }

    /// Increases on products that were already present.
    pub fn partial_additions(&self) -> impl Iterator<Item = (ProductId, Quantity)> + '_ {
        self.added
            .iter()
            .filter(|(pid, _)| !self.newly_introduced.contains(*pid))
            .map(|(pid, q)| (*pid, *q))
    }
}
