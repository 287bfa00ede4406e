use std::collections::BTreeMap;

use basket_common::{ProductId, Quantity};

use super::change_set::ChangeSet;

pub fn diff(
    old: &BTreeMap<ProductId, Quantity>,
    new: &BTreeMap<ProductId, Quantity>,
) -> ChangeSet {
    let mut cs = ChangeSet::default();

    for (&pid, &old_qty) in old {
        // A zero-quantity line in the old snapshot was never really present.
        if old_qty == 0 {
            if let Some(&new_qty) = new.get(&pid) {
                if new_qty > 0 {
                    cs.added.insert(pid, new_qty);
                    cs.newly_introduced.insert(pid);
                }
            }
            continue;
        }

        match new.get(&pid).copied() {
            None | Some(0) => {
                cs.removed.insert(pid, old_qty);
                cs.fully_removed.insert(pid);
            }
            Some(new_qty) if new_qty < old_qty => {
                cs.removed.insert(pid, old_qty - new_qty);
            }
            Some(new_qty) if new_qty > old_qty => {
                cs.added.insert(pid, new_qty - old_qty);
            }
            Some(_) => {}
        }
    }

    for (&pid, &new_qty) in new {
        if new_qty > 0 && !old.contains_key(&pid) {
            cs.added.insert(pid, new_qty);
            cs.newly_introduced.insert(pid);
        }
    }

    cs
}
