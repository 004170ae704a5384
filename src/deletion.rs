//! Deletion set builder
//!
//! Deleting a primary file must also delete every artifact derived from it.
//! The closure is computed here, exclusively through the naming resolver, and
//! may name keys that were never produced; the store boundary ignores those.

use std::collections::HashSet;

use crate::catalog::CatalogItem;
use crate::naming::NamingResolver;

/// Complete, de-duplicated set of keys to delete for the given items.
/// Order is stable: each item's primary key first, then its derived keys in
/// convention order.
pub fn build_deletion_keys<'a>(
    items: impl IntoIterator<Item = &'a CatalogItem>,
    resolver: &NamingResolver,
) -> Vec<String> {
    let mut keys = Vec::new();
    let mut seen = HashSet::new();
    for item in items {
        push_unique(&mut keys, &mut seen, item.key.clone());
        for derived in resolver.derived_keys(&item.name, item.kind).keys() {
            push_unique(&mut keys, &mut seen, derived);
        }
    }
    keys
}

fn push_unique(keys: &mut Vec<String>, seen: &mut HashSet<String>, key: String) {
    if seen.insert(key.clone()) {
        keys.push(key);
    }
}
