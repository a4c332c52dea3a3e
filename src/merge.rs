//! Table plumbing for the settings layers.

use toml::{Table, Value};

/// Lay `overlay` over `base`. Tables present on both sides merge key by key;
/// for anything else the overlay's value replaces the base's.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Table(below)), Value::Table(above)) => {
                Value::Table(deep_merge(below, above))
            }
            (_, above) => above,
        };
        base.insert(key, merged);
    }
    base
}

/// Set `value` at the path `segments` (e.g. `["cache", "template_dir"]`),
/// creating intermediate tables. A scalar in the way is replaced by a table.
pub fn insert_path(table: &mut Table, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            table.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = table
                .entry(head.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            if !slot.is_table() {
                *slot = Value::Table(Table::new());
            }
            if let Value::Table(sub) = slot {
                insert_path(sub, rest, value);
            }
        }
    }
}

/// Convert `("cache.template_dir", value)` pairs into one nested table.
/// Later entries for the same key win.
pub fn dotted_to_table(entries: &[(String, Value)]) -> Table {
    let mut table = Table::new();
    for (key, value) in entries {
        let segments: Vec<&str> = key.split('.').collect();
        insert_path(&mut table, &segments, value.clone());
    }
    table
}
