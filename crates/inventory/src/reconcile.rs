//! Per-entity conflict rules applied when a snapshot is imported into a store.
//!
//! Each rule looks at the stored row (if any) and the incoming row and decides
//! what the store must do. Rules never touch storage themselves.

use stockscan_core::{InventoryRecord, Item, Location};

/// How an import resolves rows that already exist in the target store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportMode {
    /// Additive quantities, newest-wins descriptions, existing locations kept.
    Merge,
    /// Incoming rows overwrite stored rows with the same identity.
    Replace,
}

/// Outcome of reconciling one incoming row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// No stored row with this identity: write the value as a new row.
    Insert(T),
    /// Stored row exists: write this value over it.
    Overwrite(T),
    /// Stored row exists and stays as it is.
    Keep,
    /// Incoming row is rejected.
    Skip(String),
}

impl<T> Resolution<T> {
    /// The row to write, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Resolution::Insert(v) | Resolution::Overwrite(v) => Some(v),
            Resolution::Keep | Resolution::Skip(_) => None,
        }
    }
}

/// Locations: merge inserts unknown ids only, replace overwrites by id.
///
/// `by_id` is the stored location with the incoming id, `by_name` the stored
/// location currently holding the incoming name.
///
/// In merge mode an unknown id whose name is already taken by another location
/// is skipped, since names are unique within a store. In replace mode the
/// store displaces the other holder of the name.
pub fn reconcile_location(
    mode: ImportMode,
    by_id: Option<&Location>,
    by_name: Option<&Location>,
    incoming: Location,
) -> Resolution<Location> {
    match (mode, by_id) {
        (ImportMode::Merge, Some(_)) => Resolution::Keep,
        (ImportMode::Merge, None) => match by_name {
            Some(holder) if holder.id != incoming.id => Resolution::Skip(format!(
                "location name {:?} is held by {}",
                incoming.name, holder.id
            )),
            _ => Resolution::Insert(incoming),
        },
        (ImportMode::Replace, Some(_)) => Resolution::Overwrite(incoming),
        (ImportMode::Replace, None) => Resolution::Insert(incoming),
    }
}

/// Items: merge keeps the stored row unless the incoming one was updated
/// strictly later; replace takes the incoming row as is.
///
/// A merged overwrite keeps the stored `created_at`.
pub fn reconcile_item(mode: ImportMode, existing: Option<&Item>, incoming: Item) -> Resolution<Item> {
    let Some(existing) = existing else {
        return Resolution::Insert(incoming);
    };

    match mode {
        ImportMode::Replace => Resolution::Overwrite(incoming),
        ImportMode::Merge if incoming.updated_at > existing.updated_at => Resolution::Overwrite(Item {
            created_at: existing.created_at,
            ..incoming
        }),
        ImportMode::Merge => Resolution::Keep,
    }
}

/// Inventory records: merge adds quantities and keeps the later scan time;
/// replace takes the incoming row as is.
pub fn reconcile_record(
    mode: ImportMode,
    existing: Option<&InventoryRecord>,
    incoming: InventoryRecord,
) -> Resolution<InventoryRecord> {
    let Some(existing) = existing else {
        return Resolution::Insert(incoming);
    };

    match mode {
        ImportMode::Replace => Resolution::Overwrite(incoming),
        ImportMode::Merge => Resolution::Overwrite(InventoryRecord {
            quantity: existing.quantity.saturating_add(incoming.quantity),
            last_scanned: existing.last_scanned.max(incoming.last_scanned),
            ..incoming
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use stockscan_core::{Attributes, ItemCode, LocationId, Timestamp};

    fn t(secs: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn test_location(id: &str, name: &str) -> Location {
        Location {
            id: LocationId::parse(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            created_at: t(0),
        }
    }

    fn test_item(description: &str, created: i64, updated: i64) -> Item {
        Item {
            code: ItemCode::parse("012345678905").unwrap(),
            description: description.to_string(),
            attributes: Attributes::default(),
            created_at: t(created),
            updated_at: t(updated),
        }
    }

    fn test_record(quantity: i64, scanned: i64) -> InventoryRecord {
        InventoryRecord {
            item_code: ItemCode::parse("012345678905").unwrap(),
            location_id: LocationId::parse("loc-a").unwrap(),
            quantity,
            last_scanned: t(scanned),
        }
    }

    #[test]
    fn merge_keeps_known_locations() {
        let stored = test_location("loc-a", "Warehouse");
        let incoming = test_location("loc-a", "Renamed");
        let res = reconcile_location(ImportMode::Merge, Some(&stored), Some(&stored), incoming);
        assert_eq!(res, Resolution::Keep);
    }

    #[test]
    fn merge_skips_location_whose_name_is_taken() {
        let stored = test_location("loc-a", "Warehouse");
        let incoming = test_location("loc-b", "Warehouse");
        let res = reconcile_location(ImportMode::Merge, None, Some(&stored), incoming);
        assert!(matches!(res, Resolution::Skip(_)));
    }

    #[test]
    fn replace_overwrites_locations_by_id() {
        let stored = test_location("loc-a", "Warehouse");
        let incoming = test_location("loc-a", "Back room");
        let res = reconcile_location(ImportMode::Replace, Some(&stored), None, incoming.clone());
        assert_eq!(res, Resolution::Overwrite(incoming));

        let fresh = test_location("loc-b", "Warehouse");
        let res = reconcile_location(ImportMode::Replace, None, Some(&stored), fresh.clone());
        assert_eq!(res, Resolution::Insert(fresh));
    }

    #[test]
    fn merge_item_newer_wins_and_keeps_created_at() {
        let stored = test_item("old", 0, 10);
        let incoming = test_item("new", 5, 20);
        match reconcile_item(ImportMode::Merge, Some(&stored), incoming) {
            Resolution::Overwrite(item) => {
                assert_eq!(item.description, "new");
                assert_eq!(item.created_at, t(0));
                assert_eq!(item.updated_at, t(20));
            }
            other => panic!("expected overwrite, got {other:?}"),
        }
    }

    #[test]
    fn merge_item_equal_timestamps_keep_stored_row() {
        let stored = test_item("stored", 0, 10);
        let incoming = test_item("incoming", 0, 10);
        assert_eq!(reconcile_item(ImportMode::Merge, Some(&stored), incoming), Resolution::Keep);
    }

    #[test]
    fn replace_item_takes_incoming_even_if_older() {
        let stored = test_item("stored", 0, 10);
        let incoming = test_item("older", 0, 1);
        assert_eq!(
            reconcile_item(ImportMode::Replace, Some(&stored), incoming.clone()),
            Resolution::Overwrite(incoming)
        );
    }

    #[test]
    fn merge_record_adds_quantities_and_keeps_latest_scan() {
        let stored = test_record(3, 50);
        let incoming = test_record(4, 20);
        match reconcile_record(ImportMode::Merge, Some(&stored), incoming) {
            Resolution::Overwrite(rec) => {
                assert_eq!(rec.quantity, 7);
                assert_eq!(rec.last_scanned, t(50));
            }
            other => panic!("expected overwrite, got {other:?}"),
        }
    }

    #[test]
    fn merge_record_saturates_instead_of_overflowing() {
        let stored = test_record(i64::MAX, 0);
        let incoming = test_record(1, 0);
        let res = reconcile_record(ImportMode::Merge, Some(&stored), incoming);
        assert_eq!(res.value().map(|r| r.quantity), Some(i64::MAX));
    }

    #[test]
    fn replace_record_takes_incoming_quantity() {
        let stored = test_record(10, 50);
        let incoming = test_record(3, 20);
        assert_eq!(
            reconcile_record(ImportMode::Replace, Some(&stored), incoming.clone()),
            Resolution::Overwrite(incoming)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn item_merge_converges_in_either_order(a in 0i64..10_000, b in 0i64..10_000) {
            let x = test_item("x", 0, a);
            let y = test_item("y", 0, b);

            let winner = |stored: &Item, incoming: &Item| -> Item {
                match reconcile_item(ImportMode::Merge, Some(stored), incoming.clone()) {
                    Resolution::Overwrite(item) => item,
                    _ => stored.clone(),
                }
            };

            let xy = winner(&x, &y);
            let yx = winner(&y, &x);
            prop_assert_eq!(xy.updated_at, t(a.max(b)));
            prop_assert_eq!(yx.updated_at, t(a.max(b)));
            if a != b {
                prop_assert_eq!(xy, yx);
            }
        }

        #[test]
        fn record_merge_is_commutative(qa in -1_000i64..1_000, qb in -1_000i64..1_000, sa in 0i64..1_000, sb in 0i64..1_000) {
            let a = test_record(qa, sa);
            let b = test_record(qb, sb);

            let ab = reconcile_record(ImportMode::Merge, Some(&a), b.clone());
            let ba = reconcile_record(ImportMode::Merge, Some(&b), a.clone());
            prop_assert_eq!(ab.value().map(|r| r.quantity), Some(qa + qb));
            prop_assert_eq!(ab.value(), ba.value());
        }

        #[test]
        fn location_merge_is_idempotent(id in "[a-z]{1,8}", name in "[A-Za-z ]{1,12}") {
            let loc = test_location(&id, &name);
            let first = reconcile_location(ImportMode::Merge, None, None, loc.clone());
            prop_assert_eq!(first, Resolution::Insert(loc.clone()));
            let second = reconcile_location(ImportMode::Merge, Some(&loc), Some(&loc), loc.clone());
            prop_assert_eq!(second, Resolution::Keep);
        }
    }
}
