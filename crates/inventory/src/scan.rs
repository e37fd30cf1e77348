//! The scan protocol: one scan of a code at a location.

use stockscan_core::{
    InventoryRecord, Item, ItemCode, LedgerResult, LocationId, ScanEvent, Timestamp, WorkstationId,
};

/// Command: record a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordScan {
    pub item_code: ItemCode,
    pub location_id: LocationId,
    pub delta: i64,
    pub scanned_at: Timestamp,
    pub workstation: WorkstationId,
}

/// Rows a scan writes. The store applies them in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEffects {
    /// Set when the code has never been seen by this store.
    pub new_item: Option<Item>,
    pub record: InventoryRecord,
    pub event: ScanEvent,
}

/// Decide the effects of a scan given what the store currently holds.
pub fn plan_scan(
    cmd: &RecordScan,
    item_known: bool,
    existing: Option<&InventoryRecord>,
) -> ScanEffects {
    let new_item = (!item_known).then(|| Item::first_seen(cmd.item_code.clone(), cmd.scanned_at));

    let quantity = match existing {
        Some(record) => record.quantity.saturating_add(cmd.delta),
        None => cmd.delta,
    };

    ScanEffects {
        new_item,
        record: InventoryRecord {
            item_code: cmd.item_code.clone(),
            location_id: cmd.location_id.clone(),
            quantity,
            last_scanned: cmd.scanned_at,
        },
        event: ScanEvent::scan(
            cmd.item_code.clone(),
            cmd.location_id.clone(),
            cmd.delta,
            cmd.scanned_at,
            cmd.workstation.clone(),
        ),
    }
}

/// Parse a code list: one code per line, surrounding whitespace trimmed,
/// blank lines ignored. Duplicates are kept; each line is one scan.
pub fn parse_code_list(text: &str) -> LedgerResult<Vec<ItemCode>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(ItemCode::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn test_cmd(delta: i64) -> RecordScan {
        RecordScan {
            item_code: ItemCode::parse("012345678905").unwrap(),
            location_id: LocationId::parse("loc-a").unwrap(),
            delta,
            scanned_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            workstation: WorkstationId::parse("DESK-1").unwrap(),
        }
    }

    #[test]
    fn first_scan_creates_item_and_record() {
        let cmd = test_cmd(1);
        let effects = plan_scan(&cmd, false, None);

        let item = effects.new_item.expect("item created");
        assert_eq!(item.code, cmd.item_code);
        assert!(item.description.is_empty());
        assert_eq!(effects.record.quantity, 1);
        assert_eq!(effects.event.quantity_change, 1);
        assert_eq!(effects.event.action.as_str(), "scan");
    }

    #[test]
    fn repeat_scan_adds_delta_and_bumps_last_scanned() {
        let first = plan_scan(&test_cmd(1), false, None);
        let mut cmd = test_cmd(2);
        cmd.scanned_at = cmd.scanned_at + chrono::Duration::minutes(5);

        let second = plan_scan(&cmd, true, Some(&first.record));
        assert!(second.new_item.is_none());
        assert_eq!(second.record.quantity, 3);
        assert_eq!(second.record.last_scanned, cmd.scanned_at);
    }

    #[test]
    fn code_list_skips_blank_lines() {
        let codes = parse_code_list("012345678905\n\n  4006381333931  \r\n012345678905\n").unwrap();
        let codes: Vec<&str> = codes.iter().map(ItemCode::as_str).collect();
        assert_eq!(codes, ["012345678905", "4006381333931", "012345678905"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn quantity_equals_sum_of_deltas(deltas in prop::collection::vec(-50i64..50, 1..40)) {
            let mut record: Option<InventoryRecord> = None;
            let mut events = Vec::new();
            for delta in &deltas {
                let effects = plan_scan(&test_cmd(*delta), record.is_some(), record.as_ref());
                events.push(effects.event);
                record = Some(effects.record);
            }

            let total: i64 = deltas.iter().sum();
            prop_assert_eq!(record.map(|r| r.quantity), Some(total));
            prop_assert_eq!(events.iter().map(|e| e.quantity_change).sum::<i64>(), total);
        }
    }
}
