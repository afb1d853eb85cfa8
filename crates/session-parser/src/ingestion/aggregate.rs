//! Summary statistics over extracted records

use std::collections::BTreeMap;

use crate::types::{DateRange, ScheduleRecord, ScheduleSummary};

/// Derive groups, per-group counts and the covered date range
pub fn summarize(records: &[ScheduleRecord]) -> ScheduleSummary {
    let mut items_by_group: BTreeMap<String, usize> = BTreeMap::new();
    for group in records.iter().filter_map(|r| r.group.as_ref()) {
        *items_by_group.entry(group.clone()).or_default() += 1;
    }

    // ISO dates order lexicographically
    let dates = records.iter().filter_map(|r| r.date.as_deref());
    let date_range = DateRange {
        from: dates.clone().min().map(String::from),
        to: dates.max().map(String::from),
    };

    ScheduleSummary {
        items: records.len(),
        groups: items_by_group.keys().cloned().collect(),
        items_by_group,
        date_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordFields, RecordSource};

    fn record(group: Option<&str>, date: Option<&str>) -> ScheduleRecord {
        ScheduleRecord::new(
            RecordFields {
                group: group.map(String::from),
                date: date.map(String::from),
                ..Default::default()
            },
            RecordSource { sheet: "Лист2".to_string(), row: 2 },
        )
    }

    #[test]
    fn test_summary() {
        let records = vec![
            record(Some("A"), Some("2024-01-10")),
            record(Some("A"), Some("2024-01-05")),
            record(Some("B"), None),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.items, 3);
        assert_eq!(summary.groups, vec!["A", "B"]);
        assert_eq!(summary.items_by_group.get("A"), Some(&2));
        assert_eq!(summary.items_by_group.get("B"), Some(&1));
        assert_eq!(summary.date_range.from.as_deref(), Some("2024-01-05"));
        assert_eq!(summary.date_range.to.as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn test_groupless_records_are_counted_in_items_only() {
        let summary = summarize(&[record(None, None), record(Some("B"), None)]);
        assert_eq!(summary.items, 2);
        assert_eq!(summary.groups, vec!["B"]);
        assert_eq!(summary.items_by_group.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[]);
        assert_eq!(summary.items, 0);
        assert!(summary.groups.is_empty());
        assert!(summary.items_by_group.is_empty());
        assert_eq!(summary.date_range, DateRange::default());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["dateRange"], serde_json::json!({"from": null, "to": null}));
    }
}
