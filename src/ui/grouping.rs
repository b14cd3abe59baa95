//! Presentation-only partitioning of the fetched list.
use super::mode::GroupMode;
use crate::types::LogEntry;
use chrono::{Local, NaiveDate, TimeZone};

/// Bucket label for entries without a usable `metadata.category`.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A labeled run of entries. `label` is `None` only in `GroupMode::None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGroup<'a> {
    pub label: Option<String>,
    pub entries: Vec<&'a LogEntry>,
}

#[derive(PartialEq)]
enum GroupKey<'a> {
    Day(NaiveDate),
    Category(&'a str),
}

/// Groups entries using the local time zone for date buckets.
pub fn group_entries(entries: &[LogEntry], mode: GroupMode) -> Vec<LogGroup<'_>> {
    group_entries_in(entries, mode, &Local)
}

/// Groups entries into buckets ordered by first appearance.
///
/// This is a stable partition: inside a bucket entries keep their order in
/// `entries`.
pub fn group_entries_in<'a, Tz: TimeZone>(
    entries: &'a [LogEntry],
    mode: GroupMode,
    tz: &Tz,
) -> Vec<LogGroup<'a>> {
    if mode == GroupMode::None {
        return vec![LogGroup {
            label: None,
            entries: entries.iter().collect(),
        }];
    }

    let mut buckets: Vec<(GroupKey<'a>, LogGroup<'a>)> = Vec::new();

    for entry in entries {
        let (key, label) = match mode {
            GroupMode::ByDate => {
                let local = entry.created_at.with_timezone(tz);
                let day = local.date_naive();
                (GroupKey::Day(day), day.format("%a %d %b %Y").to_string())
            }
            GroupMode::ByCategory => {
                let category = entry.category().unwrap_or(UNCATEGORIZED);
                (GroupKey::Category(category), category.to_string())
            }
            GroupMode::None => unreachable!("handled above"),
        };

        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.entries.push(entry),
            None => buckets.push((
                key,
                LogGroup {
                    label: Some(label),
                    entries: vec![entry],
                },
            )),
        }
    }

    buckets.into_iter().map(|(_, group)| group).collect()
}
