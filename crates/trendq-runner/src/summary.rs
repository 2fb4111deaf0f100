//! Per-run outcome accounting.

use std::fmt;

use serde::Serialize;

use trendq_core::OutputKey;

/// Why an item was given up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonKind {
    /// Transient fetch errors exhausted their retries.
    Transient,
    /// The portal rejected the query itself; retrying cannot help.
    Permanent,
    /// The result was fetched but could not be persisted.
    Storage,
}

impl fmt::Display for AbandonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbandonKind::Transient => f.write_str("transient"),
            AbandonKind::Permanent => f.write_str("permanent"),
            AbandonKind::Storage => f.write_str("storage"),
        }
    }
}

/// One abandoned work item, identified by its output key so a re-run can be
/// audited against the still-missing files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbandonedItem {
    pub key: OutputKey,
    pub kind: AbandonKind,
    pub reason: String,
}

/// Counts of every outcome kind for one invocation.
///
/// Mutated only by the coordinator; returned even on partial failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Items fetched and persisted.
    pub fetched: usize,
    /// Items dropped because their output already existed.
    pub skipped: usize,
    /// Items abandoned after exhausting transient retries.
    pub abandoned_transient: usize,
    /// Items abandoned because the portal rejected the query.
    pub abandoned_permanent: usize,
    /// Items fetched but not persisted due to a storage failure.
    pub abandoned_storage: usize,
    /// Items never attempted (cancellation or session abort).
    pub not_attempted: usize,
    /// Every abandoned item, in plan order.
    pub abandoned: Vec<AbandonedItem>,
}

impl RunSummary {
    pub(crate) fn record_abandoned(&mut self, key: OutputKey, kind: AbandonKind, reason: String) {
        match kind {
            AbandonKind::Transient => self.abandoned_transient += 1,
            AbandonKind::Permanent => self.abandoned_permanent += 1,
            AbandonKind::Storage => self.abandoned_storage += 1,
        }
        self.abandoned.push(AbandonedItem { key, kind, reason });
    }

    /// Items that produced any terminal outcome this run.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.fetched + self.abandoned_transient + self.abandoned_permanent + self.abandoned_storage
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "fetched: {}, skipped: {}, abandoned (transient/permanent/storage): {}/{}/{}, not attempted: {}",
            self.fetched,
            self.skipped,
            self.abandoned_transient,
            self.abandoned_permanent,
            self.abandoned_storage,
            self.not_attempted,
        )?;
        for item in &self.abandoned {
            writeln!(f, "  abandoned [{}] {}: {}", item.kind, item.key, item.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use trendq_core::{DateRange, MonthDate, OutputKey};

    use super::*;

    #[test]
    fn abandoned_items_are_counted_by_kind() {
        let range = DateRange {
            start: MonthDate::new(2010, 1).unwrap(),
            end: MonthDate::new(2010, 3).unwrap(),
        };
        let key = OutputKey::derive("tesla", None, &range);

        let mut summary = RunSummary::default();
        summary.record_abandoned(key.clone(), AbandonKind::Transient, "timeout".to_owned());
        summary.record_abandoned(key, AbandonKind::Permanent, "bad category".to_owned());

        assert_eq!(summary.abandoned_transient, 1);
        assert_eq!(summary.abandoned_permanent, 1);
        assert_eq!(summary.abandoned.len(), 2);
        assert_eq!(summary.attempted(), 2);
    }

    #[test]
    fn display_lists_abandoned_keys() {
        let range = DateRange {
            start: MonthDate::new(2010, 1).unwrap(),
            end: MonthDate::new(2010, 3).unwrap(),
        };
        let mut summary = RunSummary {
            fetched: 3,
            ..RunSummary::default()
        };
        summary.record_abandoned(
            OutputKey::derive("tesla", None, &range),
            AbandonKind::Transient,
            "timeout".to_owned(),
        );
        let rendered = summary.to_string();
        assert!(rendered.contains("fetched: 3"));
        assert!(rendered.contains("tesla_all_2010-01~2010-03"));
    }
}
