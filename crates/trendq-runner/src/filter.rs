//! Completion filtering: drop work whose output already exists.

use trendq_core::WorkItem;
use trendq_store::OutputStore;

/// Splits planned items into (still-to-fetch, already-present count).
///
/// Read-only against the store. A probe failure is logged and the item kept:
/// attempting the fetch and failing the write is strictly more informative
/// than silently dropping work. Filtering reflects store state at probe time;
/// a concurrently-completing external process is a documented race, not a
/// handled case.
pub(crate) async fn retain_missing(
    store: &dyn OutputStore,
    items: Vec<WorkItem>,
) -> (Vec<WorkItem>, usize) {
    let mut remaining = Vec::with_capacity(items.len());
    let mut skipped = 0usize;

    for item in items {
        match store.exists(&item.key).await {
            Ok(true) => {
                tracing::debug!(key = %item.key, "output already present — skipping");
                skipped += 1;
            }
            Ok(false) => remaining.push(item),
            Err(err) => {
                tracing::warn!(key = %item.key, error = %err, "completion probe failed — keeping item");
                remaining.push(item);
            }
        }
    }
    (remaining, skipped)
}

#[cfg(test)]
mod tests {
    use trendq_core::{DateRange, Keyword, MonthDate, WorkItem};
    use trendq_store::MemoryStore;

    use super::*;

    fn item(name: &str) -> WorkItem {
        let range = DateRange {
            start: MonthDate::new(2010, 1).unwrap(),
            end: MonthDate::new(2010, 3).unwrap(),
        };
        WorkItem::new(Keyword::new(name), range, None)
    }

    #[tokio::test]
    async fn drops_only_items_with_existing_output() {
        let store = MemoryStore::new();
        let done = item("alpha");
        store.seed(&done.key);

        let (remaining, skipped) =
            retain_missing(&store, vec![done, item("beta"), item("gamma")]).await;
        assert_eq!(skipped, 1);
        let names: Vec<&str> = remaining
            .iter()
            .map(|i| i.keyword.display_name())
            .collect();
        assert_eq!(names, vec!["beta", "gamma"]);
    }

    #[tokio::test]
    async fn empty_store_keeps_everything() {
        let store = MemoryStore::new();
        let (remaining, skipped) = retain_missing(&store, vec![item("alpha")]).await;
        assert_eq!(skipped, 0);
        assert_eq!(remaining.len(), 1);
    }
}
