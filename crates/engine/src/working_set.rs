use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::{MoneyCents, members::Username, split::SplitSeed};

/// One expense as held in the locally accumulated list.
#[derive(Clone, Debug)]
pub struct ExpenseRecord {
    pub id: i64,
    pub amount: MoneyCents,
    pub description: String,
    pub paid_by: Username,
    /// Missing dates sort as epoch 0, i.e. to the very end of the list.
    pub date: Option<DateTime<FixedOffset>>,
    pub splits: Vec<SplitSeed>,
}

impl ExpenseRecord {
    fn sort_key(&self) -> i64 {
        self.date.map(|date| date.timestamp_millis()).unwrap_or(0)
    }
}

/// The deduplicated, date-descending accumulation of fetched expense pages
/// for the currently displayed group.
///
/// Grows by merging pages; resets whenever the group context changes or a
/// submission succeeded, so the view reflects authoritative state rather
/// than a stale local merge. Out-of-order page completions merge
/// idempotently by id and cannot corrupt the set.
#[derive(Clone, Debug)]
pub struct ExpenseWorkingSet {
    page_size: usize,
    next_page: u32,
    has_more: bool,
    entries: Vec<ExpenseRecord>,
}

impl ExpenseWorkingSet {
    /// An empty set expecting pages of `page_size` items.
    ///
    /// The page size is deployment configuration (20 or 5 today) and drives
    /// the last-page detection below.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            next_page: 0,
            has_more: true,
            entries: Vec::new(),
        }
    }

    /// Merges one fetched page into the set.
    ///
    /// Entries are deduplicated by id with the most recently merged
    /// occurrence winning, then stably sorted by date descending so ties
    /// keep their arrival order. A page with strictly fewer items than the
    /// page size is the last one.
    pub fn merge(&mut self, page: Vec<ExpenseRecord>) {
        self.has_more = page.len() >= self.page_size;
        self.next_page = self.next_page.saturating_add(1);

        let mut combined = std::mem::take(&mut self.entries);
        combined.extend(page);

        let mut index_by_id: HashMap<i64, usize> = HashMap::new();
        let mut deduped: Vec<ExpenseRecord> = Vec::with_capacity(combined.len());
        for record in combined {
            match index_by_id.get(&record.id) {
                Some(&at) => deduped[at] = record,
                None => {
                    index_by_id.insert(record.id, deduped.len());
                    deduped.push(record);
                }
            }
        }

        deduped.sort_by_key(|record| std::cmp::Reverse(record.sort_key()));
        self.entries = deduped;
    }

    /// Clears the set and restarts paging from the first page.
    pub fn reset(&mut self) {
        self.next_page = 0;
        self.has_more = true;
        self.entries.clear();
    }

    /// The 0-based index of the next page to fetch.
    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// False once a short page marked the end of the server-side list.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn entries(&self) -> &[ExpenseRecord] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&ExpenseRecord> {
        self.entries.iter().find(|record| record.id == id)
    }
}
