use fnv::FnvHashSet;

use crate::item::Rank;

/// Exact inverted index over inserted transactions, used by tests to
/// cross-check mined pattern counts. Each rank maps to the set of ids of
/// the transactions containing it.
pub(crate) struct TidIndex {
    tids_of: Vec<FnvHashSet<usize>>,
    transaction_count: usize,
}

impl TidIndex {
    pub(crate) fn new() -> TidIndex {
        TidIndex {
            tids_of: Vec::new(),
            transaction_count: 0,
        }
    }

    pub(crate) fn insert(&mut self, transaction: &[Rank]) {
        let tid = self.transaction_count;
        self.transaction_count += 1;
        for rank in transaction {
            let slot = rank.as_index();
            if self.tids_of.len() <= slot {
                self.tids_of.resize_with(slot + 1, FnvHashSet::default);
            }
            self.tids_of[slot].insert(tid);
        }
    }

    /// Number of transactions containing every rank of `pattern`.
    pub(crate) fn count(&self, pattern: &[Rank]) -> u32 {
        let Some(sets) = pattern
            .iter()
            .map(|rank| self.tids_of.get(rank.as_index()))
            .collect::<Option<Vec<_>>>()
        else {
            return 0; // some rank was never inserted at all
        };
        // Scanning the rarest item's transactions keeps the membership
        // probes to a minimum; an empty pattern has no rarest item.
        let Some(rarest) = sets.iter().min_by_key(|tids| tids.len()) else {
            return 0;
        };
        rarest
            .iter()
            .filter(|&tid| sets.iter().all(|tids| tids.contains(tid)))
            .count() as u32
    }

    pub(crate) fn support(&self, pattern: &[Rank]) -> f64 {
        if self.transaction_count == 0 {
            return 0.0;
        }
        f64::from(self.count(pattern)) / self.transaction_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::TidIndex;
    use crate::item::Rank;

    fn ranks(ids: &[u32]) -> Vec<Rank> {
        ids.iter().map(|&id| Rank::with_id(id)).collect()
    }

    #[test]
    fn counts_single_items_and_intersections() {
        let mut index = TidIndex::new();
        let transactions = [
            ranks(&[1, 2, 3]),
            ranks(&[1, 2]),
            ranks(&[2, 3]),
            ranks(&[1, 2, 3]),
            ranks(&[3]),
        ];
        for t in &transactions {
            index.insert(t);
        }

        assert_eq!(index.count(&ranks(&[1])), 3);
        assert_eq!(index.count(&ranks(&[2])), 4);
        assert_eq!(index.count(&ranks(&[3])), 4);
        assert_eq!(index.count(&ranks(&[1, 2])), 3);
        assert_eq!(index.count(&ranks(&[1, 3])), 2);
        assert_eq!(index.count(&ranks(&[1, 2, 3])), 2);
        assert_eq!(index.count(&ranks(&[4])), 0);
        assert_eq!(index.count(&[]), 0);
        assert_eq!(index.support(&ranks(&[2])), 4.0 / 5.0);
    }
}
