use fnv::FnvHashMap;

use crate::error::FpError;
use crate::item::{Label, Rank};
use crate::node::NodeId;

/// Per-rank bookkeeping: the aggregate transaction count and the ends of the
/// sibling chain linking every tree node that carries the rank.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderEntry {
    /// Number of transactions containing the item. Equals the sum of the
    /// traversal counts over the sibling chain.
    pub(crate) count: u32,
    pub(crate) head: Option<NodeId>,
    pub(crate) tail: Option<NodeId>,
}

/// Two-way mapping between item labels and their dense frequency ranks,
/// carrying one [`HeaderEntry`] per rank.
#[derive(Debug, Clone)]
pub(crate) struct HeaderIndex<I> {
    rank_of: FnvHashMap<I, Rank>,
    labels: Vec<I>,
    entries: Vec<HeaderEntry>,
}

impl<I: Label> HeaderIndex<I> {
    /// Assigns rank `i` (1-based) to the `i`-th item of the ranking.
    pub(crate) fn from_ranking<T>(ranking: T) -> Result<HeaderIndex<I>, FpError>
    where
        T: IntoIterator<Item = I>,
    {
        let mut rank_of = FnvHashMap::default();
        let mut labels = Vec::new();
        for item in ranking {
            let rank = Rank::with_id(labels.len() as u32 + 1);
            if rank_of.insert(item.clone(), rank).is_some() {
                return Err(FpError::InvalidConfiguration(format!(
                    "duplicate item in ranking: {}",
                    item
                )));
            }
            labels.push(item);
        }
        if labels.is_empty() {
            return Err(FpError::InvalidConfiguration(
                "item ranking is empty".to_string(),
            ));
        }
        let entries = vec![HeaderEntry::default(); labels.len()];
        Ok(HeaderIndex {
            rank_of,
            labels,
            entries,
        })
    }

    pub(crate) fn rank_of(&self, item: &I) -> Option<Rank> {
        self.rank_of.get(item).copied()
    }

    pub(crate) fn label_of(&self, rank: Rank) -> &I {
        &self.labels[rank.as_index()]
    }

    pub(crate) fn entry(&self, rank: Rank) -> &HeaderEntry {
        &self.entries[rank.as_index()]
    }

    pub(crate) fn entry_mut(&mut self, rank: Rank) -> &mut HeaderEntry {
        &mut self.entries[rank.as_index()]
    }

    /// Number of distinct items, which is also the lowest (least frequent)
    /// rank.
    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    /// All ranks in ascending order (most frequent first).
    pub(crate) fn ranks(&self) -> impl Iterator<Item = Rank> {
        (1..=self.len() as u32).map(Rank::with_id)
    }

    /// Ranks whose aggregate count meets `min_count`, ascending.
    pub(crate) fn ranks_with_count_at_least(&self, min_count: u32) -> Vec<Rank> {
        self.ranks()
            .filter(|&rank| self.entry(rank).count >= min_count)
            .collect()
    }
}
