use fnv::FnvHashMap;
use tracing::{debug, trace};

use crate::combinations::combinations;
use crate::error::FpError;
use crate::item::{Label, Rank};
use crate::node::NodeId;
use crate::tree::FpTree;

impl<I: Label> FpTree<I> {
    /// Mines frequent patterns into the pattern store.
    ///
    /// Eligible items are those whose header count meets the support
    /// ceiling; their chains are walked least frequent first. Patterns
    /// already in the store (from a previous run without [`FpTree::reset`])
    /// are kept; the merge is idempotent because every recorded count is
    /// the exact number of transactions containing the pattern.
    pub(crate) fn mine_patterns(&mut self) -> Result<(), FpError> {
        if self.num_transactions == 0 {
            return Err(FpError::NoPatterns);
        }
        let support_count = (f64::from(self.num_transactions) * self.min_support).ceil() as u32;

        self.clear_read_counts();

        // Ascending rank order: most frequent first.
        let eligible = self.header.ranks_with_count_at_least(support_count);
        debug!(
            support_count,
            eligible = eligible.len(),
            transactions = self.num_transactions,
            "mining frequent patterns"
        );
        for rank in self.header.ranks() {
            if self.header.entry(rank).count == 0 {
                trace!(item = %self.header.label_of(rank), "item declared but never inserted");
            }
        }

        for &rank in &eligible {
            let count = self.header.entry(rank).count;
            self.patterns.record(vec![rank], count);
        }

        // Least frequent first, so each item's conditional pattern base is
        // taken before its ancestors appear as suffix items themselves.
        for &rank in eligible.iter().rev() {
            let found = self.extract_patterns(rank)?;
            for (pattern, count) in found {
                if count >= support_count {
                    self.patterns.record(pattern, count);
                }
            }
            // Restore full traversal counts for the next extraction; every
            // chain walk then observes exact, order-independent weights.
            self.clear_read_counts();
        }

        if self.patterns.is_empty() {
            return Err(FpError::NoPatterns);
        }
        debug!(
            patterns = self.patterns.len(),
            max_len = self.patterns.max_len(),
            "mining finished"
        );
        Ok(())
    }

    /// Walks `rank`'s header chain and aggregates the conditional patterns
    /// anchored at it: for each chain node, every subset of
    /// `[rank, ancestors…]` that begins with `rank`, weighted by the node's
    /// adjusted count at the time of its prefix walk.
    fn extract_patterns(&mut self, rank: Rank) -> Result<FnvHashMap<Vec<Rank>, u32>, FpError> {
        let mut found = FnvHashMap::default();
        let mut cursor = self.header.entry(rank).head;
        while let Some(id) = cursor {
            cursor = self.nodes[id].next;
            let (path, count) = self.prefix_path(id)?;
            let mut candidate = Vec::with_capacity(path.len() + 1);
            candidate.push(rank);
            candidate.extend(path);
            store_combinations(&mut found, count, &candidate);
        }
        Ok(found)
    }

    /// Collects the ancestor ranks of `id` from its parent up to, and
    /// excluding, the root, consuming the node's adjusted count along the
    /// way: the count is added to the node's own read count and to every
    /// ancestor's, so the same weight cannot be handed out twice within one
    /// extraction. Walking from the root, or pushing any read count past
    /// its traversal count, is an accounting violation.
    pub(crate) fn prefix_path(&mut self, id: NodeId) -> Result<(Vec<Rank>, u32), FpError> {
        if self.nodes[id].item.is_none() {
            return Err(FpError::AccountingViolation(
                "prefix walk started at the root".to_string(),
            ));
        }
        let take = self.nodes[id].adjusted();
        self.nodes[id].add_read(take)?;

        let mut path = Vec::new();
        let mut cursor = self.nodes[id].parent;
        while let Some(ancestor) = cursor {
            let node = &mut self.nodes[ancestor];
            let Some(item) = node.item else {
                break; // reached the root
            };
            node.add_read(take)?;
            path.push(item);
            cursor = node.parent;
        }
        Ok((path, take))
    }

    /// Zeroes every read count by walking each item's sibling chain.
    pub(crate) fn clear_read_counts(&mut self) {
        for rank in self.header.ranks() {
            let mut cursor = self.header.entry(rank).head;
            while let Some(id) = cursor {
                self.nodes[id].clear_read();
                cursor = self.nodes[id].next;
            }
        }
    }
}

/// Aggregates into `store` every subset of `items` that begins with
/// `items[0]`, at `count` apiece. `items` arrives in chain-walk order
/// (strictly descending rank); keys are reversed into the canonical
/// ascending order before counts are summed.
fn store_combinations(store: &mut FnvHashMap<Vec<Rank>, u32>, count: u32, items: &[Rank]) {
    if items.is_empty() {
        return;
    }
    let anchor = items[0];
    for mut subset in combinations(items) {
        if subset[0] != anchor {
            continue;
        }
        subset.reverse();
        *store.entry(subset).or_insert(0) += count;
    }
}
