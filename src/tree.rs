use crate::error::FpError;
use crate::header::HeaderIndex;
use crate::item::{Label, Rank};
use crate::node::{Node, NodeId, ROOT};
use crate::patterns::PatternStore;

const DEFAULT_MIN_SUPPORT: f64 = 0.1;
const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;

/// A frequent-pattern tree over a fixed item ranking.
///
/// The tree is built once from the global item-frequency ranking, filled by
/// repeated [`insert`](FpTree::insert) calls, and mined with
/// [`association_rules`](FpTree::association_rules). Mining can be repeated
/// at a different support after [`reset`](FpTree::reset) without
/// re-inserting transactions.
///
/// A tree is single-threaded: it is not safe to share one instance across
/// threads, while independent instances share nothing.
#[derive(Debug, Clone)]
pub struct FpTree<I> {
    /// Node arena; the root lives at index 0 and owns no item.
    pub(crate) nodes: Vec<Node>,
    pub(crate) header: HeaderIndex<I>,
    pub(crate) patterns: PatternStore,
    pub(crate) min_support: f64,
    pub(crate) min_confidence: f64,
    pub(crate) num_transactions: u32,
    pub(crate) last_error: Option<String>,
}

impl<I: Label> FpTree<I> {
    /// Builds an empty tree from the global item ranking, most frequent
    /// item first. The ranking must be non-empty and free of duplicates.
    pub fn new<T>(ranking: T) -> Result<FpTree<I>, FpError>
    where
        T: IntoIterator<Item = I>,
    {
        let header = HeaderIndex::from_ranking(ranking)?;
        Ok(FpTree {
            nodes: vec![Node::new_root()],
            header,
            patterns: PatternStore::new(),
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            num_transactions: 0,
            last_error: None,
        })
    }

    /// Inserts one transaction.
    ///
    /// Duplicate items within the transaction collapse to a single
    /// occurrence. The transaction is rejected whole if it is empty or if
    /// any item is missing from the ranking; a rejected insert leaves the
    /// tree untouched.
    pub fn insert(&mut self, items: &[I]) -> Result<(), FpError> {
        let result = self.insert_transaction(items);
        self.record_failure(&result);
        result
    }

    fn insert_transaction(&mut self, items: &[I]) -> Result<(), FpError> {
        if items.is_empty() {
            return Err(FpError::EmptyInput);
        }
        let mut ranks = Vec::with_capacity(items.len());
        for item in items {
            match self.header.rank_of(item) {
                Some(rank) => ranks.push(rank),
                None => return Err(FpError::UnknownItem(item.to_string())),
            }
        }
        // Most frequent first, so shared prefixes coalesce.
        ranks.sort_unstable();
        ranks.dedup();

        let mut current: NodeId = ROOT;
        for &rank in &ranks {
            let next = match self.nodes[current].children.get(&rank).copied() {
                Some(child) => {
                    self.nodes[child].bump();
                    child
                }
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::new_child(rank, current));
                    self.nodes[current].children.insert(rank, id);
                    self.link_into_chain(rank, id);
                    id
                }
            };
            self.header.entry_mut(rank).count += 1;
            current = next;
        }
        self.num_transactions += 1;
        Ok(())
    }

    /// Appends a freshly created node to the tail of its rank's sibling
    /// chain, preserving creation order.
    fn link_into_chain(&mut self, rank: Rank, id: NodeId) {
        let entry = self.header.entry_mut(rank);
        match entry.tail.replace(id) {
            Some(tail) => self.nodes[tail].next = Some(id),
            None => entry.head = Some(id),
        }
    }

    /// The configured minimum support fraction.
    pub fn support(&self) -> f64 {
        self.min_support
    }

    /// Sets the minimum support fraction; must lie in `(0, 1]`.
    pub fn set_support(&mut self, fraction: f64) -> Result<(), FpError> {
        let result = Self::check_fraction("support", fraction);
        self.record_failure(&result);
        if result.is_ok() {
            self.min_support = fraction;
        }
        result
    }

    /// The configured minimum confidence fraction.
    pub fn confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Sets the minimum confidence fraction; must lie in `(0, 1]`. The
    /// value is held for callers to read back; mining does not filter on
    /// it, confidence being an attribute of emitted rules.
    pub fn set_confidence(&mut self, fraction: f64) -> Result<(), FpError> {
        let result = Self::check_fraction("confidence", fraction);
        self.record_failure(&result);
        if result.is_ok() {
            self.min_confidence = fraction;
        }
        result
    }

    fn check_fraction(name: &str, fraction: f64) -> Result<(), FpError> {
        if fraction > 0.0 && fraction <= 1.0 {
            Ok(())
        } else {
            Err(FpError::InvalidConfiguration(format!(
                "{} must lie in (0, 1], got {}",
                name, fraction
            )))
        }
    }

    /// Number of transactions inserted so far.
    pub fn num_transactions(&self) -> u32 {
        self.num_transactions
    }

    /// Clears mined patterns, and nothing else, so the tree can be mined
    /// again at a different support without re-insertion.
    pub fn reset(&mut self) {
        self.patterns.clear();
    }

    /// Human-readable message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn record_failure<T>(&mut self, result: &Result<T, FpError>) {
        if let Err(err) = result {
            self.last_error = Some(err.to_string());
        }
    }

    /// Maps ranks back to the labels they were assigned from.
    pub(crate) fn labels_of(&self, ranks: &[Rank]) -> Vec<I> {
        ranks
            .iter()
            .map(|&rank| self.header.label_of(rank).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::FpTree;
    use crate::error::FpError;
    use crate::item::{Label, Rank};
    use crate::node::ROOT;

    /// Sum of traversal counts along an item's sibling chain.
    fn chain_sum<I: Label>(tree: &FpTree<I>, item: &I) -> u32 {
        let rank = tree.header.rank_of(item).unwrap();
        let mut sum = 0;
        let mut cursor = tree.header.entry(rank).head;
        while let Some(id) = cursor {
            sum += tree.nodes[id].count;
            cursor = tree.nodes[id].next;
        }
        sum
    }

    fn check_structure<I: Label>(tree: &FpTree<I>) {
        for (id, node) in tree.nodes.iter().enumerate() {
            if id == ROOT {
                assert!(node.item.is_none());
                assert!(node.parent.is_none());
            } else {
                // Parents are allocated first, which also rules out cycles.
                assert!(node.parent.unwrap() < id);
                assert!(node.count >= 1);
                assert!(node.read <= node.count);
            }
        }
        for rank in tree.header.ranks() {
            assert_eq!(chain_sum(tree, tree.header.label_of(rank)), tree.header.entry(rank).count);
        }
    }

    #[test]
    fn construction_rejects_empty_and_duplicate_rankings() {
        assert!(matches!(
            FpTree::<&str>::new([]),
            Err(FpError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            FpTree::new(["a", "b", "b"]),
            Err(FpError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn defaults_after_construction() {
        let tree = FpTree::new(["a", "b"]).unwrap();
        assert_eq!(tree.support(), 0.1);
        assert_eq!(tree.confidence(), 0.1);
        assert_eq!(tree.num_transactions(), 0);
        assert!(tree.last_error().is_none());
    }

    #[test]
    fn shared_prefixes_coalesce() {
        let mut tree = FpTree::new(["a", "b", "c"]).unwrap();
        tree.insert(&["a", "b"]).unwrap();
        tree.insert(&["a", "c"]).unwrap();
        tree.insert(&["a", "b"]).unwrap();

        assert_eq!(tree.num_transactions(), 3);
        // One shared "a" node under the root with both branches below it.
        let a = tree.header.rank_of(&"a").unwrap();
        let a_node = tree.nodes[ROOT].children[&a];
        assert_eq!(tree.nodes[a_node].count, 3);
        assert_eq!(tree.nodes[a_node].children.len(), 2);
        check_structure(&tree);
    }

    #[test]
    fn header_counts_match_chain_sums() {
        let mut tree = FpTree::new(["a", "b", "c", "d"]).unwrap();
        for items in [
            vec!["a", "b", "c"],
            vec!["b", "d"],
            vec!["a", "c", "d"],
            vec!["d"],
            vec!["a", "b"],
        ] {
            tree.insert(&items).unwrap();
            check_structure(&tree);
        }
        assert_eq!(chain_sum(&tree, &"a"), 3);
        assert_eq!(chain_sum(&tree, &"d"), 3);
    }

    #[test]
    fn unknown_item_rejects_whole_transaction() {
        let mut tree = FpTree::new(["x", "y"]).unwrap();
        let result = tree.insert(&["x", "z"]);
        match result {
            Err(FpError::UnknownItem(item)) => assert_eq!(item, "z"),
            other => panic!("expected unknown item, got {:?}", other),
        }
        assert!(tree.last_error().unwrap().contains('z'));
        // No partial counts: "x" was named but the insert must not land.
        assert_eq!(tree.num_transactions(), 0);
        assert_eq!(chain_sum(&tree, &"x"), 0);
    }

    #[test]
    fn empty_transaction_is_rejected() {
        let mut tree = FpTree::new(["a"]).unwrap();
        assert_eq!(tree.insert(&[]), Err(FpError::EmptyInput));
        assert!(tree.last_error().is_some());
    }

    #[test]
    fn duplicate_items_collapse() {
        let mut deduped = FpTree::new(["a", "b"]).unwrap();
        deduped.insert(&["a", "a", "b"]).unwrap();

        let mut plain = FpTree::new(["a", "b"]).unwrap();
        plain.insert(&["a", "b"]).unwrap();

        assert_eq!(deduped.num_transactions(), plain.num_transactions());
        for item in [&"a", &"b"] {
            assert_eq!(chain_sum(&deduped, item), chain_sum(&plain, item));
        }
        assert_eq!(deduped.nodes.len(), plain.nodes.len());
    }

    #[test]
    fn transactions_are_sorted_by_rank_before_insertion() {
        let mut tree = FpTree::new(["a", "b", "c"]).unwrap();
        // Given in reverse ranking order; the path must still be a → b → c.
        tree.insert(&["c", "b", "a"]).unwrap();
        let a = tree.header.rank_of(&"a").unwrap();
        let b = tree.header.rank_of(&"b").unwrap();
        let c = tree.header.rank_of(&"c").unwrap();
        let a_node = tree.nodes[ROOT].children[&a];
        let b_node = tree.nodes[a_node].children[&b];
        assert!(tree.nodes[b_node].children.contains_key(&c));
        check_structure(&tree);
    }

    #[test]
    fn sibling_chains_preserve_creation_order() {
        let mut tree = FpTree::new(["a", "b"]).unwrap();
        tree.insert(&["b"]).unwrap();
        tree.insert(&["a", "b"]).unwrap();

        let b = tree.header.rank_of(&"b").unwrap();
        let head = tree.header.entry(b).head.unwrap();
        let second = tree.nodes[head].next.unwrap();
        // The first "b" node hangs off the root, the later one under "a".
        assert_eq!(tree.nodes[head].parent, Some(ROOT));
        assert_ne!(tree.nodes[second].parent, Some(ROOT));
        assert!(tree.nodes[second].next.is_none());
        check_structure(&tree);
    }

    #[test]
    fn threshold_setters_validate_their_range() {
        let mut tree = FpTree::new(["a"]).unwrap();
        for bad in [0.0, -0.2, 1.5, f64::NAN] {
            assert!(tree.set_support(bad).is_err());
            assert!(tree.set_confidence(bad).is_err());
        }
        assert!(tree.last_error().unwrap().contains("confidence"));
        tree.set_support(0.4).unwrap();
        tree.set_confidence(1.0).unwrap();
        assert_eq!(tree.support(), 0.4);
        assert_eq!(tree.confidence(), 1.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut tree = FpTree::new(["a", "b"]).unwrap();
        tree.insert(&["a", "b"]).unwrap();
        tree.reset();
        let transactions = tree.num_transactions();
        let nodes = tree.nodes.len();
        tree.reset();
        assert_eq!(tree.num_transactions(), transactions);
        assert_eq!(tree.nodes.len(), nodes);
        assert!(tree.patterns.is_empty());
    }

    #[test]
    fn rank_assignment_follows_ranking_order() {
        let tree = FpTree::new(["most", "mid", "least"]).unwrap();
        assert_eq!(tree.header.rank_of(&"most"), Some(Rank::with_id(1)));
        assert_eq!(tree.header.rank_of(&"least"), Some(Rank::with_id(3)));
    }
}
