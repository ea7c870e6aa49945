//! Association rule mining with FP-Growth (Han, Pei, Yin 2000).
//!
//! The caller supplies the global item-frequency ranking up front, inserts
//! transactions one at a time, and asks for association rules; the crate
//! builds the compact prefix-tree encoding of the database, extracts the
//! frequent patterns through per-item header chains, and derives rules from
//! the maximal-length patterns.
//!
//! # Quick start
//!
//! ```
//! use fpgrowth::FpTree;
//!
//! // Ranking is most frequent first and fixed for the tree's lifetime.
//! let mut tree = FpTree::new(["a", "b", "c"]).unwrap();
//! for transaction in [
//!     vec!["a", "b"],
//!     vec!["a", "b"],
//!     vec!["a", "b"],
//!     vec!["a", "c"],
//!     vec!["b", "c"],
//! ] {
//!     tree.insert(&transaction).unwrap();
//! }
//! tree.set_support(0.4).unwrap();
//!
//! let rules = tree.association_rules().unwrap();
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[0].antecedent(), ["a"]);
//! assert_eq!(rules[0].consequent(), ["b"]);
//! assert_eq!(rules[0].confidence(), 0.75);
//! ```
//!
//! Transactions are sets: duplicate items collapse, and items absent from
//! the ranking are rejected. A tree can be re-mined at a different support
//! after [`FpTree::reset`] without re-inserting anything.

#![warn(missing_docs)]

mod combinations;
mod error;
mod header;
#[cfg(test)]
mod index;
mod item;
mod mining;
mod node;
mod patterns;
mod rules;
mod tree;

pub use combinations::combinations;
pub use error::FpError;
pub use item::Label;
pub use rules::AssociationRule;
pub use tree::FpTree;
