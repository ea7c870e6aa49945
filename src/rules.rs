use itertools::Itertools;
use tracing::{debug, warn};

use crate::combinations::combinations;
use crate::error::FpError;
use crate::item::{Label, Rank};
use crate::tree::FpTree;

/// One mined association rule: antecedent implies consequent, annotated
/// with the rule's support and confidence.
///
/// Immutable once constructed. Antecedent and consequent are disjoint and
/// non-empty, their union is a maximal-length frequent pattern, and both
/// sides list items in the canonical ranked order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule<I> {
    antecedent: Vec<I>,
    consequent: Vec<I>,
    support: f64,
    confidence: f64,
}

impl<I> AssociationRule<I> {
    /// Builds a rule after validating it: both sides non-empty, support and
    /// confidence in `(0, 1]`.
    pub fn new(
        antecedent: Vec<I>,
        consequent: Vec<I>,
        support: f64,
        confidence: f64,
    ) -> Result<AssociationRule<I>, FpError> {
        if antecedent.is_empty() || consequent.is_empty() {
            return Err(FpError::InvalidConfiguration(
                "rule sides must be non-empty".to_string(),
            ));
        }
        if !(support > 0.0 && support <= 1.0) {
            return Err(FpError::InvalidConfiguration(format!(
                "rule support must lie in (0, 1], got {}",
                support
            )));
        }
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(FpError::InvalidConfiguration(format!(
                "rule confidence must lie in (0, 1], got {}",
                confidence
            )));
        }
        Ok(AssociationRule {
            antecedent,
            consequent,
            support,
            confidence,
        })
    }

    /// The items whose presence predicts the consequent.
    pub fn antecedent(&self) -> &[I] {
        &self.antecedent
    }

    /// The items predicted by the antecedent.
    pub fn consequent(&self) -> &[I] {
        &self.consequent
    }

    /// Fraction of transactions containing antecedent and consequent both.
    pub fn support(&self) -> f64 {
        self.support
    }

    /// Support of the whole rule divided by the support of the antecedent.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl<I: Label> FpTree<I> {
    /// Mines the tree and derives association rules from the
    /// maximal-length frequent patterns, sorted by descending confidence.
    ///
    /// Every non-empty proper subset of each maximal-length pattern becomes
    /// an antecedent, with the remainder of the pattern as consequent.
    /// Fails with [`FpError::NoPatterns`] when nothing meets the configured
    /// support; the message is also retained for
    /// [`last_error`](FpTree::last_error).
    pub fn association_rules(&mut self) -> Result<Vec<AssociationRule<I>>, FpError> {
        let result = self
            .mine_patterns()
            .and_then(|()| self.derive_rules());
        self.record_failure(&result);
        result
    }

    fn derive_rules(&self) -> Result<Vec<AssociationRule<I>>, FpError> {
        let max_len = self.patterns.max_len();
        // (confidence, antecedent, consequent, support); ranks sort the
        // ties deterministically before labels come back in.
        let mut scored: Vec<(f64, Vec<Rank>, Vec<Rank>, f64)> = Vec::new();

        for (pattern, count) in self.patterns.iter_of_len(max_len) {
            for antecedent in combinations(pattern) {
                if antecedent.len() == pattern.len() {
                    continue;
                }
                let consequent: Vec<Rank> = pattern
                    .iter()
                    .copied()
                    .filter(|rank| !antecedent.contains(rank))
                    .collect();
                let Some(base) = self.patterns.count_of(&antecedent) else {
                    let err = FpError::IncompleteData(format!(
                        "no stored count for antecedent {}",
                        self.labels_of(&antecedent).iter().join(" ")
                    ));
                    warn!("{err}; rule skipped");
                    continue;
                };
                let support = f64::from(count) / f64::from(self.num_transactions);
                let confidence = f64::from(count) / f64::from(base);
                scored.push((confidence, antecedent, consequent, support));
            }
        }

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });
        debug!(rules = scored.len(), max_len, "derived association rules");

        scored
            .into_iter()
            .map(|(confidence, antecedent, consequent, support)| {
                AssociationRule::new(
                    self.labels_of(&antecedent),
                    self.labels_of(&consequent),
                    support,
                    confidence,
                )
            })
            .collect()
    }
}
