use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single item inside a transaction.
pub type ItemId = u32;

/// One purchase/event: an ordered collection of distinct items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    items: Vec<ItemId>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item unless it is already present.
    ///
    /// Returns `true` when the item was added.
    pub fn push_distinct(&mut self, item: ItemId) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemId> for Transaction {
    fn from_iter<I: IntoIterator<Item = ItemId>>(items: I) -> Self {
        let mut transaction = Transaction::new();
        for item in items {
            transaction.push_distinct(item);
        }
        transaction
    }
}

/// A non-empty set of items, kept sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemSet(Vec<ItemId>);

impl ItemSet {
    /// Build an item set, sorting and de-duplicating the items.
    ///
    /// Returns `None` for an empty input.
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Option<Self> {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    /// Wrap items already known to be sorted, distinct and non-empty.
    pub(crate) fn from_sorted(items: Vec<ItemId>) -> Self {
        debug_assert!(!items.is_empty());
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    pub fn is_disjoint(&self, other: &ItemSet) -> bool {
        self.0.iter().all(|item| !other.contains(*item))
    }
}

/// Items joined by single spaces, the form used in every output file.
impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Anything carrying a support proportion: itemsets and rules.
pub trait HasSupport {
    /// Fraction of transactions supporting this entry.
    fn support(&self) -> f64;
}

/// A frequent itemset as produced by the mining step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: ItemSet,
    pub support: f64,
}

impl FrequentItemset {
    pub fn new(items: ItemSet, support: f64) -> Self {
        Self { items, support }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl HasSupport for FrequentItemset {
    fn support(&self) -> f64 {
        self.support
    }
}

/// An association rule `antecedent -> consequent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    /// Support of `antecedent ∪ consequent`.
    pub support: f64,
    pub confidence: f64,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub lift: f64,
}

impl HasSupport for AssociationRule {
    fn support(&self) -> f64 {
        self.support
    }
}

/// Elapsed wall-clock seconds of the two mining phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub itemsets_seconds: f64,
    pub rules_seconds: f64,
}
