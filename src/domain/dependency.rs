//! Logical dependencies between prediction markets.
//!
//! Markets are referenced by dense integer indices into the caller's market
//! list; identifiers, questions, and token IDs stay with the caller. Each
//! dependency relates a pair of markets and is compiled into one linear
//! constraint over their YES probabilities.

use serde::{Deserialize, Serialize};

/// The logical relationship between two binary markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// If market `i` resolves YES, market `j` must resolve YES.
    /// Constraint: `p_i <= p_j`, encoded as `p_i - p_j <= 0`.
    Implies,

    /// At most one of the two markets can resolve YES.
    /// Constraint: `p_i + p_j <= 1`.
    Mutex,

    /// Exactly one of the two markets must resolve YES.
    /// Constraint: `p_i + p_j = 1`.
    ExactlyOne,

    /// No logical dependency; dropped when building constraints.
    Independent,
}

/// A directed dependency between two markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Index of the first (antecedent) market.
    pub market_i: usize,
    /// Index of the second (consequent) market.
    pub market_j: usize,
    /// The relation holding between the two.
    pub relation: Relation,
}

impl Dependency {
    /// Creates a dependency between markets `i` and `j`.
    #[must_use]
    pub const fn new(market_i: usize, market_j: usize, relation: Relation) -> Self {
        Self {
            market_i,
            market_j,
            relation,
        }
    }

    /// Market `i` implies market `j`.
    #[must_use]
    pub const fn implies(market_i: usize, market_j: usize) -> Self {
        Self::new(market_i, market_j, Relation::Implies)
    }

    /// Markets `i` and `j` are mutually exclusive.
    #[must_use]
    pub const fn mutex(market_i: usize, market_j: usize) -> Self {
        Self::new(market_i, market_j, Relation::Mutex)
    }

    /// Exactly one of markets `i` and `j` resolves YES.
    #[must_use]
    pub const fn exactly_one(market_i: usize, market_j: usize) -> Self {
        Self::new(market_i, market_j, Relation::ExactlyOne)
    }

    /// True when this dependency carries no constraint.
    #[must_use]
    pub const fn is_independent(&self) -> bool {
        matches!(self.relation, Relation::Independent)
    }
}
