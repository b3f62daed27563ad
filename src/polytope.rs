//! The marginal polytope: the feasible region for market probabilities.
//!
//! Logical relations between binary events induce linear constraints on
//! their marginal probabilities. The intersection of those constraints with
//! the unit hypercube is the marginal polytope; a price vector outside it
//! admits arbitrage. Constraints are stored in sparse triplet form so both
//! the feasibility scan and the LP oracle can walk them cheaply.

use tracing::debug;

use crate::domain::{Dependency, Relation};

/// Tolerance below which a constraint breach is treated as noise.
///
/// Shared by the feasibility tester and the LP oracle's row-sense selection
/// so the two agree on what counts as an equality.
pub const FEAS_TOL: f64 = 1e-9;

/// One entry of the sparse constraint matrix.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Triplet {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) value: f64,
}

/// Result of a feasibility check.
#[derive(Debug, Clone)]
pub struct FeasibilityResult {
    /// True when no constraint is violated beyond [`FEAS_TOL`].
    pub feasible: bool,
    /// Magnitude of the worst constraint breach.
    pub violation: f64,
    /// Per-row slack, positive for an upper-bound breach and negative for a
    /// lower-bound breach; zero for satisfied rows.
    pub dual: Vec<f64>,
}

/// Sparse linear-constraint representation of the feasibility region.
///
/// Built once per dependency set and immutable afterwards; concurrent scans
/// may share it by reference.
#[derive(Debug, Clone, Default)]
pub struct MarginalPolytope {
    num_vars: usize,
    num_constraints: usize,
    triplets: Vec<Triplet>,
    row_upper: Vec<f64>,
    row_lower: Vec<f64>,
    var_lower: Vec<f64>,
    var_upper: Vec<f64>,
}

impl MarginalPolytope {
    /// Builds the constraint system for `num_markets` markets.
    ///
    /// One row per non-independent dependency, numbered in insertion order:
    ///
    /// | relation       | row                  | bounds        |
    /// |----------------|----------------------|---------------|
    /// | `Implies(i,j)`  | `p_i - p_j`         | `<= 0`        |
    /// | `Mutex(i,j)`    | `p_i + p_j`         | `<= 1`        |
    /// | `ExactlyOne(i,j)` | `p_i + p_j`       | `= 1`         |
    ///
    /// Every variable is bounded to `[0, 1]`. The builder does not
    /// deduplicate rows or detect contradictory dependency sets.
    #[must_use]
    pub fn build(num_markets: usize, deps: &[Dependency]) -> Self {
        let mut triplets = Vec::new();
        let mut row_upper = Vec::new();
        let mut row_lower = Vec::new();

        let mut row = 0;
        for dep in deps {
            let (i, j) = (dep.market_i, dep.market_j);
            match dep.relation {
                Relation::Implies => {
                    // p_i <= p_j, written as p_i - p_j <= 0
                    triplets.push(Triplet { row, col: i, value: 1.0 });
                    triplets.push(Triplet { row, col: j, value: -1.0 });
                    row_upper.push(0.0);
                    row_lower.push(f64::NEG_INFINITY);
                    row += 1;
                }
                Relation::Mutex => {
                    triplets.push(Triplet { row, col: i, value: 1.0 });
                    triplets.push(Triplet { row, col: j, value: 1.0 });
                    row_upper.push(1.0);
                    row_lower.push(f64::NEG_INFINITY);
                    row += 1;
                }
                Relation::ExactlyOne => {
                    triplets.push(Triplet { row, col: i, value: 1.0 });
                    triplets.push(Triplet { row, col: j, value: 1.0 });
                    row_upper.push(1.0);
                    row_lower.push(1.0);
                    row += 1;
                }
                Relation::Independent => {}
            }
        }

        debug!(
            constraints = row,
            variables = num_markets,
            "built marginal polytope"
        );

        Self {
            num_vars: num_markets,
            num_constraints: row,
            triplets,
            row_upper,
            row_lower,
            var_lower: vec![0.0; num_markets],
            var_upper: vec![1.0; num_markets],
        }
    }

    /// Number of constraint rows.
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    /// Number of market variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.num_vars
    }

    pub(crate) fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    /// Lower and upper bound of constraint row `r`.
    pub(crate) fn row_bounds(&self, r: usize) -> (f64, f64) {
        (self.row_lower[r], self.row_upper[r])
    }

    /// Lower and upper bound of variable `j`.
    pub(crate) fn variable_bounds(&self, j: usize) -> (f64, f64) {
        (self.var_lower[j], self.var_upper[j])
    }

    /// Checks whether a price vector lies inside the polytope.
    ///
    /// Accumulates `A * prices` in a single triplet scan and records, per
    /// row, how far any bound is breached. `violation` is the worst breach
    /// and the result is feasible when it stays within [`FEAS_TOL`]. With
    /// zero constraints every price vector is feasible.
    #[must_use]
    pub fn check_feasibility(&self, prices: &[f64]) -> FeasibilityResult {
        let mut result = FeasibilityResult {
            feasible: true,
            violation: 0.0,
            dual: vec![0.0; self.num_constraints],
        };

        if self.num_constraints == 0 {
            return result;
        }

        let mut row_values = vec![0.0; self.num_constraints];
        for t in &self.triplets {
            if t.col < prices.len() {
                row_values[t.row] += t.value * prices[t.col];
            }
        }

        for (r, &v) in row_values.iter().enumerate() {
            if v > self.row_upper[r] + FEAS_TOL {
                result.feasible = false;
                let breach = v - self.row_upper[r];
                result.violation = result.violation.max(breach);
                result.dual[r] = breach;
            }

            if self.row_lower[r].is_finite() && v < self.row_lower[r] - FEAS_TOL {
                result.feasible = false;
                let breach = self.row_lower[r] - v;
                result.violation = result.violation.max(breach);
                result.dual[r] = -breach;
            }
        }

        result
    }
}
