//! HiGHS-backed LP oracle via good_lp.
//!
//! HiGHS is a high-performance open-source linear programming solver. The
//! polytope's triplet rows are translated into a good_lp model per call;
//! the polytope itself stays immutable and shareable.

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel};

use super::LpOracle;
use crate::polytope::{MarginalPolytope, FEAS_TOL};

/// LP oracle backed by the HiGHS solver.
#[derive(Debug, Default, Clone)]
pub struct HighsOracle;

impl HighsOracle {
    /// Create a new oracle instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LpOracle for HighsOracle {
    fn minimize(&self, polytope: &MarginalPolytope, objective: &[f64]) -> Option<Vec<f64>> {
        let n = polytope.num_variables();
        if n == 0 || objective.len() != n {
            return None;
        }

        let mut vars = variables!();
        let mut var_list = Vec::with_capacity(n);
        for j in 0..n {
            let (lower, upper) = polytope.variable_bounds(j);
            var_list.push(vars.add(variable().min(lower).max(upper)));
        }

        let objective_expr: Expression = var_list
            .iter()
            .zip(objective.iter())
            .map(|(v, c)| *c * *v)
            .sum();

        let mut model = vars.minimise(objective_expr).using(highs);

        for r in 0..polytope.num_constraints() {
            let lhs: Expression = polytope
                .triplets()
                .iter()
                .filter(|t| t.row == r)
                .map(|t| t.value * var_list[t.col])
                .sum();

            let (lower, upper) = polytope.row_bounds(r);
            if lower.is_finite() && (upper - lower).abs() < FEAS_TOL {
                model = model.with(constraint!(lhs == upper));
            } else if lower.is_finite() {
                // Ranged row: good_lp constraints are single-sided, so emit
                // the pair.
                model = model.with(constraint!(lhs.clone() >= lower));
                model = model.with(constraint!(lhs <= upper));
            } else {
                model = model.with(constraint!(lhs <= upper));
            }
        }

        match model.solve() {
            Ok(solution) => Some(var_list.iter().map(|v| solution.value(*v)).collect()),
            // good_lp reports infeasible/unbounded/failed through Err.
            Err(_) => None,
        }
    }
}
