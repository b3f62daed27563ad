//! Linear-programming oracle over the marginal polytope.
//!
//! The projection algorithm only ever needs one operation: minimize a linear
//! objective over the polytope and hand back a vertex. Keeping that behind a
//! trait lets the backend be swapped (simplex, interior point, or vertex
//! enumeration for tiny systems) without touching the projector.

mod highs;

pub use highs::HighsOracle;

use crate::polytope::MarginalPolytope;

/// Minimizes linear objectives over a [`MarginalPolytope`].
pub trait LpOracle {
    /// Solve `min c^T x` over the polytope.
    ///
    /// Returns the minimizer, or `None` when the backend reports anything
    /// other than an optimal solution (infeasible, unbounded, failure) or
    /// when the polytope has no variables. Must be deterministic for
    /// identical inputs.
    fn minimize(&self, polytope: &MarginalPolytope, objective: &[f64]) -> Option<Vec<f64>>;
}
