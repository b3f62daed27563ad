//! I-projection of price vectors onto the marginal polytope.
//!
//! Finds `q* = argmin_{q in M} D_KL(p || q)` with the Frank-Wolfe
//! (conditional gradient) method: at each step the objective is linearized
//! at the current iterate and the LP oracle picks the feasible vertex that
//! minimizes it. The divergence between `p` and `q*` bounds the arbitrage
//! margin available from moving the market onto consistent prices.

mod frank_wolfe;
mod kl;

pub use frank_wolfe::{FrankWolfe, FrankWolfeConfig, Projection};
pub use kl::{clamp_unit, kl_divergence, kl_gradient, EPS};
