//! Elements of the free idempotent rig on two generators.
//!
//! Every element is a formal sum of the monomials `1, a, b, ab, ba, aba, bab`
//! with coefficients in `0..4`, `4^7` tuples in total. The rig is the quotient of
//! these tuples by the least congruence forcing `x*x = x`, computed by
//! [`ClosureEngine`] on an explicit partition of the tuples.

mod algebra;
mod closure;
mod ids;
mod partition;
mod report;
mod typed_vec;

pub use crate::{
    algebra::{
        Algebra, AlgebraTables, Coefficient, FormalRig, ONE_GENERATOR, Presentation,
        TWO_GENERATORS, Tuple, saturate,
    },
    closure::{
        ClosureEngine, ClosureStats, Phase, SQUARE_CORRECTION_PASSES, Strategy,
    },
    ids::Element,
    partition::{InvariantViolation, PartitionStore},
    report::{Quotient, expression, listing, monomial_table, write_listing},
};

#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub strategy: Strategy,
    /// Run [`ClosureEngine::certify`] on the stable partition.
    pub certify: bool,
}

/// Seed, refine and collect the quotient of `algebra`.
pub fn run<A: Algebra>(
    algebra: &A,
    config: &Configuration,
    on_merge: impl FnMut(&PartitionStore),
) -> Result<(Quotient, ClosureStats), InvariantViolation> {
    let mut engine = ClosureEngine::seed(algebra)?;
    engine.refine(config.strategy, on_merge);
    if config.certify {
        engine.certify()?;
    }
    Ok((engine.quotient(), engine.stats().clone()))
}
