//! Invariant checks run after a [`Topology`](crate::topology::Topology) is
//! built or edited.
//!
//! For `Topology` the checks are the structural pass of
//! [`validate_topology`](crate::topology::validation::validate_topology):
//! index ranges, twin symmetry, rotation links, neighbor count totals and the
//! cycle of every vertex and face. Face sizes are left unbounded so that the
//! dual of a degree-2 vertex passes.
//!
//! Builders, `make_dual` and the Euler operators call
//! [`DebugInvariants::debug_assert_invariants_after`] with their own name once
//! they succeed. Nothing runs unless `debug_assertions` or the
//! `strict-invariants` / `check-invariants` features are on.

use crate::mesh_error::TopologyError;

/// Whether [`debug_invariants!`] checks run in this build.
pub const CHECKS_ENABLED: bool = cfg!(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
));

/// Run a fallible check and panic with the given context on error when
/// invariant checking is enabled. The context takes `format!` arguments.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)+) => {
        if $crate::debug_invariants::CHECKS_ENABLED {
            if let Err(e) = $expr {
                panic!("[invariants] {}: {}", format_args!($($ctx)+), e);
            }
        }
    };
}

/// Trait for validating connectivity invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), TopologyError>;

    /// Assert invariants when checking is enabled. `step` names what just
    /// ran, e.g. `"make_dual"` or `"spin face edge forward"`.
    fn debug_assert_invariants_after(&self, step: &str) {
        debug_invariants!(self.validate_invariants(), "invalid after {}", step);
    }

    /// Assert invariants when checking is enabled.
    fn debug_assert_invariants(&self) {
        debug_invariants!(self.validate_invariants(), "invalid topology");
    }
}
