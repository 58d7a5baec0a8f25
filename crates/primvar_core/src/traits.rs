use crate::state::{ConservedState, Conversion, PrimitiveState};
use nalgebra::Vector3;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars by the root solver.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A single-cell converter between conserved and primitive variables.
///
/// Implementations are pure: every call depends only on its arguments and the
/// converter's immutable parameters, so one converter may be shared by any
/// number of workers.
pub trait StateConverter {
    /// Recovers the primitive state from a conserved state.
    /// The returned `Conversion` carries the floor-corrected conserved state.
    fn cons_to_prim(&self, cons: &ConservedState) -> Conversion;

    /// Builds the conserved state of a primitive state threaded by the
    /// cell-centered field `b`.
    fn prim_to_cons(&self, prim: &PrimitiveState, b: &Vector3<f64>) -> ConservedState;
}
