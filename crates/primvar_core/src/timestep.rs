//! Stable timestep estimate from Newtonian primitive states.

use crate::eos::EosParams;
use crate::state::PrimitiveState;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEvolution {
    /// Passive advection: only the flow speed limits the step.
    Kinematic,
    /// Signals travel at `|v| + c_s`.
    #[default]
    Dynamic,
}

/// Cell widths of a uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub dx1: f64,
    pub dx2: f64,
    pub dx3: f64,
}

/// Smallest signal crossing time over `prims`.
///
/// `active_dims` (1 to 3) selects which directions take part; a 1D block
/// never limits the step by its trivial second and third widths. An empty
/// slice yields `f32::MAX`.
pub fn new_timestep(
    prims: &[PrimitiveState],
    size: CellSize,
    eos: &EosParams,
    evolution: TimeEvolution,
    active_dims: usize,
) -> f64 {
    let start = f64::from(f32::MAX);
    let limit = |w: &PrimitiveState| -> [f64; 3] {
        let signal = match evolution {
            TimeEvolution::Kinematic => 0.0,
            TimeEvolution::Dynamic => eos.sound_speed(eos.pressure(w.e), w.d),
        };
        [
            size.dx1 / (w.v.x.abs() + signal),
            size.dx2 / (w.v.y.abs() + signal),
            size.dx3 / (w.v.z.abs() + signal),
        ]
    };

    let per_dim = prims
        .par_iter()
        .map(limit)
        .reduce(
            || [start; 3],
            |a, b| [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
        );

    per_dim
        .iter()
        .take(active_dims.clamp(1, 3))
        .fold(per_dim[0], |dt, &d| dt.min(d))
}
