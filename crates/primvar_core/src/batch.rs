//! Array-level conversion over whole blocks of cells.
//!
//! Cells are independent, so the batch either runs sequentially or maps the
//! point-wise converter over a rayon parallel iterator. Diagnostics are
//! reduced with [`ConversionDiagnostics::merge`], which makes the result
//! independent of the execution strategy.

use crate::diagnostics::ConversionDiagnostics;
use crate::grmhd::{IdealGrMhd, Metric};
use crate::root::MAX_ITERATIONS;
use crate::state::{ConservedState, PrimitiveState};
use crate::traits::StateConverter;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("length mismatch: {what} has {got} cells, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Batches shorter than this run sequentially.
    pub min_parallel_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_parallel_size: 1000,
        }
    }
}

impl BatchConfig {
    pub fn sequential() -> Self {
        Self {
            min_parallel_size: usize::MAX,
        }
    }

    fn parallel_for(&self, len: usize) -> bool {
        len >= self.min_parallel_size
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), BatchError> {
    if expected != got {
        return Err(BatchError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Converts every cell of `cons` into `prims`.
///
/// Floor corrections are written back into `cons`, so the stored conserved
/// array stays consistent with the returned primitives.
pub fn cons_to_prim_batch<C>(
    converter: &C,
    cons: &mut [ConservedState],
    prims: &mut [PrimitiveState],
    config: &BatchConfig,
) -> Result<ConversionDiagnostics, BatchError>
where
    C: StateConverter + Sync,
{
    check_len("primitive array", cons.len(), prims.len())?;

    let convert = |(u, w): (&mut ConservedState, &mut PrimitiveState)| {
        let out = converter.cons_to_prim(u);
        *u = out.cons;
        *w = out.prim;
        out.diagnostics
    };

    let diagnostics = if config.parallel_for(cons.len()) {
        cons.par_iter_mut()
            .zip(prims.par_iter_mut())
            .map(convert)
            .reduce(ConversionDiagnostics::default, ConversionDiagnostics::merge)
    } else {
        cons.iter_mut()
            .zip(prims.iter_mut())
            .map(convert)
            .sum::<ConversionDiagnostics>()
    };

    report(&diagnostics, prims);
    Ok(diagnostics)
}

/// Fills density, momentum and energy of `cons` from `prims`, keeping the
/// magnetic field already stored in `cons`.
pub fn prim_to_cons_batch<C>(
    converter: &C,
    prims: &[PrimitiveState],
    cons: &mut [ConservedState],
    config: &BatchConfig,
) -> Result<(), BatchError>
where
    C: StateConverter + Sync,
{
    check_len("conserved array", prims.len(), cons.len())?;

    let convert = |(w, u): (&PrimitiveState, &mut ConservedState)| {
        *u = converter.prim_to_cons(w, &u.b);
    };

    if config.parallel_for(prims.len()) {
        prims.par_iter().zip(cons.par_iter_mut()).for_each(convert);
    } else {
        prims.iter().zip(cons.iter_mut()).for_each(convert);
    }
    Ok(())
}

/// General relativistic variant of [`prim_to_cons_batch`], one metric per cell.
pub fn prim_to_cons_gr_batch(
    gr: &IdealGrMhd,
    prims: &[PrimitiveState],
    metrics: &[Metric],
    cons: &mut [ConservedState],
    config: &BatchConfig,
) -> Result<(), BatchError> {
    check_len("conserved array", prims.len(), cons.len())?;
    check_len("metric array", prims.len(), metrics.len())?;

    let convert = |((w, g), u): ((&PrimitiveState, &Metric), &mut ConservedState)| {
        *u = gr.prim_to_cons(g, w, &u.b);
    };

    if config.parallel_for(prims.len()) {
        prims
            .par_iter()
            .zip(metrics.par_iter())
            .zip(cons.par_iter_mut())
            .for_each(convert);
    } else {
        prims
            .iter()
            .zip(metrics.iter())
            .zip(cons.iter_mut())
            .for_each(convert);
    }
    Ok(())
}

fn report(diagnostics: &ConversionDiagnostics, prims: &[PrimitiveState]) {
    if diagnostics.any_floor_used() {
        log::debug!(
            "floors applied over {} cells (density: {}, energy: {})",
            prims.len(),
            diagnostics.dfloor_used,
            diagnostics.efloor_used
        );
    }
    if diagnostics.max_iter >= MAX_ITERATIONS {
        log::debug!(
            "root solver exhausted its {} iteration budget",
            MAX_ITERATIONS
        );
    }
    if log::log_enabled!(log::Level::Warn) {
        let bad = prims
            .iter()
            .filter(|w| !(w.d.is_finite() && w.e.is_finite() && w.v.iter().all(|x| x.is_finite())))
            .count();
        if bad > 0 {
            log::warn!("{} of {} recovered primitive states are not finite", bad, prims.len());
        }
    }
}
