//! Flat `f64` array layouts shared with JavaScript.
//!
//! Conserved cells are `[d, mx, my, mz, e, bx, by, bz]`, primitive cells are
//! `[d, vx, vy, vz, e]`, fields are `[bx, by, bz]` and metrics are the 16
//! row-major components of `g_μν`.

use anyhow::{bail, Context, Result};
use nalgebra::{Matrix4, Vector3};
use primvar_core::grmhd::Metric;
use primvar_core::{ConservedState, PrimitiveState};

pub(crate) const CONS_STRIDE: usize = 8;
pub(crate) const PRIM_STRIDE: usize = 5;
pub(crate) const FIELD_STRIDE: usize = 3;
pub(crate) const METRIC_STRIDE: usize = 16;

fn check_stride(what: &str, len: usize, stride: usize) -> Result<usize> {
    if len % stride != 0 {
        bail!("{what} length {len} is not a multiple of {stride}");
    }
    Ok(len / stride)
}

pub(crate) fn unpack_conserved(flat: &[f64]) -> Result<Vec<ConservedState>> {
    check_stride("Conserved array", flat.len(), CONS_STRIDE)?;
    Ok(flat
        .chunks_exact(CONS_STRIDE)
        .map(|c| {
            ConservedState::new(
                c[0],
                Vector3::new(c[1], c[2], c[3]),
                c[4],
                Vector3::new(c[5], c[6], c[7]),
            )
        })
        .collect())
}

pub(crate) fn unpack_primitive(flat: &[f64]) -> Result<Vec<PrimitiveState>> {
    check_stride("Primitive array", flat.len(), PRIM_STRIDE)?;
    Ok(flat
        .chunks_exact(PRIM_STRIDE)
        .map(|c| PrimitiveState::new(c[0], Vector3::new(c[1], c[2], c[3]), c[4]))
        .collect())
}

/// Builds conserved cells carrying only the given fields, ready for a
/// primitive-to-conserved pass.
pub(crate) fn unpack_fields(flat: &[f64], cells: usize) -> Result<Vec<ConservedState>> {
    let n = check_stride("Field array", flat.len(), FIELD_STRIDE)?;
    if n != cells {
        bail!("Field array has {n} cells, expected {cells}");
    }
    Ok(flat
        .chunks_exact(FIELD_STRIDE)
        .map(|c| ConservedState::new(0.0, Vector3::zeros(), 0.0, Vector3::new(c[0], c[1], c[2])))
        .collect())
}

pub(crate) fn unpack_metrics(flat: &[f64], cells: usize) -> Result<Vec<Metric>> {
    let n = check_stride("Metric array", flat.len(), METRIC_STRIDE)?;
    if n != cells {
        bail!("Metric array has {n} cells, expected {cells}");
    }
    flat.chunks_exact(METRIC_STRIDE)
        .enumerate()
        .map(|(i, c)| {
            Metric::new(Matrix4::from_row_slice(c)).with_context(|| format!("Invalid metric at cell {i}"))
        })
        .collect()
}

pub(crate) fn pack_conserved(cells: &[ConservedState]) -> Vec<f64> {
    cells.iter().flat_map(|u| u.to_array()).collect()
}

pub(crate) fn pack_primitive(cells: &[PrimitiveState]) -> Vec<f64> {
    cells.iter().flat_map(|w| w.to_array()).collect()
}
