//! General relativistic ideal-gas MHD, primitive to conserved only.
//!
//! Primitive velocities are the normal-frame 4-velocity components `ũ^i`.
//! The energy slot of the conserved state holds `T^t_t + D`.

use crate::eos::EosParams;
use crate::state::{ConservedState, PrimitiveState};
use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("lower metric is singular")]
    Singular,
    #[error("g^00 must be negative for a timelike normal, got {0}")]
    NotTimelike(f64),
}

/// Spacetime metric at one cell center, with both index positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub lower: Matrix4<f64>,
    pub upper: Matrix4<f64>,
}

impl Metric {
    pub fn minkowski() -> Self {
        let eta = Matrix4::from_diagonal(&Vector4::new(-1.0, 1.0, 1.0, 1.0));
        Self {
            lower: eta,
            upper: eta,
        }
    }

    /// Builds a metric from `g_μν`, inverting it for `g^μν`.
    pub fn new(lower: Matrix4<f64>) -> Result<Self, MetricError> {
        let upper = lower.try_inverse().ok_or(MetricError::Singular)?;
        // Also rejects NaN.
        if !(upper[(0, 0)] < 0.0) {
            return Err(MetricError::NotTimelike(upper[(0, 0)]));
        }
        Ok(Self { lower, upper })
    }

    /// Trusts the caller that `upper` is the inverse of `lower`.
    pub fn from_parts(lower: Matrix4<f64>, upper: Matrix4<f64>) -> Self {
        Self { lower, upper }
    }

    pub fn lapse(&self) -> f64 {
        (-1.0 / self.upper[(0, 0)]).sqrt()
    }

    /// Shift vector `β^i = α^2 g^0i`.
    pub fn shift(&self) -> Vector3<f64> {
        let alpha2 = -1.0 / self.upper[(0, 0)];
        Vector3::new(self.upper[(0, 1)], self.upper[(0, 2)], self.upper[(0, 3)]) * alpha2
    }

    pub fn lower_index(&self, v: &Vector4<f64>) -> Vector4<f64> {
        self.lower * v
    }
}

/// Contravariant 4-velocity of a primitive state and its covariant form.
pub fn four_velocity(metric: &Metric, prim: &PrimitiveState) -> (Vector4<f64>, Vector4<f64>) {
    let spatial = metric.lower.fixed_view::<3, 3>(1, 1);
    let q = prim.v.dot(&(spatial * prim.v));
    let alpha = metric.lapse();
    let gamma = (1.0 + q).sqrt();
    let aw = alpha * gamma;
    let up = Vector4::new(
        gamma / alpha,
        prim.v.x - aw * metric.upper[(0, 1)],
        prim.v.y - aw * metric.upper[(0, 2)],
        prim.v.z - aw * metric.upper[(0, 3)],
    );
    let down = metric.lower_index(&up);
    (up, down)
}

/// Contravariant 4-magnetic field for cell-centered field `b` in a fluid
/// with 4-velocity `(u_up, u_down)`, and its covariant form.
pub fn four_magnetic_field(
    metric: &Metric,
    u_up: &Vector4<f64>,
    u_down: &Vector4<f64>,
    b: &Vector3<f64>,
) -> (Vector4<f64>, Vector4<f64>) {
    let b0 = u_down[1] * b.x + u_down[2] * b.y + u_down[3] * b.z;
    let up = Vector4::new(
        b0,
        (b.x + b0 * u_up[1]) / u_up[0],
        (b.y + b0 * u_up[2]) / u_up[0],
        (b.z + b0 * u_up[3]) / u_up[0],
    );
    let down = metric.lower_index(&up);
    (up, down)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealGrMhd {
    pub eos: EosParams,
}

impl IdealGrMhd {
    pub fn new(eos: EosParams) -> Self {
        Self { eos }
    }

    pub fn prim_to_cons(
        &self,
        metric: &Metric,
        prim: &PrimitiveState,
        b: &Vector3<f64>,
    ) -> ConservedState {
        let gam = self.eos.gamma;
        let (u_up, u_down) = four_velocity(metric, prim);
        let (b_up, b_down) = four_magnetic_field(metric, &u_up, &u_down, b);
        let b_sq = b_up.dot(&b_down);

        let wtot = prim.d + gam * prim.e + b_sq;
        let ptot = (gam - 1.0) * prim.e + 0.5 * b_sq;
        let u0 = u_up[0];
        let b0 = b_up[0];
        let d = prim.d * u0;
        ConservedState {
            d,
            m: Vector3::new(
                wtot * u0 * u_down[1] - b0 * b_down[1],
                wtot * u0 * u_down[2] - b0 * b_down[2],
                wtot * u0 * u_down[3] - b0 * b_down[3],
            ),
            e: wtot * u0 * u_down[0] - b0 * b_down[0] + ptot + d,
            b: *b,
        }
    }
}
