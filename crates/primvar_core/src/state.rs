//! Per-cell state records.
//!
//! A conserved state always carries the cell-centered magnetic field. A
//! primitive state never does; the field travels with the conserved array and
//! is handed back to the inverse mapping explicitly.

use crate::diagnostics::ConversionDiagnostics;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Conserved variables of one cell.
///
/// In special relativity `e` holds `E - D`; in general relativity it holds
/// `T^t_t + D`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConservedState {
    pub d: f64,
    pub m: Vector3<f64>,
    pub e: f64,
    pub b: Vector3<f64>,
}

impl ConservedState {
    pub fn new(d: f64, m: Vector3<f64>, e: f64, b: Vector3<f64>) -> Self {
        Self { d, m, e, b }
    }

    /// Reads the flat layout `[d, mx, my, mz, e, bx, by, bz]`.
    pub fn from_slice(values: &[f64; 8]) -> Self {
        Self {
            d: values[0],
            m: Vector3::new(values[1], values[2], values[3]),
            e: values[4],
            b: Vector3::new(values[5], values[6], values[7]),
        }
    }

    pub fn to_array(&self) -> [f64; 8] {
        [
            self.d, self.m.x, self.m.y, self.m.z, self.e, self.b.x, self.b.y, self.b.z,
        ]
    }

    /// Magnetic energy density `|B|^2 / 2`.
    pub fn magnetic_energy(&self) -> f64 {
        0.5 * self.b.norm_squared()
    }
}

/// Primitive variables of one cell.
///
/// `v` is the coordinate velocity for Newtonian flow and the spatial part of
/// the 4-velocity (`W v^i`) for relativistic flow. `e` is the internal energy
/// density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveState {
    pub d: f64,
    pub v: Vector3<f64>,
    pub e: f64,
}

impl PrimitiveState {
    pub fn new(d: f64, v: Vector3<f64>, e: f64) -> Self {
        Self { d, v, e }
    }

    /// Reads the flat layout `[d, vx, vy, vz, e]`.
    pub fn from_slice(values: &[f64; 5]) -> Self {
        Self {
            d: values[0],
            v: Vector3::new(values[1], values[2], values[3]),
            e: values[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.d, self.v.x, self.v.y, self.v.z, self.e]
    }

    /// Lorentz factor of a relativistic primitive state, `sqrt(1 + u^2)`.
    pub fn lorentz_factor(&self) -> f64 {
        (1.0 + self.v.norm_squared()).sqrt()
    }

    /// Coordinate 3-velocity `u / W` of a relativistic primitive state.
    /// Its magnitude is strictly below one for any finite `v`.
    pub fn three_velocity(&self) -> Vector3<f64> {
        self.v / self.lorentz_factor()
    }
}

/// Result of a conserved-to-primitive conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input state after density and energy floors were applied.
    pub cons: ConservedState,
    pub prim: PrimitiveState,
    pub diagnostics: ConversionDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_layouts_round_trip() {
        let raw = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let cons = ConservedState::from_slice(&raw);
        assert_eq!(cons.m, Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(cons.b, Vector3::new(6.0, 7.0, 8.0));
        assert_eq!(cons.to_array(), raw);

        let raw = [1.0, 0.1, 0.2, 0.3, 2.5];
        let prim = PrimitiveState::from_slice(&raw);
        assert_eq!(prim.to_array(), raw);
    }

    #[test]
    fn three_velocity_stays_subluminal() {
        let prim = PrimitiveState::new(1.0, Vector3::new(1.0e6, -2.0e6, 3.0e5), 1.0);
        let beta = prim.three_velocity();
        assert!(beta.norm() < 1.0);
        assert!((prim.lorentz_factor() - (1.0 + prim.v.norm_squared()).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn magnetic_energy_is_half_field_squared() {
        let cons = ConservedState::new(
            1.0,
            Vector3::zeros(),
            1.0,
            Vector3::new(0.75, 1.0, 0.0),
        );
        assert!((cons.magnetic_energy() - 0.78125).abs() < 1e-15);
    }
}
