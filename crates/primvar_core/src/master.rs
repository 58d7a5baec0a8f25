//! Master functions of the robust SRMHD inversion of Kastaun, Kalinani &
//! Ciolfi (2021). All inputs are rescaled by the conserved density, so the
//! root variable `mu = 1 / (h W)` and both function values are of order unity.
//! Equation numbers refer to that paper.

use crate::eos::EosParams;

/// Density-normalized invariants of one conserved state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterParams {
    /// `|B|^2 / D`
    pub b2: f64,
    /// `(B . S) / D^(3/2)`
    pub rpar: f64,
    /// `|S| / D`
    pub r: f64,
    /// `(E - D) / D`
    pub q: f64,
}

/// Intermediate quantities at a trial `mu`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterState {
    pub rbar: f64,
    pub qbar: f64,
    pub z2: f64,
    /// Lorentz factor
    pub w: f64,
}

impl MasterParams {
    fn rbar(&self, mu: f64) -> f64 {
        let x = 1.0 / (1.0 + mu * self.b2); // (26)
        x * x * self.r * self.r + mu * x * (1.0 + x) * self.rpar * self.rpar // (38)
    }

    pub fn state_at(&self, mu: f64) -> MasterState {
        let rbar = self.rbar(mu);
        let qbar = self.q - 0.5 * self.b2 - 0.5 * (mu * mu * (self.b2 * rbar - self.rpar * self.rpar)); // (31)
        let z2 = mu * mu * rbar / (1.0 - mu * mu * rbar).abs(); // (32)
        MasterState {
            rbar,
            qbar,
            z2,
            w: (1.0 + z2).sqrt(),
        }
    }
}

impl MasterState {
    /// Unfloored specific internal energy (eq. 40).
    pub fn eps(&self, mu: f64) -> f64 {
        self.w * (self.qbar - mu * self.rbar) + self.z2 / (self.w + 1.0)
    }
}

/// Bracket function, eq. 49. Negative at `mu = 0`, non-negative at `mu = 1`;
/// its root bounds the root of [`master_function`] from above.
pub fn bracket_function(mu: f64, params: &MasterParams) -> f64 {
    mu * (1.0 + params.rbar(mu)).sqrt() - 1.0
}

/// Primary master function, eq. 44. `d` is the conserved density used to
/// evaluate the pressure floor at the implied rest density.
pub fn master_function(mu: f64, params: &MasterParams, d: f64, eos: &EosParams) -> f64 {
    let state = params.state_at(mu);
    let rho = d / state.w; // (34)
    let eps = state.eps(mu).max(eos.specific_energy_floor(rho));
    let h = 1.0 + eos.gamma * eps; // (43)
    mu - 1.0 / (h / state.w + state.rbar * mu) // (45)
}
