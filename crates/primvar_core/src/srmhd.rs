//! Special relativistic ideal-gas MHD.
//!
//! Conserved energy is stored as `E - D`. Primitive velocities are the spatial
//! components of the 4-velocity, `u^i = W v^i`.

use crate::diagnostics::ConversionDiagnostics;
use crate::eos::EosParams;
use crate::master::{bracket_function, master_function, MasterParams};
use crate::root::SolverSettings;
use crate::state::{ConservedState, Conversion, PrimitiveState};
use crate::traits::StateConverter;
use nalgebra::Vector3;

/// Scalar invariants of a conserved state that the inversion needs before
/// rescaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrInvariants {
    /// `|S|^2`
    pub s2: f64,
    /// `|B|^2`
    pub b2: f64,
    /// `(B . S) / D`
    pub rpar: f64,
}

impl SrInvariants {
    pub fn from_conserved(cons: &ConservedState) -> Self {
        Self {
            s2: cons.m.norm_squared(),
            b2: cons.b.norm_squared(),
            rpar: cons.b.dot(&cons.m) / cons.d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealSrMhd {
    pub eos: EosParams,
    pub solver: SolverSettings,
}

impl IdealSrMhd {
    pub fn new(eos: EosParams) -> Self {
        Self {
            eos,
            solver: SolverSettings::default(),
        }
    }

    /// Inverts `cons` using invariants the caller already computed.
    ///
    /// `inv` must have been evaluated at the density-floored `cons.d`;
    /// [`StateConverter::cons_to_prim`] takes care of that.
    pub fn cons_to_prim_with_invariants(
        &self,
        cons: &ConservedState,
        inv: SrInvariants,
    ) -> Conversion {
        let eos = &self.eos;
        let mut cons = *cons;
        let mut diagnostics = ConversionDiagnostics::default();

        let (d, dfloor_used) = eos.floor_density(cons.d);
        cons.d = d;
        diagnostics.dfloor_used = dfloor_used;

        let emin = eos.energy_floor() + 0.5 * inv.b2;
        if cons.e < emin {
            cons.e = emin;
            diagnostics.efloor_used = true;
        }

        // Rescale (eqs. 22-24) so the root variable and residuals are O(1).
        let isqrtd = 1.0 / d.sqrt();
        let b = cons.b * isqrtd;
        let params = MasterParams {
            b2: inv.b2 / d,
            rpar: inv.rpar * isqrtd,
            r: inv.s2.sqrt() / d,
            q: cons.e / d,
        };

        // Phase 1: the root of the bracket function bounds mu from above.
        let upper = self
            .solver
            .solve(|mu| bracket_function(mu, &params), 0.0, 1.0);
        diagnostics.record_iterations(upper.iterations);

        // Phase 2: the physical root inside [0, upper].
        let found = self.solver.solve(
            |mu| master_function(mu, &params, d, eos),
            0.0,
            upper.root,
        );
        diagnostics.record_iterations(found.iterations);

        let mu = found.root;
        let state = params.state_at(mu);
        let lor = state.w;
        let rho = d / lor; // (34)

        let mut eps = state.eps(mu);
        let epsmin = eos.specific_energy_floor(rho);
        let eps_floored = eps < epsmin;
        if eps_floored {
            eps = epsmin;
            diagnostics.efloor_used = true;
        }

        let h = 1.0 + eos.gamma * eps; // (43)
        let conv = lor / (h * lor + params.b2); // (C26)
        let u = (cons.m / d + b * (params.rpar / (h * lor))) * conv;

        let prim = PrimitiveState::new(rho, u, rho * eps);
        if eps_floored {
            cons.e = self.prim_to_cons(&prim, &cons.b).e;
        }

        Conversion {
            cons,
            prim,
            diagnostics,
        }
    }
}

impl StateConverter for IdealSrMhd {
    fn cons_to_prim(&self, cons: &ConservedState) -> Conversion {
        let (d, _) = self.eos.floor_density(cons.d);
        let inv = SrInvariants::from_conserved(&ConservedState { d, ..*cons });
        self.cons_to_prim_with_invariants(cons, inv)
    }

    fn prim_to_cons(&self, prim: &PrimitiveState, b: &Vector3<f64>) -> ConservedState {
        let gam = self.eos.gamma;
        let u0 = prim.lorentz_factor();

        // 4-magnetic field
        let b0 = b.dot(&prim.v);
        let bi = (b + prim.v * b0) / u0;
        let b_sq = -b0 * b0 + bi.norm_squared();

        let wtot_u02 = (prim.d + gam * prim.e + b_sq) * u0 * u0;
        let d = prim.d * u0;
        ConservedState {
            d,
            m: prim.v * (wtot_u02 / u0) - bi * b0,
            e: wtot_u02 - b0 * b0 - ((gam - 1.0) * prim.e + 0.5 * b_sq) - d,
            b: *b,
        }
    }
}
