use crate::diagnostics::ConversionDiagnostics;
use crate::eos::EosParams;
use crate::state::{ConservedState, Conversion, PrimitiveState};
use crate::traits::StateConverter;
use nalgebra::Vector3;

/// Closed-form converter for non-relativistic ideal-gas MHD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealMhd {
    pub eos: EosParams,
}

impl IdealMhd {
    pub fn new(eos: EosParams) -> Self {
        Self { eos }
    }
}

impl StateConverter for IdealMhd {
    fn cons_to_prim(&self, cons: &ConservedState) -> Conversion {
        let mut cons = *cons;
        let mut diagnostics = ConversionDiagnostics::default();

        // Momentum and energy are left untouched by the density floor.
        let (d, dfloor_used) = self.eos.floor_density(cons.d);
        cons.d = d;
        diagnostics.dfloor_used = dfloor_used;

        let di = 1.0 / d;
        let v = cons.m * di;

        let e_k = 0.5 * di * cons.m.norm_squared();
        let e_m = cons.magnetic_energy();
        let mut e_int = cons.e - e_k - e_m;

        let efloor = self.eos.energy_floor();
        if e_int < efloor {
            e_int = efloor;
            cons.e = efloor + e_k + e_m;
            diagnostics.efloor_used = true;
        }

        Conversion {
            cons,
            prim: PrimitiveState::new(d, v, e_int),
            diagnostics,
        }
    }

    fn prim_to_cons(&self, prim: &PrimitiveState, b: &Vector3<f64>) -> ConservedState {
        ConservedState {
            d: prim.d,
            m: prim.v * prim.d,
            e: prim.e + 0.5 * (prim.d * prim.v.norm_squared() + b.norm_squared()),
            b: *b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn converter() -> IdealMhd {
        IdealMhd::new(EosParams::new(5.0 / 3.0, 1e-8, 1e-10).unwrap())
    }

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn brio_wu_left_state() {
        let mhd = IdealMhd::new(EosParams::new(2.0, 1e-8, 1e-10).unwrap());
        let b = Vector3::new(0.75, 1.0, 0.0);
        let cons = ConservedState::new(1.0, Vector3::zeros(), 1.78125, b);

        let out = mhd.cons_to_prim(&cons);
        assert_eq!(out.prim.d, 1.0);
        assert_eq!(out.prim.v, Vector3::zeros());
        assert!((out.prim.e - 1.0).abs() < 1e-14);
        assert!((mhd.eos.pressure(out.prim.e) - 1.0).abs() < 1e-14);
        assert_eq!(out.diagnostics, ConversionDiagnostics::default());
        assert_eq!(out.cons, cons);
    }

    #[test]
    fn sub_floor_density_is_clamped() {
        let mhd = converter();
        let cons = ConservedState::new(-1.0, Vector3::zeros(), 1.0, Vector3::zeros());
        let out = mhd.cons_to_prim(&cons);
        assert!(out.diagnostics.dfloor_used);
        assert!(!out.diagnostics.efloor_used);
        assert_eq!(out.prim.d, 1e-8);
        assert_eq!(out.cons.d, 1e-8);
        assert_eq!(out.cons.e, 1.0);
    }

    #[test]
    fn energy_floor_corrects_total_energy() {
        let mhd = converter();
        let m = Vector3::new(0.3, -0.2, 0.1);
        let b = Vector3::new(0.5, 0.5, -0.5);
        let cons = ConservedState::new(1.2, m, 0.0, b);
        let out = mhd.cons_to_prim(&cons);

        assert!(out.diagnostics.efloor_used);
        assert_eq!(out.prim.e, mhd.eos.energy_floor());
        let e_k = 0.5 * m.norm_squared() / 1.2;
        let e_m = 0.5 * b.norm_squared();
        assert!((out.cons.e - (mhd.eos.energy_floor() + e_k + e_m)).abs() < 1e-14);
    }

    #[test]
    fn prim_to_cons_carries_field() {
        let mhd = converter();
        let prim = PrimitiveState::new(2.0, Vector3::new(1.0, 0.0, 0.0), 3.0);
        let b = Vector3::new(0.0, 2.0, 0.0);
        let cons = mhd.prim_to_cons(&prim, &b);
        assert_eq!(cons.d, 2.0);
        assert_eq!(cons.m, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(cons.e, 3.0 + 1.0 + 2.0);
        assert_eq!(cons.b, b);
    }

    proptest! {
        #[test]
        fn round_trip_without_floors(
            d in 0.1f64..10.0,
            mx in -5.0f64..5.0,
            my in -5.0f64..5.0,
            mz in -5.0f64..5.0,
            bx in -2.0f64..2.0,
            by in -2.0f64..2.0,
            bz in -2.0f64..2.0,
            e_int in 0.01f64..10.0,
        ) {
            let mhd = converter();
            let m = Vector3::new(mx, my, mz);
            let b = Vector3::new(bx, by, bz);
            let e = e_int + 0.5 * m.norm_squared() / d + 0.5 * b.norm_squared();
            let cons = ConservedState::new(d, m, e, b);

            let out = mhd.cons_to_prim(&cons);
            prop_assert!(!out.diagnostics.any_floor_used());
            let back = mhd.prim_to_cons(&out.prim, &cons.b);

            prop_assert_eq!(back.d, cons.d);
            prop_assert_eq!(back.b, cons.b);
            for i in 0..3 {
                prop_assert!(rel_close(back.m[i], cons.m[i], 1e-13));
            }
            prop_assert!(rel_close(back.e, cons.e, 1e-12));
        }

        #[test]
        fn floors_are_monotone_and_consistent(
            d in -1.0f64..2.0,
            mx in -2.0f64..2.0,
            bx in -2.0f64..2.0,
            e in -1.0f64..5.0,
        ) {
            let mhd = converter();
            let cons = ConservedState::new(d, Vector3::new(mx, 0.0, 0.0), e, Vector3::new(bx, 0.0, 0.0));
            let out = mhd.cons_to_prim(&cons);

            prop_assert!(out.prim.d >= mhd.eos.dfloor);
            prop_assert!(out.prim.d >= d);
            prop_assert!(out.prim.e >= mhd.eos.energy_floor());

            let e_k = 0.5 * mx * mx / out.prim.d;
            let e_m = 0.5 * bx * bx;
            let unfloored = e - e_k - e_m;
            prop_assert!(out.prim.e >= unfloored - 1e-12 * unfloored.abs().max(1.0));
            if out.diagnostics.efloor_used {
                let total = out.prim.e + e_k + e_m;
                prop_assert!((out.cons.e - total).abs() <= 1e-12 * total.abs().max(1.0));
            } else {
                prop_assert_eq!(out.cons.e, e);
            }
        }
    }
}
