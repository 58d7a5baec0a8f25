//! The `primvar_core` crate converts between conserved and primitive variables of
//! ideal-gas magnetohydrodynamics, one cell at a time.
//! Every converter is a pure, allocation-free function of its inputs, so the
//! same code serves sequential loops, rayon batches and the WASM bridge.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `StateConverter` (per-cell conversion).
//! - **EOS**: `EosParams` and the density/pressure floor policy.
//! - **Converters**: `IdealMhd` (closed form), `IdealSrMhd` (two-phase Illinois root solve),
//!   `IdealGrMhd` (primitive to conserved in a given metric).
//! - **Batch**: slice-level conversion with diagnostics reduction, and `new_timestep`.
pub mod batch;
pub mod diagnostics;
pub mod eos;
pub mod grmhd;
pub mod master;
pub mod newtonian;
pub mod root;
pub mod srmhd;
pub mod state;
pub mod timestep;
pub mod traits;

pub use diagnostics::ConversionDiagnostics;
pub use eos::{ConfigError, Dynamics, EosParams, HydroConfig};
pub use state::{ConservedState, Conversion, PrimitiveState};
pub use traits::StateConverter;
