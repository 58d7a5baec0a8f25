//! Ideal-gas equation of state parameters, run configuration and the floor
//! policy shared by every converter.

use crate::batch::BatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("adiabatic index must be finite and greater than one, got {0}")]
    InvalidGamma(f64),
    #[error("density floor must be finite and positive, got {0}")]
    InvalidDensityFloor(f64),
    #[error("pressure floor must be finite and non-negative, got {0}")]
    InvalidPressureFloor(f64),
}

/// Equation of state parameters. Set once per run and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EosParams {
    pub gamma: f64,
    pub dfloor: f64,
    pub pfloor: f64,
}

impl Default for EosParams {
    fn default() -> Self {
        Self {
            gamma: 5.0 / 3.0,
            dfloor: 1.0e-8,
            pfloor: 1.0e-10,
        }
    }
}

impl EosParams {
    pub fn new(gamma: f64, dfloor: f64, pfloor: f64) -> Result<Self, ConfigError> {
        let eos = Self {
            gamma,
            dfloor,
            pfloor,
        };
        eos.validate()?;
        Ok(eos)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gamma.is_finite() || self.gamma <= 1.0 {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if !self.dfloor.is_finite() || self.dfloor <= 0.0 {
            return Err(ConfigError::InvalidDensityFloor(self.dfloor));
        }
        if !self.pfloor.is_finite() || self.pfloor < 0.0 {
            return Err(ConfigError::InvalidPressureFloor(self.pfloor));
        }
        Ok(())
    }

    /// Clamps `d` to the density floor. Returns the floored density and
    /// whether the floor was applied.
    pub fn floor_density(&self, d: f64) -> (f64, bool) {
        if d < self.dfloor {
            (self.dfloor, true)
        } else {
            (d, false)
        }
    }

    /// Internal energy density implied by the pressure floor.
    pub fn energy_floor(&self) -> f64 {
        self.pfloor / (self.gamma - 1.0)
    }

    /// Specific internal energy implied by the pressure floor at rest density `rho`.
    pub fn specific_energy_floor(&self, rho: f64) -> f64 {
        self.pfloor / (rho * (self.gamma - 1.0))
    }

    pub fn pressure(&self, e_int: f64) -> f64 {
        (self.gamma - 1.0) * e_int
    }

    /// Adiabatic sound speed of a Newtonian gas.
    pub fn sound_speed(&self, p: f64, d: f64) -> f64 {
        (self.gamma * p / d).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dynamics {
    #[default]
    Newtonian,
    SpecialRelativistic,
    GeneralRelativistic,
}

impl Dynamics {
    pub fn is_relativistic(&self) -> bool {
        !matches!(self, Dynamics::Newtonian)
    }
}

/// Run-level configuration of the conversion layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    pub eos: EosParams,
    pub dynamics: Dynamics,
    pub batch: BatchConfig,
}

impl HydroConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.eos.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EosParams::default().validate().is_ok());
        assert!(HydroConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            EosParams::new(1.0, 1e-8, 0.0),
            Err(ConfigError::InvalidGamma(1.0))
        );
        assert_eq!(
            EosParams::new(1.4, 0.0, 0.0),
            Err(ConfigError::InvalidDensityFloor(0.0))
        );
        assert_eq!(
            EosParams::new(1.4, 1e-8, -1.0),
            Err(ConfigError::InvalidPressureFloor(-1.0))
        );
        assert!(EosParams::new(f64::NAN, 1e-8, 0.0).is_err());
    }

    #[test]
    fn error_messages_name_the_parameter() {
        let err = EosParams::new(1.4, -2.0, 0.0).unwrap_err();
        assert!(format!("{err}").contains("density floor"));
    }

    #[test]
    fn density_floor_never_decreases_density() {
        let eos = EosParams::default();
        assert_eq!(eos.floor_density(-1.0), (eos.dfloor, true));
        assert_eq!(eos.floor_density(0.5), (0.5, false));
        assert_eq!(eos.floor_density(eos.dfloor), (eos.dfloor, false));
    }

    #[test]
    fn floors_follow_pressure_floor() {
        let eos = EosParams::new(1.5, 1e-8, 2e-3).unwrap();
        assert!((eos.energy_floor() - 4e-3).abs() < 1e-15);
        assert!((eos.specific_energy_floor(2.0) - 2e-3).abs() < 1e-15);
    }

    #[test]
    fn sound_speed_of_unit_state() {
        let eos = EosParams::new(1.4, 1e-8, 0.0).unwrap();
        let p = eos.pressure(2.5);
        assert!((p - 1.0).abs() < 1e-15);
        assert!((eos.sound_speed(p, 1.0) - 1.4f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: HydroConfig =
            serde_json::from_str(r#"{"eos":{"gamma":1.4},"dynamics":"special_relativistic"}"#)
                .expect("config should parse");
        assert_eq!(config.dynamics, Dynamics::SpecialRelativistic);
        assert!(config.dynamics.is_relativistic());
        assert_eq!(config.eos.gamma, 1.4);
        assert_eq!(config.eos.dfloor, EosParams::default().dfloor);
        assert_eq!(config.batch, BatchConfig::default());
    }
}
