mod layout;

use layout::{
    pack_conserved, pack_primitive, unpack_conserved, unpack_fields, unpack_metrics,
    unpack_primitive,
};
use primvar_core::batch::{
    cons_to_prim_batch, prim_to_cons_batch, prim_to_cons_gr_batch, BatchConfig,
};
use primvar_core::grmhd::IdealGrMhd;
use primvar_core::newtonian::IdealMhd;
use primvar_core::srmhd::IdealSrMhd;
use js_sys::Float64Array;
use primvar_core::{ConversionDiagnostics, Dynamics, EosParams, HydroConfig, PrimitiveState};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmConverter {
    converter: ConverterKind,
    batch: BatchConfig,
}

enum ConverterKind {
    Newtonian(IdealMhd),
    SpecialRelativistic(IdealSrMhd),
    GeneralRelativistic(IdealGrMhd),
}

/// Result payload of a conserved-to-primitive pass.
#[derive(Debug, Serialize)]
pub(crate) struct ConversionOutput {
    prims: Vec<f64>,
    /// Floor-corrected conserved array.
    cons: Vec<f64>,
    dfloor_used: bool,
    efloor_used: bool,
    max_iter: u32,
}

fn parse_dynamics(name: &str) -> anyhow::Result<Dynamics> {
    match name {
        "newtonian" => Ok(Dynamics::Newtonian),
        "special_relativistic" | "sr" => Ok(Dynamics::SpecialRelativistic),
        "general_relativistic" | "gr" => Ok(Dynamics::GeneralRelativistic),
        other => anyhow::bail!("Unknown dynamics '{other}'"),
    }
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

impl WasmConverter {
    pub(crate) fn from_config(config: HydroConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let converter = match config.dynamics {
            Dynamics::Newtonian => ConverterKind::Newtonian(IdealMhd::new(config.eos)),
            Dynamics::SpecialRelativistic => {
                ConverterKind::SpecialRelativistic(IdealSrMhd::new(config.eos))
            }
            Dynamics::GeneralRelativistic => {
                ConverterKind::GeneralRelativistic(IdealGrMhd::new(config.eos))
            }
        };
        Ok(Self {
            converter,
            batch: config.batch,
        })
    }

    pub(crate) fn convert_cons(&self, cons: &[f64]) -> anyhow::Result<ConversionOutput> {
        let mut cells = unpack_conserved(cons)?;
        let mut prims = vec![PrimitiveState::new(0.0, Default::default(), 0.0); cells.len()];
        let diagnostics: ConversionDiagnostics = match &self.converter {
            ConverterKind::Newtonian(c) => {
                cons_to_prim_batch(c, &mut cells, &mut prims, &self.batch)?
            }
            ConverterKind::SpecialRelativistic(c) => {
                cons_to_prim_batch(c, &mut cells, &mut prims, &self.batch)?
            }
            ConverterKind::GeneralRelativistic(_) => {
                anyhow::bail!("Conserved-to-primitive inversion is not available in general relativity")
            }
        };
        Ok(ConversionOutput {
            prims: pack_primitive(&prims),
            cons: pack_conserved(&cells),
            dfloor_used: diagnostics.dfloor_used,
            efloor_used: diagnostics.efloor_used,
            max_iter: diagnostics.max_iter,
        })
    }

    pub(crate) fn convert_prim(
        &self,
        prims: &[f64],
        bfield: &[f64],
        metric_lower: Option<&[f64]>,
    ) -> anyhow::Result<Vec<f64>> {
        let prims = unpack_primitive(prims)?;
        let mut cells = unpack_fields(bfield, prims.len())?;
        match (&self.converter, metric_lower) {
            (ConverterKind::Newtonian(c), None) => {
                prim_to_cons_batch(c, &prims, &mut cells, &self.batch)?
            }
            (ConverterKind::SpecialRelativistic(c), None) => {
                prim_to_cons_batch(c, &prims, &mut cells, &self.batch)?
            }
            (ConverterKind::GeneralRelativistic(c), Some(metric)) => {
                let metrics = unpack_metrics(metric, prims.len())?;
                prim_to_cons_gr_batch(c, &prims, &metrics, &mut cells, &self.batch)?
            }
            (ConverterKind::GeneralRelativistic(_), None) => {
                anyhow::bail!("General relativistic conversion needs a metric per cell")
            }
            (_, Some(_)) => anyhow::bail!("A metric is only accepted in general relativity"),
        }
        Ok(pack_conserved(&cells))
    }
}

#[wasm_bindgen]
impl WasmConverter {
    #[wasm_bindgen(constructor)]
    pub fn new(gamma: f64, dfloor: f64, pfloor: f64, dynamics: &str) -> Result<WasmConverter, JsValue> {
        console_error_panic_hook::set_once();

        let config = HydroConfig {
            eos: EosParams {
                gamma,
                dfloor,
                pfloor,
            },
            dynamics: parse_dynamics(dynamics).map_err(to_js_error)?,
            ..HydroConfig::default()
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// Builds a converter from a serialized `HydroConfig`.
    pub fn with_config(config: JsValue) -> Result<WasmConverter, JsValue> {
        console_error_panic_hook::set_once();

        let config: HydroConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {e}")))?;
        Self::from_config(config).map_err(to_js_error)
    }

    pub fn cons_to_prim(&self, cons: Vec<f64>) -> Result<JsValue, JsValue> {
        let output = self.convert_cons(&cons).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&output)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    pub fn prim_to_cons(&self, prims: Vec<f64>, bfield: Vec<f64>) -> Result<Float64Array, JsValue> {
        let cons = self.convert_prim(&prims, &bfield, None).map_err(to_js_error)?;
        Ok(Float64Array::from(cons.as_slice()))
    }

    pub fn prim_to_cons_gr(
        &self,
        prims: Vec<f64>,
        bfield: Vec<f64>,
        metric_lower: Vec<f64>,
    ) -> Result<Float64Array, JsValue> {
        let cons = self
            .convert_prim(&prims, &bfield, Some(&metric_lower))
            .map_err(to_js_error)?;
        Ok(Float64Array::from(cons.as_slice()))
    }

    pub fn set_min_parallel_size(&mut self, size: usize) {
        self.batch.min_parallel_size = size;
    }
}
