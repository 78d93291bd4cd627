//! # Calculator Settings
//!
//! Tunable constants shared by the calculators: supply voltages, voltage-drop
//! limits, scaffold module sizes and unit costs, surface resistances.
//! Everything has a sensible default, so an empty TOML file is valid.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::settings::CalculatorSettings;
//!
//! let settings = CalculatorSettings::from_toml_str(r#"
//!     currency = "€"
//!
//!     [scaffold]
//!     tube_cost = 21.0
//! "#).unwrap();
//!
//! assert_eq!(settings.currency, "€");
//! assert_eq!(settings.scaffold.tube_cost, 21.0);
//! assert_eq!(settings.scaffold.bay_length_m, 2.5);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

/// Shortest scaffold module, tube, board or tie spacing accepted (m)
pub const MIN_MODULE_LENGTH_M: f64 = 0.1;
/// Longest scaffold module, tube, board or tie spacing accepted (m)
pub const MAX_MODULE_LENGTH_M: f64 = 20.0;

/// Root settings container handed to every engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Currency symbol used in summaries and cost fields
    pub currency: String,

    /// Cable sizing settings
    pub cable: CableSettings,

    /// U-value solver settings
    pub u_value: UValueSettings,

    /// Scaffold take-off settings
    pub scaffold: ScaffoldSettings,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            currency: "£".to_string(),
            cable: CableSettings::default(),
            u_value: UValueSettings::default(),
            scaffold: ScaffoldSettings::default(),
        }
    }
}

impl CalculatorSettings {
    /// Parse settings from a TOML document and validate them.
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let settings: CalculatorSettings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), "loaded calculator settings");
        Ok(settings)
    }

    /// Check that every length, voltage and limit is usable.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("cable.single_phase_voltage_v", self.cable.single_phase_voltage_v),
            ("cable.three_phase_voltage_v", self.cable.three_phase_voltage_v),
            ("cable.lighting_drop_limit_percent", self.cable.lighting_drop_limit_percent),
            ("cable.power_drop_limit_percent", self.cable.power_drop_limit_percent),
        ];
        check_positive(positive)?;
        check_non_negative([
            ("u_value.r_si_floor", self.u_value.r_si_floor),
            ("u_value.r_si_other", self.u_value.r_si_other),
            ("u_value.r_se", self.u_value.r_se),
            ("u_value.r_construction", self.u_value.r_construction),
        ])?;
        self.scaffold.validate()
    }
}

fn check_positive<const N: usize>(values: [(&str, f64); N]) -> CalcResult<()> {
    for (field, value) in values {
        if !(value > 0.0) {
            return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
        }
    }
    Ok(())
}

fn check_non_negative<const N: usize>(values: [(&str, f64); N]) -> CalcResult<()> {
    for (field, value) in values {
        if !(value >= 0.0) {
            return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
        }
    }
    Ok(())
}

/// Supply voltages and voltage-drop limits for cable sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableSettings {
    /// Standard single-phase supply (V)
    pub single_phase_voltage_v: f64,
    /// Standard three-phase supply (V)
    pub three_phase_voltage_v: f64,
    /// Maximum voltage drop on lighting circuits (% of supply)
    pub lighting_drop_limit_percent: f64,
    /// Maximum voltage drop on all other circuits (% of supply)
    pub power_drop_limit_percent: f64,
}

impl Default for CableSettings {
    fn default() -> Self {
        CableSettings {
            single_phase_voltage_v: 230.0,
            three_phase_voltage_v: 400.0,
            lighting_drop_limit_percent: 3.0,
            power_drop_limit_percent: 5.0,
        }
    }
}

/// Fixed resistances of the simplified U-value model (m²K/W).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UValueSettings {
    /// Internal surface resistance for floors
    pub r_si_floor: f64,
    /// Internal surface resistance for walls and roofs
    pub r_si_other: f64,
    /// External surface resistance
    pub r_se: f64,
    /// Allowance for the non-insulation layers of the build-up
    pub r_construction: f64,
}

impl Default for UValueSettings {
    fn default() -> Self {
        UValueSettings {
            r_si_floor: 0.17,
            r_si_other: 0.13,
            r_se: 0.04,
            r_construction: 0.18,
        }
    }
}

/// Module sizes and unit costs for scaffold take-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    /// Nominal bay length (m)
    pub bay_length_m: f64,
    /// Nominal lift height (m)
    pub lift_height_m: f64,
    /// Stock tube length used to convert linear metres into tubes (m)
    pub tube_stock_length_m: f64,
    /// Tie spacing both horizontally and vertically (m)
    pub tie_spacing_m: f64,
    /// Toe board length (m)
    pub toe_board_length_m: f64,
    /// Linear metres of tube per brace (m)
    pub brace_length_m: f64,
    /// Class-3 uniform platform load (kg/m²)
    pub class3_load_kg_per_m2: f64,
    /// Cost per stock tube
    pub tube_cost: f64,
    /// Cost per fitting
    pub fitting_cost: f64,
    /// Cost per board (scaffold and toe boards)
    pub board_cost: f64,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        ScaffoldSettings {
            bay_length_m: 2.5,
            lift_height_m: 2.0,
            tube_stock_length_m: 6.3,
            tie_spacing_m: 4.0,
            toe_board_length_m: 3.9,
            brace_length_m: 3.0,
            class3_load_kg_per_m2: 244.0,
            tube_cost: 18.50,
            fitting_cost: 2.75,
            board_cost: 14.00,
        }
    }
}

impl ScaffoldSettings {
    /// Module lengths must keep every derived count within range.
    pub fn validate(&self) -> CalcResult<()> {
        let module_lengths = [
            ("scaffold.bay_length_m", self.bay_length_m),
            ("scaffold.lift_height_m", self.lift_height_m),
            ("scaffold.tube_stock_length_m", self.tube_stock_length_m),
            ("scaffold.tie_spacing_m", self.tie_spacing_m),
            ("scaffold.toe_board_length_m", self.toe_board_length_m),
            ("scaffold.brace_length_m", self.brace_length_m),
        ];
        for (field, value) in module_lengths {
            if !(MIN_MODULE_LENGTH_M..=MAX_MODULE_LENGTH_M).contains(&value) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!(
                        "Must be between {} m and {} m",
                        MIN_MODULE_LENGTH_M, MAX_MODULE_LENGTH_M
                    ),
                ));
            }
        }
        check_positive([("scaffold.class3_load_kg_per_m2", self.class3_load_kg_per_m2)])?;
        check_non_negative([
            ("scaffold.tube_cost", self.tube_cost),
            ("scaffold.fitting_cost", self.fitting_cost),
            ("scaffold.board_cost", self.board_cost),
        ])
    }
}
