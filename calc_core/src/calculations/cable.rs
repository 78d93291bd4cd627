//! # Cable Sizing
//!
//! Resolves the minimum conductor size for a circuit from its design current,
//! then checks the voltage drop over the cable run.
//!
//! ## Assumptions
//!
//! - Two-core PVC twin & earth, single ampacity table for all methods
//! - Installation method is reported but does not change the lookup
//! - No grouping, ambient-temperature or thermal-insulation derating
//! - Voltage drop limit of 3% for lighting circuits, 5% otherwise
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::cable::{CableEngine, CableForm};
//! use calc_core::settings::CalculatorSettings;
//!
//! let engine = CableEngine::with_defaults(&CalculatorSettings::default()).unwrap();
//!
//! let form = CableForm {
//!     current_a: Some("32".into()),
//!     length_m: Some("20".into()),
//!     method: Some("C".to_string()),
//!     ..CableForm::default()
//! };
//!
//! let result = engine.calculate_form(&form).unwrap();
//! assert_eq!(result.derived().size_mm2.0, 6.0);
//! assert!(result.summary().contains("6mm²"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::fields::{optional_text, FieldReader, FormValue};
use crate::errors::{CalcError, CalcResult};
use crate::reference::{
    AmpacityTable, SizeLookup, VoltageDropTable, DEFAULT_AMPACITY, DEFAULT_VOLTAGE_DROP,
};
use crate::result::CalculationResult;
use crate::rules::{Rule, RuleSet, Severity, WarningCode};
use crate::settings::{CableSettings, CalculatorSettings};
use crate::units::{Amps, Kilowatts, Metres, SqMm, Volts};

/// Reference installation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallationMethod {
    /// Enclosed in conduit or trunking
    B,
    /// Clipped direct to a surface
    C,
    /// Free air or perforated cable tray
    E,
}

impl InstallationMethod {
    pub fn code(&self) -> &'static str {
        match self {
            InstallationMethod::B => "B",
            InstallationMethod::C => "C",
            InstallationMethod::E => "E",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InstallationMethod::B => "enclosed in conduit",
            InstallationMethod::C => "clipped direct",
            InstallationMethod::E => "free air / cable tray",
        }
    }

    /// Parse "C", "c" or "Method C"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("METHOD").unwrap_or(upper.as_str()).trim() {
            "B" => Ok(InstallationMethod::B),
            "C" => Ok(InstallationMethod::C),
            "E" => Ok(InstallationMethod::E),
            _ => Err(CalcError::invalid_input("method", s, "Expected one of: B, C, E")),
        }
    }
}

impl Default for InstallationMethod {
    fn default() -> Self {
        InstallationMethod::C
    }
}

impl fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method {}", self.code())
    }
}

/// Standard supply the circuit runs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Supply {
    SinglePhase,
    ThreePhase,
}

impl Supply {
    pub fn voltage(&self, settings: &CableSettings) -> Volts {
        match self {
            Supply::SinglePhase => Volts(settings.single_phase_voltage_v),
            Supply::ThreePhase => Volts(settings.three_phase_voltage_v),
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "single-phase" | "single" | "1" | "1-phase" | "230" | "230v" => Ok(Supply::SinglePhase),
            "three-phase" | "three" | "3" | "3-phase" | "400" | "400v" => Ok(Supply::ThreePhase),
            _ => Err(CalcError::invalid_input(
                "supply",
                s,
                "Expected single-phase (230V) or three-phase (400V)",
            )),
        }
    }
}

impl Default for Supply {
    fn default() -> Self {
        Supply::SinglePhase
    }
}

/// How the circuit load was given
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CircuitLoad {
    Current(Amps),
    Power(Kilowatts),
}

/// Raw cable calculator form.
///
/// ## JSON Example
///
/// ```json
/// {
///   "power_kw": "7.36",
///   "length_m": 20,
///   "method": "C",
///   "supply": "single-phase",
///   "is_lighting": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableForm {
    /// Load current (A); takes precedence over `power_kw`
    pub current_a: Option<FormValue>,
    /// Load power (kW), converted at the supply voltage
    pub power_kw: Option<FormValue>,
    /// Cable run length (m)
    pub length_m: Option<FormValue>,
    /// Installation method code (B, C, E); defaults to C
    pub method: Option<String>,
    /// Supply selection; defaults to single-phase
    pub supply: Option<String>,
    /// Lighting circuit (tighter voltage-drop limit)
    pub is_lighting: bool,
}

impl CableForm {
    /// Turn raw form input into a validated [`CableInput`].
    pub fn normalize(&self) -> CalcResult<CableInput> {
        let mut reader = FieldReader::new();

        let positive =
            |raw: Option<&FormValue>| raw.and_then(FormValue::as_number).filter(|n| *n > 0.0);
        let current = positive(self.current_a.as_ref());
        let power = positive(self.power_kw.as_ref());
        let load = match (current, power) {
            (Some(a), _) => Some(CircuitLoad::Current(Amps(a))),
            (None, Some(kw)) => Some(CircuitLoad::Power(Kilowatts(kw))),
            (None, None) => {
                reader.mark_missing("current_a or power_kw");
                None
            }
        };
        let length = reader.positive("length_m", self.length_m.as_ref());
        reader.finish()?;

        let (Some(load), Some(length)) = (load, length) else {
            return Err(CalcError::incomplete(["current_a or power_kw", "length_m"]));
        };

        let method = optional_text(self.method.as_deref())
            .map(InstallationMethod::from_str_flexible)
            .transpose()?
            .unwrap_or_default();
        let supply = optional_text(self.supply.as_deref())
            .map(Supply::from_str_flexible)
            .transpose()?
            .unwrap_or_default();

        let input = CableInput {
            load,
            length: Metres(length),
            method,
            supply,
            is_lighting: self.is_lighting,
        };
        input.validate()?;
        Ok(input)
    }
}

/// Validated cable sizing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableInput {
    pub load: CircuitLoad,
    pub length: Metres,
    pub method: InstallationMethod,
    pub supply: Supply,
    pub is_lighting: bool,
}

impl CableInput {
    /// Validate input parameters.
    ///
    /// A load or length that is not greater than zero leaves the circuit
    /// not yet calculable, reported as [`CalcError::IncompleteInput`].
    pub fn validate(&self) -> CalcResult<()> {
        let mut reader = FieldReader::new();
        let (field, load) = match self.load {
            CircuitLoad::Current(a) => ("current_a", a.0),
            CircuitLoad::Power(kw) => ("power_kw", kw.0),
        };
        if !(load > 0.0) {
            reader.mark_missing(field);
        }
        if !(self.length.0 > 0.0) {
            reader.mark_missing("length_m");
        }
        reader.finish()
    }

    /// Design current: the given current, or A = kW·1000 / V
    pub fn design_current(&self, settings: &CableSettings) -> Amps {
        match self.load {
            CircuitLoad::Current(a) => a,
            CircuitLoad::Power(kw) => kw.at_voltage(self.supply.voltage(settings)),
        }
    }
}

/// Cable sizing outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableDerived {
    /// Design current (A)
    pub current_a: Amps,
    /// Supply voltage used for conversion and drop percentage (V)
    pub supply_voltage_v: Volts,
    /// Cable run (m)
    pub length_m: Metres,
    pub method: InstallationMethod,
    /// Lighting circuit flag, carried through unchanged
    pub is_lighting: bool,
    /// Minimum conductor size by ampacity
    pub size_mm2: SqMm,
    /// False when the current exceeded the table and was clamped
    pub within_table: bool,
    /// Highest tabulated current bound (A)
    pub table_limit_a: Amps,
    /// Voltage drop over the run at the resolved size (V)
    pub voltage_drop_v: f64,
    /// Voltage drop as a percentage of supply
    pub voltage_drop_percent: f64,
    /// Applicable drop limit (% of supply)
    pub voltage_drop_limit_percent: f64,
    /// Smallest size meeting both ampacity and drop limit; `None` if no tabulated size does
    pub size_for_voltage_drop: Option<SqMm>,
}

impl CableDerived {
    pub fn voltage_drop_ok(&self) -> bool {
        self.voltage_drop_percent <= self.voltage_drop_limit_percent
    }
}

pub type CableResult = CalculationResult<CableDerived>;

/// Checks applied to every cable result
pub fn cable_rules() -> RuleSet<CableDerived> {
    RuleSet::new(vec![
        Rule::new(
            WarningCode::CurrentExceedsTable,
            Severity::Critical,
            |d: &CableDerived| !d.within_table,
            |d: &CableDerived| {
                format!(
                    "Current {:.1}A exceeds the largest tabulated rating of {}A; \
                     {} is the largest modelled size and specialist sizing is required",
                    d.current_a.0, d.table_limit_a.0, d.size_mm2
                )
            },
        ),
        Rule::new(
            WarningCode::VoltageDropExceeded,
            Severity::Warning,
            |d: &CableDerived| !d.voltage_drop_ok(),
            |d: &CableDerived| {
                let remedy = match d.size_for_voltage_drop {
                    Some(size) => format!("upsize to {}", size),
                    None => "no tabulated size is sufficient; shorten the run or split the load"
                        .to_string(),
                };
                format!(
                    "Voltage drop {:.2}V ({:.2}%) exceeds the {}% limit for {} circuits; {}",
                    d.voltage_drop_v,
                    d.voltage_drop_percent,
                    d.voltage_drop_limit_percent,
                    if d.is_lighting { "lighting" } else { "power" },
                    remedy
                )
            },
        ),
    ])
}

/// Current-to-size resolver with voltage-drop check.
#[derive(Debug, Clone)]
pub struct CableEngine<'a> {
    ampacity: &'a AmpacityTable,
    voltage_drop: &'a VoltageDropTable,
    settings: CableSettings,
    rules: RuleSet<CableDerived>,
}

impl CableEngine<'static> {
    /// Engine over the built-in tables
    pub fn with_defaults(settings: &CalculatorSettings) -> CalcResult<Self> {
        CableEngine::new(&DEFAULT_AMPACITY, &DEFAULT_VOLTAGE_DROP, settings)
    }
}

impl<'a> CableEngine<'a> {
    /// Build an engine; every size the ampacity table can return needs a drop figure.
    pub fn new(
        ampacity: &'a AmpacityTable,
        voltage_drop: &'a VoltageDropTable,
        settings: &CalculatorSettings,
    ) -> CalcResult<Self> {
        if let Some(size) = ampacity
            .sizes()
            .find(|size| voltage_drop.mv_per_amp_metre(*size).is_none())
        {
            return Err(CalcError::invalid_table(
                "voltage_drop",
                format!("No mV/A/m figure for {}", size),
            ));
        }
        Ok(CableEngine {
            ampacity,
            voltage_drop,
            settings: settings.cable.clone(),
            rules: cable_rules(),
        })
    }

    /// Replace the rule set (e.g. to drop the voltage-drop check)
    pub fn with_rules(mut self, rules: RuleSet<CableDerived>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleSet<CableDerived> {
        &self.rules
    }

    /// Smallest tabulated size rated for `current`
    pub fn resolve_size(&self, current: Amps) -> SizeLookup {
        self.ampacity.resolve(current)
    }

    /// Normalize a raw form and calculate.
    pub fn calculate_form(&self, form: &CableForm) -> CalcResult<CableResult> {
        let input = form.normalize()?;
        self.calculate(&input)
    }

    /// Size the cable and check voltage drop.
    pub fn calculate(&self, input: &CableInput) -> CalcResult<CableResult> {
        input.validate()?;

        let current = input.design_current(&self.settings);
        let voltage = input.supply.voltage(&self.settings);
        debug!(
            current_a = current.0,
            length_m = input.length.0,
            method = input.method.code(),
            "sizing cable"
        );

        let lookup = self.resolve_size(current);
        if !lookup.within_table {
            warn!(
                current_a = current.0,
                table_limit_a = self.ampacity.top_bound().0,
                "current above ampacity table, clamped to {}",
                lookup.size
            );
        }

        let limit_percent = if input.is_lighting {
            self.settings.lighting_drop_limit_percent
        } else {
            self.settings.power_drop_limit_percent
        };
        let (voltage_drop_v, voltage_drop_percent) =
            self.voltage_drop(lookup.size, current, input.length, voltage)?;

        let mut size_for_voltage_drop = None;
        for size in self.ampacity.sizes().filter(|s| *s >= lookup.size) {
            let (_, percent) = self.voltage_drop(size, current, input.length, voltage)?;
            if percent <= limit_percent {
                size_for_voltage_drop = Some(size);
                break;
            }
        }

        let derived = CableDerived {
            current_a: current,
            supply_voltage_v: voltage,
            length_m: input.length,
            method: input.method,
            is_lighting: input.is_lighting,
            size_mm2: lookup.size,
            within_table: lookup.within_table,
            table_limit_a: self.ampacity.top_bound(),
            voltage_drop_v,
            voltage_drop_percent,
            voltage_drop_limit_percent: limit_percent,
            size_for_voltage_drop,
        };
        debug!(?derived, "cable derived quantities");

        let warnings = self.rules.evaluate(&derived);
        let summary = summarize(&derived);
        Ok(CalculationResult::assemble(derived, warnings, summary))
    }

    /// Vd = mV/A/m × I × L / 1000, and as a percentage of supply
    fn voltage_drop(
        &self,
        size: SqMm,
        current: Amps,
        length: Metres,
        voltage: Volts,
    ) -> CalcResult<(f64, f64)> {
        let mv_per_amp_metre = self
            .voltage_drop
            .mv_per_amp_metre(size)
            .ok_or_else(|| {
                CalcError::invalid_table("voltage_drop", format!("No mV/A/m figure for {}", size))
            })?;
        let drop_v = mv_per_amp_metre * current.0 * length.0 / 1000.0;
        Ok((drop_v, drop_v / voltage.0 * 100.0))
    }
}

fn summarize(d: &CableDerived) -> String {
    let circuit = if d.is_lighting { "lighting circuit" } else { "load" };
    format!(
        "{} cable recommended for {:.1}A {} over {}m run ({}, {}); voltage drop {:.1}%",
        d.size_mm2,
        d.current_a.0,
        circuit,
        d.length_m.0,
        d.method,
        d.method.description(),
        d.voltage_drop_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> CableEngine<'static> {
        CableEngine::with_defaults(&CalculatorSettings::default()).unwrap()
    }

    fn form(current: &str, length: &str) -> CableForm {
        CableForm {
            current_a: Some(current.into()),
            length_m: Some(length.into()),
            method: Some("C".to_string()),
            ..CableForm::default()
        }
    }

    #[test]
    fn test_scenario_32a_method_c() {
        let result = engine().calculate_form(&form("32", "20")).unwrap();
        let d = result.derived();
        assert_eq!(d.size_mm2, SqMm(6.0));
        assert!(result.summary().contains("6mm²"));
        assert!(result.summary().contains("32"));
        assert!(result.summary().contains("Method C"));
        assert!(result.is_clear());
    }

    #[test]
    fn test_scenario_power_input() {
        let form = CableForm {
            power_kw: Some("7.36".into()),
            length_m: Some(FormValue::Number(20.0)),
            method: Some("C".to_string()),
            supply: Some("single-phase".to_string()),
            ..CableForm::default()
        };
        let result = engine().calculate_form(&form).unwrap();
        assert_relative_eq!(result.derived().current_a.0, 32.0, epsilon = 1e-9);
        assert_eq!(result.derived().size_mm2, SqMm(6.0));
        assert!(result.summary().contains("Method C"));
    }

    #[test]
    fn test_three_phase_conversion() {
        let form = CableForm {
            power_kw: Some("10".into()),
            length_m: Some("10".into()),
            supply: Some("three-phase".to_string()),
            ..CableForm::default()
        };
        let result = engine().calculate_form(&form).unwrap();
        // 10 kW at 400 V = 25 A -> 6mm²
        assert_relative_eq!(result.derived().current_a.0, 25.0);
        assert_eq!(result.derived().size_mm2, SqMm(6.0));
        assert_eq!(result.derived().supply_voltage_v, Volts(400.0));
    }

    #[test]
    fn test_current_takes_precedence_over_power() {
        let mut f = form("10", "5");
        f.power_kw = Some("20".into());
        let result = engine().calculate_form(&f).unwrap();
        assert_eq!(result.derived().size_mm2, SqMm(1.5));
    }

    #[test]
    fn test_boundary_inclusive() {
        let e = engine();
        assert_eq!(e.resolve_size(Amps(13.5)).size, SqMm(1.5));
        assert_eq!(e.resolve_size(Amps(13.50001)).size, SqMm(2.5));
    }

    #[test]
    fn test_missing_fields_incomplete() {
        let err = engine().calculate_form(&CableForm::default()).unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(err, CalcError::incomplete(["current_a or power_kw", "length_m"]));

        let err = engine().calculate_form(&form("lots", "20")).unwrap_err();
        assert_eq!(err, CalcError::incomplete(["current_a or power_kw"]));
    }

    #[test]
    fn test_non_positive_values_are_incomplete() {
        let e = engine();
        let err = e.calculate_form(&form("20", "0")).unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(err, CalcError::incomplete(["length_m"]));

        let err = e.calculate_form(&form("-5", "10")).unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(err, CalcError::incomplete(["current_a or power_kw"]));

        let err = e.calculate_form(&form("0", "-1")).unwrap_err();
        assert_eq!(err, CalcError::incomplete(["current_a or power_kw", "length_m"]));
    }

    #[test]
    fn test_zero_current_falls_back_to_power() {
        let mut f = form("0", "20");
        f.power_kw = Some("7.36".into());
        let result = engine().calculate_form(&f).unwrap();
        assert_eq!(result.derived().size_mm2, SqMm(6.0));
    }

    #[test]
    fn test_direct_input_with_zero_length_is_incomplete() {
        let input = CableInput {
            load: CircuitLoad::Current(Amps(20.0)),
            length: Metres(0.0),
            method: InstallationMethod::C,
            supply: Supply::SinglePhase,
            is_lighting: false,
        };
        let err = engine().calculate(&input).unwrap_err();
        assert_eq!(err, CalcError::incomplete(["length_m"]));
    }

    #[test]
    fn test_unknown_method_invalid() {
        let mut f = form("20", "10");
        f.method = Some("Z".to_string());
        assert_eq!(engine().calculate_form(&f).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            InstallationMethod::from_str_flexible("method b").unwrap(),
            InstallationMethod::B
        );
        assert_eq!(InstallationMethod::from_str_flexible(" e ").unwrap(), InstallationMethod::E);
        assert_eq!(InstallationMethod::C.to_string(), "Method C");
    }

    #[test]
    fn test_lighting_flag_does_not_change_size() {
        let mut lighting = form("16", "30");
        lighting.is_lighting = true;
        let power = form("16", "30");
        let a = engine().calculate_form(&lighting).unwrap();
        let b = engine().calculate_form(&power).unwrap();
        assert_eq!(a.derived().size_mm2, b.derived().size_mm2);
        assert!(a.derived().is_lighting);
        assert_eq!(a.derived().voltage_drop_limit_percent, 3.0);
        assert_eq!(b.derived().voltage_drop_limit_percent, 5.0);
    }

    #[test]
    fn test_voltage_drop_warning_and_upsize() {
        // 16 A on 2.5mm² over 30 m: 18 × 16 × 30 / 1000 = 8.64 V = 3.76%
        let mut lighting = form("16", "30");
        lighting.is_lighting = true;
        let result = engine().calculate_form(&lighting).unwrap();
        let d = result.derived();
        assert_eq!(d.size_mm2, SqMm(2.5));
        assert_relative_eq!(d.voltage_drop_v, 8.64, epsilon = 1e-9);
        assert!(result.has_warning(WarningCode::VoltageDropExceeded));
        // 4mm²: 11 × 16 × 30 / 1000 = 5.28 V = 2.3% -> within 3%
        assert_eq!(d.size_for_voltage_drop, Some(SqMm(4.0)));

        let power = engine().calculate_form(&form("16", "30")).unwrap();
        assert!(power.is_clear());
        assert_eq!(power.derived().size_for_voltage_drop, Some(SqMm(2.5)));
    }

    #[test]
    fn test_voltage_drop_unresolvable() {
        let result = engine().calculate_form(&form("70", "400")).unwrap();
        assert!(result.has_warning(WarningCode::VoltageDropExceeded));
        assert_eq!(result.derived().size_for_voltage_drop, None);
    }

    #[test]
    fn test_out_of_table_clamps_with_warning() {
        let result = engine().calculate_form(&form("100", "5")).unwrap();
        assert_eq!(result.derived().size_mm2, SqMm(35.0));
        assert!(!result.derived().within_table);
        assert!(result.has_warning(WarningCode::CurrentExceedsTable));
        assert_eq!(result.highest_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_rules_can_be_removed() {
        let e = engine().with_rules(cable_rules().without(WarningCode::CurrentExceedsTable));
        let result = e.calculate_form(&form("100", "5")).unwrap();
        assert!(!result.has_warning(WarningCode::CurrentExceedsTable));
    }

    #[test]
    fn test_engine_rejects_missing_drop_figures() {
        let drops = VoltageDropTable::new(Vec::new()).unwrap();
        let settings = CalculatorSettings::default();
        let err = CableEngine::new(&DEFAULT_AMPACITY, &drops, &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TABLE");
    }

    #[test]
    fn test_form_json() {
        let form: CableForm =
            serde_json::from_str(r#"{"current_a": 32, "length_m": "20", "method": "C"}"#).unwrap();
        assert_eq!(engine().calculate_form(&form).unwrap().derived().size_mm2, SqMm(6.0));
    }
}
