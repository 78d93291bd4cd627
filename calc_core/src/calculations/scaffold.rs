//! # Scaffold Take-Off
//!
//! Derives tube, fitting, board and tie quantities for a tube-and-fitting
//! access scaffold, estimates its cost and Class-3 platform capacity, and
//! evaluates the basic stability rules.
//!
//! ## Assumptions
//!
//! - Bays of 2.5 m and lifts of 2 m unless counts are given explicitly
//! - Full boarding (4 boards wide) on every lift, toe boards all round
//! - Ties on a 4 m × 4 m grid
//! - Tube quantities are linear metres divided by a 6.3 m stock tube,
//!   rounded up per category
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::scaffold::{ScaffoldEngine, ScaffoldForm};
//! use calc_core::rules::WarningCode;
//! use calc_core::settings::CalculatorSettings;
//!
//! let engine = ScaffoldEngine::new(&CalculatorSettings::default());
//! let form = ScaffoldForm {
//!     scaffold_type: Some("independent".to_string()),
//!     height_m: Some("20".into()),
//!     length_m: Some("20".into()),
//!     width_m: Some("1.3".into()),
//!     ..ScaffoldForm::default()
//! };
//!
//! let result = engine.calculate_form(&form).unwrap();
//! assert_eq!(result.derived().bay_count, 8);
//! assert_eq!(result.derived().max_load_kg, 6344);
//! assert!(result.has_warning(WarningCode::StabilityRatioExceeded));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::fields::{
    optional_count, optional_text, require_at_most, require_positive, FieldReader, FormValue,
};
use crate::errors::{CalcError, CalcResult};
use crate::result::CalculationResult;
use crate::rules::{Rule, RuleSet, Severity, WarningCode};
use crate::settings::{CalculatorSettings, ScaffoldSettings};
use crate::units::Metres;

/// Height above which a scaffold needs a bespoke engineered design (m)
pub const SPECIALIST_HEIGHT_M: f64 = 50.0;
/// Minimum working platform width (m)
pub const MIN_PLATFORM_WIDTH_M: f64 = 0.6;
/// Maximum height to base-width ratio
pub const MAX_HEIGHT_WIDTH_RATIO: f64 = 3.5;
/// Independent scaffolds above this height need a wider base (m)
pub const NARROW_BASE_HEIGHT_M: f64 = 30.0;
/// Minimum base width for tall independent scaffolds (m)
pub const NARROW_BASE_WIDTH_M: f64 = 1.2;

const MAX_HEIGHT_M: f64 = 200.0;
const MAX_LENGTH_M: f64 = 1000.0;
const MAX_WIDTH_M: f64 = 10.0;
const MAX_MODULE_COUNT: u32 = 500;

/// Scaffold topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaffoldType {
    /// Two rows of standards, self-supporting apart from ties
    Independent,
    /// One row of standards, putlogs bearing into the wall
    Putlog,
}

impl ScaffoldType {
    pub fn code(&self) -> &'static str {
        match self {
            ScaffoldType::Independent => "independent",
            ScaffoldType::Putlog => "putlog",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ScaffoldType::Independent => "Independent",
            ScaffoldType::Putlog => "Putlog",
        }
    }

    pub fn standards_per_bay(&self) -> u32 {
        match self {
            ScaffoldType::Independent => 4,
            ScaffoldType::Putlog => 2,
        }
    }

    /// Transoms (or putlogs) per bay per lift
    pub fn transoms_per_bay_lift(&self) -> u32 {
        match self {
            ScaffoldType::Independent => 2,
            ScaffoldType::Putlog => 1,
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "independent" | "independent-tied" | "tied" => Ok(ScaffoldType::Independent),
            "putlog" | "put-log" | "bricklayers" => Ok(ScaffoldType::Putlog),
            _ => Err(CalcError::invalid_input(
                "scaffold_type",
                s,
                "Expected independent or putlog",
            )),
        }
    }
}

impl Default for ScaffoldType {
    fn default() -> Self {
        ScaffoldType::Independent
    }
}

impl fmt::Display for ScaffoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw scaffold calculator form.
///
/// ## JSON Example
///
/// ```json
/// {
///   "scaffold_type": "independent",
///   "height_m": "20",
///   "length_m": "20",
///   "width_m": "1.3",
///   "bays": "",
///   "lifts": "12"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldForm {
    /// independent or putlog; defaults to independent
    pub scaffold_type: Option<String>,
    pub height_m: Option<FormValue>,
    pub length_m: Option<FormValue>,
    pub width_m: Option<FormValue>,
    /// Explicit bay count; blank derives it from length
    pub bays: Option<FormValue>,
    /// Explicit lift count; blank derives it from height
    pub lifts: Option<FormValue>,
}

impl ScaffoldForm {
    /// Turn raw form input into a validated [`ScaffoldInput`].
    pub fn normalize(&self) -> CalcResult<ScaffoldInput> {
        let mut reader = FieldReader::new();
        let height = reader.number("height_m", self.height_m.as_ref());
        let length = reader.number("length_m", self.length_m.as_ref());
        let width = reader.number("width_m", self.width_m.as_ref());
        reader.finish()?;

        let (Some(height), Some(length), Some(width)) = (height, length, width) else {
            return Err(CalcError::incomplete(["height_m", "length_m", "width_m"]));
        };

        let scaffold_type = optional_text(self.scaffold_type.as_deref())
            .map(ScaffoldType::from_str_flexible)
            .transpose()?
            .unwrap_or_default();

        let input = ScaffoldInput {
            scaffold_type,
            height: Metres(height),
            length: Metres(length),
            width: Metres(width),
            bays: optional_count("bays", self.bays.as_ref(), MAX_MODULE_COUNT)?,
            lifts: optional_count("lifts", self.lifts.as_ref(), MAX_MODULE_COUNT)?,
        };
        input.validate()?;
        Ok(input)
    }
}

/// Validated scaffold parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldInput {
    pub scaffold_type: ScaffoldType,
    pub height: Metres,
    pub length: Metres,
    pub width: Metres,
    /// Explicit bay count, bypassing length / bay length
    pub bays: Option<u32>,
    /// Explicit lift count, bypassing height / lift height
    pub lifts: Option<u32>,
}

impl ScaffoldInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("height_m", self.height.0)?;
        require_at_most(
            "height_m",
            self.height.0,
            MAX_HEIGHT_M,
            "Height exceeds 200 m - check units",
        )?;
        require_positive("length_m", self.length.0)?;
        require_at_most(
            "length_m",
            self.length.0,
            MAX_LENGTH_M,
            "Length exceeds 1000 m - check units",
        )?;
        require_positive("width_m", self.width.0)?;
        require_at_most("width_m", self.width.0, MAX_WIDTH_M, "Width exceeds 10 m - check units")?;
        for (field, count) in [("bays", self.bays), ("lifts", self.lifts)] {
            if let Some(n) = count {
                if n == 0 || n > MAX_MODULE_COUNT {
                    return Err(CalcError::invalid_input(
                        field,
                        n.to_string(),
                        format!("Must be between 1 and {}", MAX_MODULE_COUNT),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Stock tubes by use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TubeCounts {
    pub standards: u32,
    pub ledgers: u32,
    pub transoms: u32,
    pub braces: u32,
    pub total: u32,
}

/// Fittings by type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittingCounts {
    pub right_angle: u32,
    pub swivel: u32,
    pub base_plates: u32,
    pub board_clips: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCounts {
    pub scaffold_boards: u32,
    pub toe_boards: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieCounts {
    pub horizontal: u32,
    pub vertical: u32,
    pub total: u32,
}

/// Scaffold take-off outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldDerived {
    pub scaffold_type: ScaffoldType,
    pub height_m: Metres,
    pub length_m: Metres,
    pub width_m: Metres,
    pub bay_count: u32,
    pub lift_count: u32,
    /// True when the matching count came from an explicit override
    pub bays_overridden: bool,
    pub lifts_overridden: bool,
    pub standards_per_bay: u32,
    pub total_standards: u32,
    pub total_ledgers: u32,
    pub transoms: u32,
    pub braces: u32,
    pub tubes: TubeCounts,
    pub fittings: FittingCounts,
    pub boards: BoardCounts,
    pub ties: TieCounts,
    /// Class-3 uniform platform capacity (kg)
    pub max_load_kg: u32,
    /// Height / base width
    pub height_width_ratio: f64,
    /// Tubes, fittings and boards at settings unit costs, rounded up
    pub estimated_cost: f64,
    pub currency: String,
}

pub type ScaffoldResult = CalculationResult<ScaffoldDerived>;

/// Stability and safety checks applied to every scaffold result
pub fn scaffold_rules() -> RuleSet<ScaffoldDerived> {
    RuleSet::new(vec![
        Rule::new(
            WarningCode::SpecialistDesignRequired,
            Severity::Critical,
            |d: &ScaffoldDerived| d.height_m.0 > SPECIALIST_HEIGHT_M,
            |d: &ScaffoldDerived| {
                format!(
                    "Height {} m exceeds {} m; a specialist engineered design is required",
                    d.height_m.0, SPECIALIST_HEIGHT_M
                )
            },
        ),
        Rule::new(
            WarningCode::InsufficientTies,
            Severity::Warning,
            |d: &ScaffoldDerived| d.ties.total < d.ties.vertical * 2,
            |d: &ScaffoldDerived| {
                format!(
                    "{} ties is below the minimum of {} for {} tie levels; \
                     add ties along the length",
                    d.ties.total,
                    d.ties.vertical * 2,
                    d.ties.vertical
                )
            },
        ),
        Rule::new(
            WarningCode::PlatformWidthBelowMinimum,
            Severity::Critical,
            |d: &ScaffoldDerived| d.width_m.0 < MIN_PLATFORM_WIDTH_M,
            |d: &ScaffoldDerived| {
                format!(
                    "Platform width {} m is below the {} m minimum",
                    d.width_m.0, MIN_PLATFORM_WIDTH_M
                )
            },
        ),
        Rule::new(
            WarningCode::StabilityRatioExceeded,
            Severity::Critical,
            |d: &ScaffoldDerived| d.height_width_ratio > MAX_HEIGHT_WIDTH_RATIO,
            |d: &ScaffoldDerived| {
                format!(
                    "Height to base ratio {:.1}:1 exceeds {}:1; \
                     the scaffold relies on ties or outriggers for stability",
                    d.height_width_ratio, MAX_HEIGHT_WIDTH_RATIO
                )
            },
        ),
        Rule::new(
            WarningCode::NarrowBaseStability,
            Severity::Warning,
            |d: &ScaffoldDerived| {
                d.scaffold_type == ScaffoldType::Independent
                    && d.height_m.0 > NARROW_BASE_HEIGHT_M
                    && d.width_m.0 < NARROW_BASE_WIDTH_M
            },
            |d: &ScaffoldDerived| {
                format!(
                    "Independent scaffold over {} m on a {} m base; widen to at least {} m",
                    NARROW_BASE_HEIGHT_M, d.width_m.0, NARROW_BASE_WIDTH_M
                )
            },
        ),
    ])
}

/// `ceil(x)` as a count; inputs are bounded by validation
fn ceil_count(x: f64) -> u32 {
    x.ceil() as u32
}

/// Bay or lift count derived from geometry, capped like an explicit override
fn derived_module_count(field: &str, modules: f64) -> CalcResult<u32> {
    let count = modules.ceil();
    if !(count <= f64::from(MAX_MODULE_COUNT)) {
        return Err(CalcError::invalid_input(
            field,
            count.to_string(),
            format!("Derived count exceeds {}; check module sizes in settings", MAX_MODULE_COUNT),
        ));
    }
    Ok(count as u32)
}

/// Material take-off and stability-rule engine.
#[derive(Debug, Clone)]
pub struct ScaffoldEngine {
    settings: ScaffoldSettings,
    currency: String,
    rules: RuleSet<ScaffoldDerived>,
}

impl ScaffoldEngine {
    pub fn new(settings: &CalculatorSettings) -> Self {
        ScaffoldEngine {
            settings: settings.scaffold.clone(),
            currency: settings.currency.clone(),
            rules: scaffold_rules(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet<ScaffoldDerived>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleSet<ScaffoldDerived> {
        &self.rules
    }

    /// Normalize a raw form and calculate.
    pub fn calculate_form(&self, form: &ScaffoldForm) -> CalcResult<ScaffoldResult> {
        let input = form.normalize()?;
        self.calculate(&input)
    }

    /// Derive quantities and evaluate the stability rules.
    pub fn calculate(&self, input: &ScaffoldInput) -> CalcResult<ScaffoldResult> {
        input.validate()?;
        self.settings.validate()?;
        let s = &self.settings;
        let (height, length, width) = (input.height.0, input.length.0, input.width.0);
        debug!(
            scaffold_type = input.scaffold_type.code(),
            height_m = height,
            length_m = length,
            width_m = width,
            "scaffold take-off"
        );

        // === Modules ===
        let bay_count = match input.bays {
            Some(n) => n,
            None => derived_module_count("bays", length / s.bay_length_m)?,
        };
        let lift_count = match input.lifts {
            Some(n) => n,
            None => derived_module_count("lifts", height / s.lift_height_m)?,
        };

        // === Members ===
        let standards_per_bay = input.scaffold_type.standards_per_bay();
        let total_standards = bay_count * standards_per_bay;
        let total_ledgers = bay_count * 2 * lift_count;
        let transoms = bay_count * lift_count * input.scaffold_type.transoms_per_bay_lift();
        let braces = bay_count.div_ceil(3) * lift_count * 2;

        // === Stock tubes (linear metres / stock length, per category) ===
        let stock = s.tube_stock_length_m;
        let standard_tubes = ceil_count(f64::from(total_standards) * height / stock);
        let ledger_tubes = ceil_count(f64::from(total_ledgers) * s.bay_length_m / stock);
        let transom_tubes = ceil_count(f64::from(transoms) * width / stock);
        let brace_tubes = ceil_count(f64::from(braces) * s.brace_length_m / stock);
        let tubes = TubeCounts {
            standards: standard_tubes,
            ledgers: ledger_tubes,
            transoms: transom_tubes,
            braces: brace_tubes,
            total: standard_tubes + ledger_tubes + transom_tubes + brace_tubes,
        };

        // === Fittings ===
        let right_angle = total_standards * lift_count * 2 + transoms * 2;
        let swivel = braces * 2;
        let base_plates = total_standards;
        let board_clips = transoms * 4;
        let fittings = FittingCounts {
            right_angle,
            swivel,
            base_plates,
            board_clips,
            total: right_angle + swivel + base_plates + board_clips,
        };

        // === Boards ===
        let boards = BoardCounts {
            scaffold_boards: bay_count * 4 * lift_count,
            toe_boards: ceil_count(
                (2.0 * length + 2.0 * width) * f64::from(lift_count) / s.toe_board_length_m,
            ),
        };

        // === Ties ===
        let horizontal = ceil_count(length / s.tie_spacing_m);
        let vertical = ceil_count(height / s.tie_spacing_m);
        let ties = TieCounts {
            horizontal,
            vertical,
            total: horizontal * vertical,
        };

        // === Capacity & cost ===
        let max_load_kg = (length * width * s.class3_load_kg_per_m2).floor() as u32;
        let estimated_cost = (f64::from(tubes.total) * s.tube_cost
            + f64::from(fittings.total) * s.fitting_cost
            + f64::from(boards.scaffold_boards + boards.toe_boards) * s.board_cost)
            .ceil();

        let derived = ScaffoldDerived {
            scaffold_type: input.scaffold_type,
            height_m: input.height,
            length_m: input.length,
            width_m: input.width,
            bay_count,
            lift_count,
            bays_overridden: input.bays.is_some(),
            lifts_overridden: input.lifts.is_some(),
            standards_per_bay,
            total_standards,
            total_ledgers,
            transoms,
            braces,
            tubes,
            fittings,
            boards,
            ties,
            max_load_kg,
            height_width_ratio: height / width,
            estimated_cost,
            currency: self.currency.clone(),
        };
        debug!(
            bay_count,
            lift_count,
            tubes = derived.tubes.total,
            fittings = derived.fittings.total,
            "scaffold derived quantities"
        );

        let warnings = self.rules.evaluate(&derived);
        let summary = summarize(&derived);
        Ok(CalculationResult::assemble(derived, warnings, summary))
    }
}

fn summarize(d: &ScaffoldDerived) -> String {
    format!(
        "{} scaffold {}m long × {}m high × {}m wide: {} bays × {} lifts, \
         {} tubes, {} fittings, {} boards, {} ties; max load {} kg; estimated cost {}{}",
        d.scaffold_type,
        d.length_m.0,
        d.height_m.0,
        d.width_m.0,
        d.bay_count,
        d.lift_count,
        d.tubes.total,
        d.fittings.total,
        d.boards.scaffold_boards + d.boards.toe_boards,
        d.ties.total,
        d.max_load_kg,
        d.currency,
        d.estimated_cost
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> ScaffoldEngine {
        ScaffoldEngine::new(&CalculatorSettings::default())
    }

    fn input(scaffold_type: ScaffoldType, height: f64, length: f64, width: f64) -> ScaffoldInput {
        ScaffoldInput {
            scaffold_type,
            height: Metres(height),
            length: Metres(length),
            width: Metres(width),
            bays: None,
            lifts: None,
        }
    }

    fn codes(result: &ScaffoldResult) -> Vec<WarningCode> {
        result.warnings().iter().map(|w| w.code).collect()
    }

    #[test]
    fn test_scenario_independent_20m() {
        let result = engine()
            .calculate(&input(ScaffoldType::Independent, 20.0, 20.0, 1.3))
            .unwrap();
        let d = result.derived();
        assert_eq!(d.bay_count, 8);
        assert_eq!(d.lift_count, 10);
        assert_relative_eq!(d.height_width_ratio, 15.38, epsilon = 0.01);
        assert_eq!(d.max_load_kg, 6344);
        assert_eq!(codes(&result), vec![WarningCode::StabilityRatioExceeded]);
    }

    #[test]
    fn test_scenario_member_counts() {
        let result = engine()
            .calculate(&input(ScaffoldType::Independent, 20.0, 20.0, 1.3))
            .unwrap();
        let d = result.derived();
        assert_eq!(d.total_standards, 32);
        assert_eq!(d.total_ledgers, 160);
        assert_eq!(d.transoms, 160);
        assert_eq!(d.braces, 60);

        // 640/6.3, 400/6.3, 208/6.3, 180/6.3 each rounded up
        assert_eq!(
            d.tubes,
            TubeCounts { standards: 102, ledgers: 64, transoms: 34, braces: 29, total: 229 }
        );
        assert_eq!(
            d.fittings,
            FittingCounts {
                right_angle: 960,
                swivel: 120,
                base_plates: 32,
                board_clips: 640,
                total: 1752
            }
        );
        assert_eq!(d.boards, BoardCounts { scaffold_boards: 320, toe_boards: 110 });
        assert_eq!(d.ties, TieCounts { horizontal: 5, vertical: 5, total: 25 });

        // 229 × 18.50 + 1752 × 2.75 + 430 × 14.00 = 15074.5
        assert_eq!(d.estimated_cost, 15075.0);
        assert!(result.summary().contains("8 bays × 10 lifts"));
    }

    #[test]
    fn test_putlog_members() {
        let result = engine()
            .calculate(&input(ScaffoldType::Putlog, 6.0, 10.0, 1.5))
            .unwrap();
        let d = result.derived();
        assert_eq!(d.bay_count, 4);
        assert_eq!(d.lift_count, 3);
        assert_eq!(d.standards_per_bay, 2);
        assert_eq!(d.total_standards, 8);
        assert_eq!(d.transoms, 12);
    }

    #[test]
    fn test_overrides_bypass_derivation() {
        let mut i = input(ScaffoldType::Independent, 20.0, 20.0, 1.3);
        i.bays = Some(5);
        i.lifts = Some(4);
        let d = engine().calculate(&i).unwrap().derived().clone();
        assert_eq!(d.bay_count, 5);
        assert_eq!(d.lift_count, 4);
        assert!(d.bays_overridden && d.lifts_overridden);
        assert_eq!(d.total_standards, 20);
        assert_eq!(d.total_ledgers, 40);
        assert_eq!(d.boards.scaffold_boards, 80);
        // Ties still follow the real geometry
        assert_eq!(d.ties.total, 25);
    }

    #[test]
    fn test_width_is_independent_of_other_rules() {
        let e = engine();
        let wide = e.calculate(&input(ScaffoldType::Independent, 1.5, 10.0, 0.7)).unwrap();
        let narrow = e.calculate(&input(ScaffoldType::Independent, 1.5, 10.0, 0.5)).unwrap();
        assert!(wide.is_clear());
        assert_eq!(codes(&narrow), vec![WarningCode::PlatformWidthBelowMinimum]);
    }

    #[test]
    fn test_specialist_height() {
        let result = engine()
            .calculate(&input(ScaffoldType::Putlog, 52.0, 40.0, 1.5))
            .unwrap();
        assert!(result.has_warning(WarningCode::SpecialistDesignRequired));
        assert!(!result.has_warning(WarningCode::NarrowBaseStability));
    }

    #[test]
    fn test_insufficient_ties_on_short_runs() {
        // 3 m long: 1 tie column × 2 tie levels = 2 < 4
        let result = engine()
            .calculate(&input(ScaffoldType::Independent, 6.0, 3.0, 2.0))
            .unwrap();
        assert_eq!(codes(&result), vec![WarningCode::InsufficientTies]);
    }

    #[test]
    fn test_narrow_base_applies_to_independent_only() {
        let e = engine();
        let independent = e.calculate(&input(ScaffoldType::Independent, 32.0, 30.0, 1.0)).unwrap();
        let putlog = e.calculate(&input(ScaffoldType::Putlog, 32.0, 30.0, 1.0)).unwrap();
        assert!(independent.has_warning(WarningCode::NarrowBaseStability));
        assert!(!putlog.has_warning(WarningCode::NarrowBaseStability));
        // Both still exceed the ratio limit
        assert!(independent.has_warning(WarningCode::StabilityRatioExceeded));
        assert!(putlog.has_warning(WarningCode::StabilityRatioExceeded));
    }

    #[test]
    fn test_all_rules_can_fire_together() {
        let result = engine()
            .calculate(&input(ScaffoldType::Independent, 60.0, 3.0, 0.5))
            .unwrap();
        assert_eq!(
            codes(&result),
            vec![
                WarningCode::SpecialistDesignRequired,
                WarningCode::InsufficientTies,
                WarningCode::PlatformWidthBelowMinimum,
                WarningCode::StabilityRatioExceeded,
                WarningCode::NarrowBaseStability,
            ]
        );
    }

    #[test]
    fn test_form_missing_fields() {
        let form = ScaffoldForm {
            height_m: Some("20".into()),
            width_m: Some("".into()),
            ..ScaffoldForm::default()
        };
        let err = engine().calculate_form(&form).unwrap_err();
        assert_eq!(err, CalcError::incomplete(["length_m", "width_m"]));
    }

    #[test]
    fn test_form_overrides_and_defaults() {
        let form = ScaffoldForm {
            height_m: Some("20".into()),
            length_m: Some("20".into()),
            width_m: Some("1.3".into()),
            bays: Some("".into()),
            lifts: Some("12".into()),
            ..ScaffoldForm::default()
        };
        let d = engine().calculate_form(&form).unwrap().derived().clone();
        assert_eq!(d.scaffold_type, ScaffoldType::Independent);
        assert_eq!(d.bay_count, 8);
        assert_eq!(d.lift_count, 12);
        assert!(!d.bays_overridden);
    }

    #[test]
    fn test_form_rejects_bad_values() {
        let base = ScaffoldForm {
            height_m: Some("20".into()),
            length_m: Some("20".into()),
            width_m: Some("1.3".into()),
            ..ScaffoldForm::default()
        };
        let zero_width = ScaffoldForm {
            width_m: Some("0".into()),
            ..base.clone()
        };
        assert_eq!(engine().calculate_form(&zero_width).unwrap_err().error_code(), "INVALID_INPUT");

        let bad_type = ScaffoldForm {
            scaffold_type: Some("cantilever".to_string()),
            ..base.clone()
        };
        assert_eq!(engine().calculate_form(&bad_type).unwrap_err().error_code(), "INVALID_INPUT");

        let fractional_bays = ScaffoldForm {
            bays: Some("2.5".into()),
            ..base
        };
        let err = engine().calculate_form(&fractional_bays).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_tiny_lift_height_is_rejected_not_overflowed() {
        let mut settings = CalculatorSettings::default();
        settings.scaffold.lift_height_m = 0.00001;
        let err = ScaffoldEngine::new(&settings)
            .calculate(&input(ScaffoldType::Independent, 200.0, 1000.0, 1.3))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(matches!(
            err,
            CalcError::InvalidInput { ref field, .. } if field == "scaffold.lift_height_m"
        ));
    }

    #[test]
    fn test_derived_bay_count_is_capped() {
        let mut settings = CalculatorSettings::default();
        settings.scaffold.bay_length_m = 0.1;
        let err = ScaffoldEngine::new(&settings)
            .calculate(&input(ScaffoldType::Independent, 20.0, 1000.0, 1.3))
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "bays"));
    }

    #[test]
    fn test_largest_scaffold_within_caps() {
        // 1000 m / 2.5 m = 400 bays, 200 m / 2 m = 100 lifts
        let result = engine()
            .calculate(&input(ScaffoldType::Independent, 200.0, 1000.0, 10.0))
            .unwrap();
        assert_eq!(result.derived().bay_count, 400);
        assert_eq!(result.derived().lift_count, 100);
        assert!(result.has_warning(WarningCode::SpecialistDesignRequired));
    }

    #[test]
    fn test_overrides_skip_derived_count_cap() {
        let mut settings = CalculatorSettings::default();
        settings.scaffold.bay_length_m = 0.1;
        let mut i = input(ScaffoldType::Putlog, 6.0, 1000.0, 1.5);
        i.bays = Some(400);
        let result = ScaffoldEngine::new(&settings).calculate(&i).unwrap();
        assert_eq!(result.derived().bay_count, 400);
    }

    #[test]
    fn test_custom_settings_change_costs() {
        let mut settings = CalculatorSettings::default();
        settings.scaffold.tube_cost = 0.0;
        settings.scaffold.fitting_cost = 0.0;
        settings.scaffold.board_cost = 1.0;
        let result = ScaffoldEngine::new(&settings)
            .calculate(&input(ScaffoldType::Independent, 20.0, 20.0, 1.3))
            .unwrap();
        assert_eq!(result.derived().estimated_cost, 430.0);
    }
}
