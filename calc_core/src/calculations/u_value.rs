//! # U-Value Compliance
//!
//! Computes the thermal transmittance of a wall, roof or floor build-up with
//! one insulation layer, classifies it against the regulation target, and
//! back-solves the insulation thickness needed to comply.
//!
//! ## Method
//!
//! ```text
//! R_layer = thickness_m / λ
//! R_total = R_si + R_construction + R_layer + R_se
//! U       = 1 / R_total
//! ```
//!
//! `R_si` is 0.17 for floors and 0.13 otherwise, `R_se` is 0.04 and
//! `R_construction` is a fixed 0.18 allowance for the non-insulation layers.
//! Thermal bridging and repeating-thermal-bridge corrections are ignored.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::u_value::{UValueEngine, UValueForm};
//! use calc_core::settings::CalculatorSettings;
//!
//! let engine = UValueEngine::with_defaults(&CalculatorSettings::default());
//! let form = UValueForm {
//!     element_type: Some("wall".to_string()),
//!     insulation: Some("mineral-wool".to_string()),
//!     thickness_mm: Some("100".into()),
//!     build_category: Some("extension".to_string()),
//!     ..UValueForm::default()
//! };
//!
//! let result = engine.calculate_form(&form).unwrap();
//! assert!(!result.derived().is_compliant);
//! assert_eq!(result.derived().recommended_thickness_mm.unwrap().0, 150.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::fields::{
    optional_positive, optional_text, require_at_most, require_positive, FieldReader, FormValue,
};
use crate::errors::{CalcError, CalcResult};
use crate::reference::{
    BuildCategory, ElementType, MaterialTable, RegulationTargets, DEFAULT_MATERIALS,
    DEFAULT_TARGETS,
};
use crate::result::CalculationResult;
use crate::rules::{Rule, RuleSet, Severity, WarningCode};
use crate::settings::{CalculatorSettings, UValueSettings};
use crate::units::{Metres, Millimetres, SqM};

/// Thickest single insulation layer the form accepts (mm)
const MAX_THICKNESS_MM: f64 = 1000.0;

/// Raw U-value calculator form.
///
/// ## JSON Example
///
/// ```json
/// {
///   "element_type": "wall",
///   "insulation": "mineral-wool",
///   "thickness_mm": "100",
///   "build_category": "extension",
///   "area_m2": "24"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UValueForm {
    /// Element code: wall, roof, floor
    pub element_type: Option<String>,
    /// Insulation material code from the material table
    pub insulation: Option<String>,
    /// Insulation thickness (mm)
    pub thickness_mm: Option<FormValue>,
    /// new-build, extension or retrofit; defaults to new-build
    pub build_category: Option<String>,
    /// Element area for the cost estimate (m²), optional
    pub area_m2: Option<FormValue>,
}

impl UValueForm {
    /// Turn raw form input into a validated [`UValueInput`].
    pub fn normalize(&self) -> CalcResult<UValueInput> {
        let mut reader = FieldReader::new();
        let element = reader.text("element_type", self.element_type.as_deref());
        let insulation = reader.text("insulation", self.insulation.as_deref());
        let thickness = reader.number("thickness_mm", self.thickness_mm.as_ref());
        reader.finish()?;

        let (Some(element), Some(insulation), Some(thickness)) = (element, insulation, thickness)
        else {
            return Err(CalcError::incomplete(["element_type", "insulation", "thickness_mm"]));
        };

        let build = optional_text(self.build_category.as_deref())
            .map(BuildCategory::from_str_flexible)
            .transpose()?
            .unwrap_or(BuildCategory::NewBuild);

        let input = UValueInput {
            element: ElementType::from_str_flexible(element)?,
            material_code: insulation.to_string(),
            thickness: Millimetres(thickness),
            build,
            area: optional_positive(self.area_m2.as_ref()).map(SqM),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Validated U-value parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UValueInput {
    pub element: ElementType,
    pub material_code: String,
    pub thickness: Millimetres,
    pub build: BuildCategory,
    /// Element area; cost is estimated only when present
    pub area: Option<SqM>,
}

impl UValueInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("thickness_mm", self.thickness.0)?;
        require_at_most(
            "thickness_mm",
            self.thickness.0,
            MAX_THICKNESS_MM,
            "Thickness exceeds 1000 mm - check units",
        )?;
        if let Some(area) = self.area {
            require_positive("area_m2", area.0)?;
        }
        Ok(())
    }
}

/// U-value outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UValueDerived {
    pub element: ElementType,
    pub build: BuildCategory,
    pub material_code: String,
    pub material_name: String,
    /// Thermal conductivity λ (W/m·K)
    pub lambda_w_mk: f64,
    pub thickness_mm: Millimetres,
    /// Internal surface resistance (m²K/W)
    pub r_si: f64,
    /// External surface resistance (m²K/W)
    pub r_se: f64,
    /// Non-insulation layer allowance (m²K/W)
    pub r_construction: f64,
    /// Insulation layer resistance (m²K/W)
    pub r_layer: f64,
    /// Total resistance (m²K/W)
    pub r_total: f64,
    /// Thermal transmittance (W/m²K)
    pub u_value: f64,
    /// Maximum permitted U-value (W/m²K)
    pub target_u_value: f64,
    pub is_compliant: bool,
    /// (U − target) / target × 100; positive means worse than target
    pub deviation_percent: f64,
    /// Thickness needed to comply, rounded up to 10 mm; only when non-compliant
    pub recommended_thickness_mm: Option<Millimetres>,
    /// Element area, when given
    pub area_m2: Option<SqM>,
    /// Material cost for the given area, rounded up; only when area was given
    pub material_cost: Option<f64>,
    pub currency: String,
}

pub type UValueResult = CalculationResult<UValueDerived>;

/// Checks applied to every U-value result
pub fn u_value_rules() -> RuleSet<UValueDerived> {
    RuleSet::new(vec![Rule::new(
        WarningCode::NonCompliant,
        Severity::Warning,
        |d: &UValueDerived| !d.is_compliant,
        |d: &UValueDerived| {
            let remedy = d
                .recommended_thickness_mm
                .map(|t| format!("; increase to {}mm {}", t.0, d.material_name))
                .unwrap_or_default();
            format!(
                "U-value {:.3} W/m²K exceeds the {} {} target of {} W/m²K by {:.1}%{}",
                d.u_value,
                d.build,
                d.element.code(),
                d.target_u_value,
                d.deviation_percent,
                remedy
            )
        },
    )])
}

/// Forward U-value and inverse thickness solver.
#[derive(Debug, Clone)]
pub struct UValueEngine<'a> {
    materials: &'a MaterialTable,
    targets: &'a RegulationTargets,
    settings: UValueSettings,
    currency: String,
    rules: RuleSet<UValueDerived>,
}

impl UValueEngine<'static> {
    /// Engine over the built-in tables
    pub fn with_defaults(settings: &CalculatorSettings) -> Self {
        UValueEngine::new(&DEFAULT_MATERIALS, &DEFAULT_TARGETS, settings)
    }
}

impl<'a> UValueEngine<'a> {
    pub fn new(
        materials: &'a MaterialTable,
        targets: &'a RegulationTargets,
        settings: &CalculatorSettings,
    ) -> Self {
        UValueEngine {
            materials,
            targets,
            settings: settings.u_value.clone(),
            currency: settings.currency.clone(),
            rules: u_value_rules(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet<UValueDerived>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleSet<UValueDerived> {
        &self.rules
    }

    /// Internal surface resistance for the element
    pub fn r_si(&self, element: ElementType) -> f64 {
        match element {
            ElementType::Floor => self.settings.r_si_floor,
            ElementType::Wall | ElementType::Roof => self.settings.r_si_other,
        }
    }

    /// Resistance of everything except the insulation layer
    fn r_fixed(&self, element: ElementType) -> f64 {
        self.r_si(element) + self.settings.r_construction + self.settings.r_se
    }

    /// U = 1 / (R_si + R_construction + thickness/λ + R_se)
    pub fn u_value_for(
        &self,
        element: ElementType,
        lambda_w_mk: f64,
        thickness: Millimetres,
    ) -> f64 {
        let thickness_m: Metres = thickness.into();
        let r_layer = thickness_m.0 / lambda_w_mk;
        1.0 / (self.r_si(element) + self.settings.r_construction + r_layer + self.settings.r_se)
    }

    /// Thickness giving U ≤ target, rounded up to the next 10 mm
    pub fn thickness_for_target(
        &self,
        element: ElementType,
        lambda_w_mk: f64,
        target_u_value: f64,
    ) -> Millimetres {
        let r_required = (1.0 / target_u_value - self.r_fixed(element)).max(0.0);
        Millimetres((r_required * lambda_w_mk * 1000.0 / 10.0).ceil() * 10.0)
    }

    /// Normalize a raw form and calculate.
    pub fn calculate_form(&self, form: &UValueForm) -> CalcResult<UValueResult> {
        let input = form.normalize()?;
        self.calculate(&input)
    }

    /// Compute the U-value and classify it against the regulation target.
    pub fn calculate(&self, input: &UValueInput) -> CalcResult<UValueResult> {
        input.validate()?;

        let material = self.materials.get(&input.material_code)?;
        let target_u_value = self.targets.target(input.element, input.build)?;
        debug!(
            element = input.element.code(),
            material = %material.code,
            thickness_mm = input.thickness.0,
            target_u_value,
            "computing U-value"
        );

        let thickness_m: Metres = input.thickness.into();
        let r_si = self.r_si(input.element);
        let r_layer = thickness_m.0 / material.lambda_w_mk;
        let r_total = r_si + self.settings.r_construction + r_layer + self.settings.r_se;
        let u_value = 1.0 / r_total;

        let is_compliant = u_value <= target_u_value;
        let deviation_percent = (u_value - target_u_value) / target_u_value * 100.0;
        let recommended_thickness_mm = (!is_compliant).then(|| {
            self.thickness_for_target(input.element, material.lambda_w_mk, target_u_value)
        });
        let material_cost = input.area.map(|area| (area.0 * material.cost_per_m2).ceil());

        let derived = UValueDerived {
            element: input.element,
            build: input.build,
            material_code: material.code.clone(),
            material_name: material.name.clone(),
            lambda_w_mk: material.lambda_w_mk,
            thickness_mm: input.thickness,
            r_si,
            r_se: self.settings.r_se,
            r_construction: self.settings.r_construction,
            r_layer,
            r_total,
            u_value,
            target_u_value,
            is_compliant,
            deviation_percent,
            recommended_thickness_mm,
            area_m2: input.area,
            material_cost,
            currency: self.currency.clone(),
        };
        debug!(u_value, r_total, is_compliant, "U-value derived quantities");

        let warnings = self.rules.evaluate(&derived);
        let summary = summarize(&derived);
        Ok(CalculationResult::assemble(derived, warnings, summary))
    }
}

fn summarize(d: &UValueDerived) -> String {
    let mut summary = if d.is_compliant {
        format!(
            "{} U-value {:.3} W/m²K with {}mm {} meets the {} target of {} W/m²K",
            d.element, d.u_value, d.thickness_mm.0, d.material_name, d.build, d.target_u_value
        )
    } else {
        format!(
            "{} U-value {:.3} W/m²K with {}mm {} does not meet the {} target of {} W/m²K ({:+.1}%)",
            d.element,
            d.u_value,
            d.thickness_mm.0,
            d.material_name,
            d.build,
            d.target_u_value,
            d.deviation_percent
        )
    };
    if let Some(t) = d.recommended_thickness_mm {
        summary.push_str(&format!("; {}mm recommended", t.0));
    }
    if let Some(cost) = d.material_cost {
        summary.push_str(&format!("; material cost {}{}", d.currency, cost));
    }
    summary
}
