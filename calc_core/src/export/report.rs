//! Report document export.
//!
//! A [`ReportDocument`] is the data a printable renderer lays out: a title,
//! labelled value rows, the warnings and the summary line. Rendering to
//! PDF or HTML happens outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CableDerived, ScaffoldDerived, UValueDerived};
use crate::result::CalculationResult;
use crate::rules::RuleWarning;

/// Printed at the foot of every report
pub const DISCLAIMER: &str = "Simplified approximation for estimating purposes only. \
Not a certified engineering calculation: derating factors, thermal bridging and full \
voltage-drop tables are not considered. Verify with accredited calculation software.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

impl ReportRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        ReportRow {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Report export payload.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "3f0c1c2e-5b1a-4d8e-9a57-0c6f1b2a9d41",
///   "generated_at": "2026-03-02T10:15:00Z",
///   "title": "Cable Sizing",
///   "rows": [{ "label": "Cable size", "value": "6mm²" }],
///   "warnings": [],
///   "summary": "6mm² cable recommended for 32.0A load over 20m run ...",
///   "disclaimer": "Simplified approximation ..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub rows: Vec<ReportRow>,
    pub warnings: Vec<RuleWarning>,
    pub summary: String,
    pub disclaimer: String,
}

impl ReportDocument {
    pub fn from_result<D: Reportable>(result: &CalculationResult<D>) -> Self {
        ReportDocument {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            title: result.derived().title().to_string(),
            rows: result.derived().rows(),
            warnings: result.warnings().to_vec(),
            summary: result.summary().to_string(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    /// Value of the first row with the given label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value.as_str())
    }
}

/// Derived quantities that can be laid out as report rows
pub trait Reportable {
    fn title(&self) -> &'static str;
    fn rows(&self) -> Vec<ReportRow>;
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl Reportable for CableDerived {
    fn title(&self) -> &'static str {
        "Cable Sizing"
    }

    fn rows(&self) -> Vec<ReportRow> {
        let mut rows = vec![
            ReportRow::new("Design current", format!("{:.1} A", self.current_a.0)),
            ReportRow::new("Supply voltage", format!("{} V", self.supply_voltage_v.0)),
            ReportRow::new("Cable run", format!("{} m", self.length_m.0)),
            ReportRow::new(
                "Installation",
                format!("{} ({})", self.method, self.method.description()),
            ),
            ReportRow::new("Lighting circuit", yes_no(self.is_lighting)),
            ReportRow::new("Cable size", self.size_mm2.to_string()),
            ReportRow::new(
                "Voltage drop",
                format!(
                    "{:.2} V ({:.1}% of {}% limit)",
                    self.voltage_drop_v, self.voltage_drop_percent, self.voltage_drop_limit_percent
                ),
            ),
        ];
        match self.size_for_voltage_drop {
            Some(size) if size != self.size_mm2 => {
                rows.push(ReportRow::new("Size for voltage drop", size.to_string()));
            }
            Some(_) => {}
            None => rows.push(ReportRow::new(
                "Size for voltage drop",
                "Beyond table - specialist design",
            )),
        }
        rows
    }
}

impl Reportable for UValueDerived {
    fn title(&self) -> &'static str {
        "U-Value Compliance"
    }

    fn rows(&self) -> Vec<ReportRow> {
        let mut rows = vec![
            ReportRow::new("Element", self.element.display_name()),
            ReportRow::new("Build category", self.build.display_name()),
            ReportRow::new(
                "Insulation",
                format!(
                    "{}mm {} (λ {} W/m·K)",
                    self.thickness_mm.0, self.material_name, self.lambda_w_mk
                ),
            ),
            ReportRow::new("Total resistance", format!("{:.3} m²K/W", self.r_total)),
            ReportRow::new("U-value", format!("{:.3} W/m²K", self.u_value)),
            ReportRow::new("Target", format!("{} W/m²K", self.target_u_value)),
            ReportRow::new("Compliant", yes_no(self.is_compliant)),
            ReportRow::new("Deviation", format!("{:+.1}%", self.deviation_percent)),
        ];
        if let Some(t) = self.recommended_thickness_mm {
            rows.push(ReportRow::new("Recommended thickness", format!("{}mm", t.0)));
        }
        if let Some(cost) = self.material_cost {
            rows.push(ReportRow::new("Material cost", format!("{}{}", self.currency, cost)));
        }
        rows
    }
}

impl Reportable for ScaffoldDerived {
    fn title(&self) -> &'static str {
        "Scaffold Take-Off"
    }

    fn rows(&self) -> Vec<ReportRow> {
        vec![
            ReportRow::new("Type", self.scaffold_type.display_name()),
            ReportRow::new(
                "Dimensions",
                format!("{} m × {} m × {} m", self.length_m.0, self.height_m.0, self.width_m.0),
            ),
            ReportRow::new("Bays × lifts", format!("{} × {}", self.bay_count, self.lift_count)),
            ReportRow::new("Standards", self.total_standards.to_string()),
            ReportRow::new("Ledgers", self.total_ledgers.to_string()),
            ReportRow::new("Transoms", self.transoms.to_string()),
            ReportRow::new("Braces", self.braces.to_string()),
            ReportRow::new("Tubes", self.tubes.total.to_string()),
            ReportRow::new("Fittings", self.fittings.total.to_string()),
            ReportRow::new("Boards", self.boards.scaffold_boards.to_string()),
            ReportRow::new("Toe boards", self.boards.toe_boards.to_string()),
            ReportRow::new("Ties", self.ties.total.to_string()),
            ReportRow::new("Max load", format!("{} kg", self.max_load_kg)),
            ReportRow::new("Height : width", format!("{:.1} : 1", self.height_width_ratio)),
            ReportRow::new("Estimated cost", format!("{}{}", self.currency, self.estimated_cost)),
        ]
    }
}
