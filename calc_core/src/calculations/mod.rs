//! # Trade Calculations
//!
//! Every calculator follows the same pipeline:
//!
//! - `*Form` - raw form input (JSON-serializable, loosely typed)
//! - `*Form::normalize() -> Result<*Input, CalcError>` - validation stage
//! - `*Engine::calculate(&input) -> Result<CalculationResult<*Derived>, CalcError>`
//!
//! Engines are built once from [`CalculatorSettings`] and the reference
//! tables, then reused; each run is pure and produces a fresh result.
//!
//! ## Available Calculations
//!
//! - [`cable`] - Cable size from load current, with voltage-drop check
//! - [`u_value`] - Element U-value against the regulation target
//! - [`scaffold`] - Scaffold material take-off and stability rules
//!
//! ## Dispatch
//!
//! [`CalculationRequest`] wraps any raw form in one JSON document:
//!
//! ```json
//! { "calculator": "cable", "current_a": "32", "length_m": "20", "method": "C" }
//! ```

pub mod cable;
pub mod fields;
pub mod scaffold;
pub mod u_value;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::export::{QuoteRequest, ReportDocument};
use crate::rules::{RuleWarning, Severity};
use crate::settings::CalculatorSettings;

// Re-export commonly used types
pub use cable::{CableDerived, CableEngine, CableForm, CableInput, CableResult};
pub use scaffold::{ScaffoldDerived, ScaffoldEngine, ScaffoldForm, ScaffoldInput, ScaffoldResult};
pub use u_value::{UValueDerived, UValueEngine, UValueForm, UValueInput, UValueResult};

/// A raw form addressed to one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationRequest {
    Cable(CableForm),
    UValue(UValueForm),
    Scaffold(ScaffoldForm),
}

impl CalculationRequest {
    /// Get the calculator name as used in the JSON tag
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRequest::Cable(_) => "cable",
            CalculationRequest::UValue(_) => "u_value",
            CalculationRequest::Scaffold(_) => "scaffold",
        }
    }
}

/// Result of running a [`CalculationRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationOutcome {
    Cable(CableResult),
    UValue(UValueResult),
    Scaffold(ScaffoldResult),
}

impl CalculationOutcome {
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationOutcome::Cable(_) => "cable",
            CalculationOutcome::UValue(_) => "u_value",
            CalculationOutcome::Scaffold(_) => "scaffold",
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            CalculationOutcome::Cable(r) => r.summary(),
            CalculationOutcome::UValue(r) => r.summary(),
            CalculationOutcome::Scaffold(r) => r.summary(),
        }
    }

    pub fn warnings(&self) -> &[RuleWarning] {
        match self {
            CalculationOutcome::Cable(r) => r.warnings(),
            CalculationOutcome::UValue(r) => r.warnings(),
            CalculationOutcome::Scaffold(r) => r.warnings(),
        }
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.warnings().iter().map(|w| w.severity).max()
    }

    /// Material list for the quote collaborator
    pub fn quote(&self) -> QuoteRequest {
        match self {
            CalculationOutcome::Cable(r) => QuoteRequest::from_result(r),
            CalculationOutcome::UValue(r) => QuoteRequest::from_result(r),
            CalculationOutcome::Scaffold(r) => QuoteRequest::from_result(r),
        }
    }

    /// Printable document data for the report collaborator
    pub fn report(&self) -> ReportDocument {
        match self {
            CalculationOutcome::Cable(r) => ReportDocument::from_result(r),
            CalculationOutcome::UValue(r) => ReportDocument::from_result(r),
            CalculationOutcome::Scaffold(r) => ReportDocument::from_result(r),
        }
    }
}

/// The three engines built from one settings value.
#[derive(Debug, Clone)]
pub struct Calculators<'a> {
    pub cable: CableEngine<'a>,
    pub u_value: UValueEngine<'a>,
    pub scaffold: ScaffoldEngine,
}

impl Calculators<'static> {
    /// Engines over the built-in reference tables
    pub fn with_defaults(settings: &CalculatorSettings) -> CalcResult<Self> {
        settings.validate()?;
        Ok(Calculators {
            cable: CableEngine::with_defaults(settings)?,
            u_value: UValueEngine::with_defaults(settings),
            scaffold: ScaffoldEngine::new(settings),
        })
    }
}

impl<'a> Calculators<'a> {
    /// Run a request through the matching engine.
    pub fn run(&self, request: &CalculationRequest) -> CalcResult<CalculationOutcome> {
        debug!(calculator = request.calc_type(), "dispatching calculation");
        Ok(match request {
            CalculationRequest::Cable(form) => {
                CalculationOutcome::Cable(self.cable.calculate_form(form)?)
            }
            CalculationRequest::UValue(form) => {
                CalculationOutcome::UValue(self.u_value.calculate_form(form)?)
            }
            CalculationRequest::Scaffold(form) => {
                CalculationOutcome::Scaffold(self.scaffold.calculate_form(form)?)
            }
        })
    }
}
