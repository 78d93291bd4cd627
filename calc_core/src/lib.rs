//! # calc_core - Trade Calculation Engines
//!
//! `calc_core` holds the calculators behind the trade tools: cable sizing,
//! U-value compliance and scaffold take-off. All inputs and outputs are
//! JSON-serializable so the same engines serve a web form, the CLI or any
//! other front end.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: each run is a pure Form → Input → Derived → Result pipeline
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Rules as data**: safety and compliance checks are independent, ordered predicates
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::{CalculationRequest, Calculators};
//! use calc_core::CalculatorSettings;
//!
//! let calculators = Calculators::with_defaults(&CalculatorSettings::default()).unwrap();
//! let request: CalculationRequest = serde_json::from_str(
//!     r#"{"calculator": "cable", "power_kw": "7.36", "length_m": "20", "method": "C"}"#,
//! ).unwrap();
//!
//! let outcome = calculators.run(&request).unwrap();
//! assert!(outcome.summary().contains("6mm²"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The three engines and request dispatch
//! - [`reference`] - Ampacity, insulation and regulation tables
//! - [`rules`] - Rule-as-data evaluator and warning types
//! - [`result`] - Immutable calculation result
//! - [`export`] - Quote and report shapes for downstream collaborators
//! - [`settings`] - TOML-loadable calculator settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod reference;
pub mod result;
pub mod rules;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationOutcome, CalculationRequest, Calculators};
pub use errors::{CalcError, CalcResult};
pub use export::{QuoteRequest, ReportDocument};
pub use result::CalculationResult;
pub use rules::{RuleWarning, Severity, WarningCode};
pub use settings::CalculatorSettings;
