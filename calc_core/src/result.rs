//! # Calculation Results
//!
//! [`CalculationResult`] is the single artifact a calculator hands to
//! presentation and export code: the engine's derived quantities, the
//! warnings its rules raised, and a one-line summary.
//!
//! A result is assembled once and exposes no mutating API. Recalculating
//! produces a new result which replaces the old one wholesale.

use serde::{Deserialize, Serialize};

use crate::rules::{RuleWarning, Severity, WarningCode};

/// Derived quantities + warnings + summary for one calculation run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "derived": { "current_a": 32.0, "size_mm2": 6.0, "...": "..." },
///   "warnings": [],
///   "summary": "6mm² cable recommended for 32.0A over 20m (Method C)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult<D> {
    derived: D,
    warnings: Vec<RuleWarning>,
    summary: String,
}

impl<D> CalculationResult<D> {
    pub(crate) fn assemble(derived: D, warnings: Vec<RuleWarning>, summary: String) -> Self {
        CalculationResult {
            derived,
            warnings,
            summary,
        }
    }

    /// Engine-specific derived quantities
    pub fn derived(&self) -> &D {
        &self.derived
    }

    /// Warnings in rule-evaluation order
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// True when no rule fired
    pub fn is_clear(&self) -> bool {
        self.warnings.is_empty()
    }

    /// True if the given rule fired
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Most serious severity raised, if any
    pub fn highest_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|w| w.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(code: WarningCode, severity: Severity) -> RuleWarning {
        RuleWarning {
            code,
            severity,
            message: String::new(),
        }
    }

    #[test]
    fn test_accessors() {
        let result = CalculationResult::assemble(
            42_u32,
            vec![
                warning(WarningCode::InsufficientTies, Severity::Warning),
                warning(WarningCode::StabilityRatioExceeded, Severity::Critical),
            ],
            "summary".to_string(),
        );
        assert_eq!(*result.derived(), 42);
        assert!(!result.is_clear());
        assert!(result.has_warning(WarningCode::InsufficientTies));
        assert!(!result.has_warning(WarningCode::NonCompliant));
        assert_eq!(result.highest_severity(), Some(Severity::Critical));
        assert_eq!(result.summary(), "summary");
    }

    #[test]
    fn test_clear_result() {
        let result = CalculationResult::assemble((), Vec::new(), "ok".to_string());
        assert!(result.is_clear());
        assert_eq!(result.highest_severity(), None);
    }
}
