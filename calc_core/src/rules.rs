//! # Rule Evaluation
//!
//! Safety and compliance checks are data: a [`Rule`] pairs a predicate over an
//! engine's derived quantities with the warning it emits. A [`RuleSet`]
//! evaluates every rule, in declaration order, on every run. Rules never
//! short-circuit each other, so any subset may fire.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::rules::{Rule, RuleSet, Severity, WarningCode};
//!
//! struct Platform { width_m: f64 }
//!
//! let rules = RuleSet::new(vec![Rule::new(
//!     WarningCode::PlatformWidthBelowMinimum,
//!     Severity::Critical,
//!     |p: &Platform| p.width_m < 0.6,
//!     |p: &Platform| format!("Platform width {:.2} m is below 0.6 m", p.width_m),
//! )]);
//!
//! assert_eq!(rules.evaluate(&Platform { width_m: 0.5 }).len(), 1);
//! assert!(rules.evaluate(&Platform { width_m: 0.9 }).is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Stable identifier for every warning the calculators can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Current above the top ampacity bound, clamped to the largest size
    CurrentExceedsTable,
    /// Voltage drop over the run exceeds the circuit limit
    VoltageDropExceeded,
    /// U-value above the regulation target
    NonCompliant,
    /// Scaffold height needs a bespoke engineered design
    SpecialistDesignRequired,
    /// Too few ties for the scaffold height
    InsufficientTies,
    /// Working platform narrower than the minimum
    PlatformWidthBelowMinimum,
    /// Height to base-width ratio above the free-standing limit
    StabilityRatioExceeded,
    /// Tall independent scaffold on a narrow base
    NarrowBaseStability,
}

/// How serious a warning is for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A tagged message emitted when a derived quantity crosses a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleWarning {
    pub code: WarningCode,
    pub severity: Severity,
    pub message: String,
}

/// One independent check over a subject `D`
pub struct Rule<D> {
    pub code: WarningCode,
    pub severity: Severity,
    pub applies: fn(&D) -> bool,
    pub message: fn(&D) -> String,
}

// No `D: Clone` / `D: Debug` bounds.
impl<D> Clone for Rule<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Rule<D> {}

impl<D> std::fmt::Debug for Rule<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl<D> Rule<D> {
    pub const fn new(
        code: WarningCode,
        severity: Severity,
        applies: fn(&D) -> bool,
        message: fn(&D) -> String,
    ) -> Self {
        Rule {
            code,
            severity,
            applies,
            message,
        }
    }

    /// Emit this rule's warning if its predicate holds
    pub fn evaluate(&self, subject: &D) -> Option<RuleWarning> {
        (self.applies)(subject).then(|| RuleWarning {
            code: self.code,
            severity: self.severity,
            message: (self.message)(subject),
        })
    }
}

/// Ordered list of independent rules.
#[derive(Debug, Clone)]
pub struct RuleSet<D> {
    rules: Vec<Rule<D>>,
}

impl<D> RuleSet<D> {
    pub fn new(rules: Vec<Rule<D>>) -> Self {
        RuleSet { rules }
    }

    /// Evaluate every rule in order; the result holds one warning per rule that fired.
    pub fn evaluate(&self, subject: &D) -> Vec<RuleWarning> {
        self.rules.iter().filter_map(|rule| rule.evaluate(subject)).collect()
    }

    /// Append a rule (evaluated after the existing ones)
    pub fn with(mut self, rule: Rule<D>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Drop every rule with the given code
    pub fn without(mut self, code: WarningCode) -> Self {
        self.rules.retain(|rule| rule.code != code);
        self
    }

    /// Look up a single rule, e.g. to test it in isolation
    pub fn rule(&self, code: WarningCode) -> Option<&Rule<D>> {
        self.rules.iter().find(|rule| rule.code == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = WarningCode> + '_ {
        self.rules.iter().map(|rule| rule.code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Subject {
        value: f64,
    }

    fn rules() -> RuleSet<Subject> {
        RuleSet::new(vec![
            Rule::new(
                WarningCode::SpecialistDesignRequired,
                Severity::Critical,
                |s: &Subject| s.value > 10.0,
                |s: &Subject| format!("value {} above 10", s.value),
            ),
            Rule::new(
                WarningCode::InsufficientTies,
                Severity::Warning,
                |s: &Subject| s.value > 5.0,
                |_: &Subject| "value above 5".to_string(),
            ),
        ])
    }

    #[test]
    fn test_all_rules_evaluated_in_order() {
        let warnings = rules().evaluate(&Subject { value: 12.0 });
        let codes: Vec<_> = warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![WarningCode::SpecialistDesignRequired, WarningCode::InsufficientTies]
        );
        assert_eq!(warnings[0].message, "value 12 above 10");
    }

    #[test]
    fn test_rules_are_independent() {
        let warnings = rules().evaluate(&Subject { value: 7.0 });
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::InsufficientTies);
    }

    #[test]
    fn test_add_and_remove_rules() {
        let set = rules().without(WarningCode::InsufficientTies);
        assert_eq!(set.len(), 1);
        assert!(set.rule(WarningCode::InsufficientTies).is_none());

        let set = set.with(Rule::new(
            WarningCode::NonCompliant,
            Severity::Info,
            |s: &Subject| s.value < 0.0,
            |_: &Subject| "negative".to_string(),
        ));
        assert_eq!(set.codes().last(), Some(WarningCode::NonCompliant));
        assert_eq!(set.evaluate(&Subject { value: -1.0 }).len(), 1);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = RuleWarning {
            code: WarningCode::StabilityRatioExceeded,
            severity: Severity::Critical,
            message: "ratio".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"STABILITY_RATIO_EXCEEDED\""));
        assert!(json.contains("\"critical\""));
    }
}
