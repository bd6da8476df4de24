//! Violations and the `Validate` trait.
//!
//! Every model type reports invariant breaches into a [`Violations`]
//! accumulator instead of failing on the first one, so callers get the full
//! list of offending fields in a single response. Nested records are checked
//! inside a scope, which prefixes field names (`nodes[1].id`,
//! `progress_overview.title`).

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, ValidationErrors};

/// Inclusive range for percentages.
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Inclusive range for probabilities and confidence scores.
pub const UNIT_RANGE: (f64, f64) = (0.0, 1.0);

/// The rule a violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    UnknownField,
    InvalidType,
    InvalidFormat,
    OutOfRange,
    NotFinite,
    Blank,
    DanglingReference,
    Duplicate,
    Ordering,
    Mismatch,
    Immutable,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::UnknownField => "unknown_field",
            Self::InvalidType => "invalid_type",
            Self::InvalidFormat => "invalid_format",
            Self::OutOfRange => "out_of_range",
            Self::NotFinite => "not_finite",
            Self::Blank => "blank",
            Self::DanglingReference => "dangling_reference",
            Self::Duplicate => "duplicate",
            Self::Ordering => "ordering",
            Self::Mismatch => "mismatch",
            Self::Immutable => "immutable",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broken invariant: which field, which rule, and a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
    pub detail: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: Rule, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.detail, self.rule)
    }
}

/// Accumulates violations, prefixing field names with the active scopes.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<Violation>,
    scopes: Vec<String>,
}

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field` under the current scope.
    pub fn push(&mut self, field: &str, rule: Rule, detail: impl Into<String>) {
        let field = self.qualify(field);
        self.items.push(Violation::new(field, rule, detail));
    }

    /// Run `check` with `scope` prepended to every field it reports.
    pub fn scoped(&mut self, scope: impl Into<String>, check: impl FnOnce(&mut Self)) {
        self.scopes.push(scope.into());
        check(self);
        self.scopes.pop();
    }

    pub fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, Rule::Blank, "must not be blank");
        }
    }

    pub fn finite(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.push(field, Rule::NotFinite, format!("must be a finite number, got {value}"));
        }
    }

    /// Finite and within the inclusive `(min, max)` range.
    pub fn in_range(&mut self, field: &str, value: f64, (min, max): (f64, f64)) {
        if !value.is_finite() {
            self.finite(field, value);
        } else if value < min || value > max {
            self.push(
                field,
                Rule::OutOfRange,
                format!("must be between {min} and {max}, got {value}"),
            );
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` carrying every recorded violation.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(ValidationErrors::new(self.items)))
        }
    }

    fn qualify(&self, field: &str) -> String {
        let mut qualified = String::new();
        for scope in &self.scopes {
            if !qualified.is_empty() && !scope.starts_with('[') {
                qualified.push('.');
            }
            qualified.push_str(scope);
        }
        if !qualified.is_empty() && !field.starts_with('[') {
            qualified.push('.');
        }
        qualified.push_str(field);
        qualified
    }
}

/// Re-checks the invariants of a model value.
pub trait Validate {
    /// Report every broken invariant into `out`.
    fn check(&self, out: &mut Violations);

    /// All violations, empty when the value is valid.
    fn violations(&self) -> Vec<Violation> {
        let mut out = Violations::new();
        self.check(&mut out);
        out.into_vec()
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` when any invariant is broken.
    fn validate(&self) -> Result<(), CoreError> {
        let mut out = Violations::new();
        self.check(&mut out);
        out.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_prefix_field_names() {
        let mut out = Violations::new();
        out.scoped("nodes", |out| {
            out.scoped("[2]", |out| out.not_blank("id", " "));
        });
        out.scoped("progress_overview", |out| out.not_blank("title", ""));
        out.not_blank("name", "");

        let fields: Vec<String> = out.into_vec().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, ["nodes[2].id", "progress_overview.title", "name"]);
    }

    #[test]
    fn range_check_reports_non_finite_separately() {
        let mut out = Violations::new();
        out.in_range("confidence_score", f64::NAN, UNIT_RANGE);
        out.in_range("progress_percentage", 101.0, PERCENT_RANGE);
        out.in_range("probability", 1.0, UNIT_RANGE);

        let rules: Vec<Rule> = out.into_vec().into_iter().map(|v| v.rule).collect();
        assert_eq!(rules, [Rule::NotFinite, Rule::OutOfRange]);
    }

    #[test]
    fn empty_accumulator_is_ok() {
        assert!(Violations::new().into_result().is_ok());
    }
}
