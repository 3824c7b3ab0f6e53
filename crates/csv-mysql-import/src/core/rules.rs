//! Field validation rule vocabulary.
//!
//! Rules are declared as data: an ordered set of fields, each with an
//! ordered list of [`Constraint`]s. The validator walks them in declaration
//! order, and the declaration order also defines the column headers used
//! when partition tables are displayed.

use regex::Regex;
use rust_decimal::Decimal;

use crate::core::record::FieldValue;

/// A single named constraint on one field's cell value.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Cell must be non-empty.
    Required,

    /// Character count of the original text within inclusive bounds.
    Length { min: usize, max: usize },

    /// Cell must have parsed as a number.
    Numeric,

    /// Original text must match the pattern.
    Pattern(Regex),

    /// Numeric value strictly greater than zero.
    Positive,

    /// Original text must equal one of the choices.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Build a `OneOf` constraint from string choices.
    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf(choices.into_iter().map(Into::into).collect())
    }

    /// Check one cell against this constraint.
    #[must_use]
    pub fn check(&self, value: &FieldValue) -> bool {
        match self {
            Constraint::Required => !value.is_empty(),
            Constraint::Length { min, max } => {
                let count = value.raw().chars().count();
                count >= *min && count <= *max
            }
            Constraint::Numeric => value.as_decimal().is_some(),
            Constraint::Pattern(re) => re.is_match(value.raw()),
            Constraint::Positive => value
                .as_decimal()
                .is_some_and(|v| v > Decimal::ZERO),
            Constraint::OneOf(choices) => {
                choices.iter().any(|choice| choice == value.raw())
            }
        }
    }
}

/// The ordered constraints declared for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: String,
    constraints: Vec<Constraint>,
}

impl FieldRules {
    /// Field name these rules apply to.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// First constraint the cell fails, if any.
    #[must_use]
    pub fn first_violation(&self, value: &FieldValue) -> Option<&Constraint> {
        self.constraints.iter().find(|c| !c.check(value))
    }
}

/// Ordered mapping from field name to its constraint list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRules>,
}

impl RuleSet {
    /// Empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules for one field, keeping declaration order.
    pub fn field(mut self, name: impl Into<String>, constraints: Vec<Constraint>) -> Self {
        self.rules.push(FieldRules {
            field: name.into(),
            constraints,
        });
        self
    }

    /// Iterate per-field rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.rules.iter()
    }

    /// Declared field names in order (also the display headers).
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
