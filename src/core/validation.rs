//! Request payload validation
//!
//! Rule sets are plain values built per operation and passed into validation
//! calls; nothing is registered globally. Each rule is a closure over one
//! field of a JSON payload, in the same shape the reusable field validators
//! take elsewhere in the crate.
//!
//! ```rust,ignore
//! let rules = RuleSet::new()
//!     .field("email", vec![rules::required(), rules::email()])
//!     .field("name", vec![rules::min_length(2)]);
//!
//! if let Err(errors) = rules.check(&payload) {
//!     // errors: {"email": ["required"], ...}
//! }
//! ```

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::core::error::FieldErrors;

/// One check over a single payload field
///
/// Receives the field name and its value (`Null` when absent) and returns a
/// message on failure.
pub type Rule = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Ordered collection of rules per field for one operation
#[derive(Default)]
pub struct RuleSet {
    fields: IndexMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach rules to a field
    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.entry(name.into()).or_default().extend(rules);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run every rule against the payload
    ///
    /// Collects all failures rather than stopping at the first one.
    pub fn check(&self, payload: &Value) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, rules) in &self.fields {
            let value = payload.get(field).unwrap_or(&Value::Null);

            for rule in rules {
                if let Err(message) = rule(field, value) {
                    errors.entry(field.clone()).or_default().push(message);
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Reusable field rules
pub mod rules {
    use super::*;
    use std::sync::LazyLock;

    static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    });

    /// Field must be present and neither null nor an empty string
    pub fn required() -> Rule {
        Box::new(|_: &str, value: &Value| {
            let missing = match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            };

            if missing {
                Err("required".to_string())
            } else {
                Ok(())
            }
        })
    }

    /// String must have at least `min` characters
    ///
    /// Non-string values pass; another rule is responsible for the type.
    pub fn min_length(min: usize) -> Rule {
        Box::new(move |_: &str, value: &Value| match value.as_str() {
            Some(s) if s.chars().count() < min => {
                Err(format!("must have at least {min} characters"))
            }
            _ => Ok(()),
        })
    }

    /// String must not exceed `max` characters
    pub fn max_length(max: usize) -> Rule {
        Box::new(move |_: &str, value: &Value| match value.as_str() {
            Some(s) if s.chars().count() > max => {
                Err(format!("must not exceed {max} characters"))
            }
            _ => Ok(()),
        })
    }

    /// Number must be strictly positive
    pub fn positive() -> Rule {
        Box::new(|_: &str, value: &Value| match value.as_f64() {
            Some(n) if n <= 0.0 => Err("must be positive".to_string()),
            _ => Ok(()),
        })
    }

    /// Number must not exceed `max`
    pub fn max_value(max: f64) -> Rule {
        Box::new(move |_: &str, value: &Value| match value.as_f64() {
            Some(n) if n > max => Err(format!("must not exceed {max}")),
            _ => Ok(()),
        })
    }

    /// String must match the given pattern
    pub fn matches(pattern: Regex) -> Rule {
        Box::new(move |_: &str, value: &Value| match value.as_str() {
            Some(s) if !pattern.is_match(s) => Err("invalid format".to_string()),
            _ => Ok(()),
        })
    }

    /// String must look like an email address
    pub fn email() -> Rule {
        Box::new(|_: &str, value: &Value| match value.as_str() {
            Some(s) if !EMAIL_RE.is_match(s) => Err("must be a valid email".to_string()),
            _ => Ok(()),
        })
    }
}
