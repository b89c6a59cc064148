//! Declarative field validation for JSON request bodies.
//!
//! A [`RuleSet`] maps field names to an ordered list of [`Rule`]s. Validation
//! collects every failing field into [`ValidationErrors`] and, on success,
//! returns only the fields the rule set knows about.
//!
//! Rule semantics:
//! - `Nullable`: an absent or `null` value skips the remaining rules.
//! - `Required`: absent, `null` and blank strings fail.
//! - Type rules (`String`, `Integer`, `Numeric`, `Boolean`, `Date`, `Map`):
//!   a failure stops further checks on that field.
//! - `Min`/`Max`: character count for strings, value for numbers, entry
//!   count for maps.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Date format accepted by [`Rule::Date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single field constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    Nullable,
    String,
    Integer,
    Numeric,
    Boolean,
    Date,
    Map,
    Min(i64),
    Max(i64),
    In(&'static [&'static str]),
}

impl Rule {
    /// Rule name as written in a rule expression (`"max:255"` style).
    #[must_use]
    pub fn expression(&self) -> String {
        match self {
            Self::Required => "required".into(),
            Self::Nullable => "nullable".into(),
            Self::String => "string".into(),
            Self::Integer => "integer".into(),
            Self::Numeric => "numeric".into(),
            Self::Boolean => "boolean".into(),
            Self::Date => "date".into(),
            Self::Map => "array".into(),
            Self::Min(n) => format!("min:{n}"),
            Self::Max(n) => format!("max:{n}"),
            Self::In(values) => format!("in:{}", values.join(",")),
        }
    }

    const fn is_type(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Numeric | Self::Boolean | Self::Date | Self::Map
        )
    }
}

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the given field has at least one failure.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }
}

/// Rules for a single field.
#[derive(Debug, Clone, PartialEq)]
struct FieldRules {
    field: &'static str,
    rules: Vec<Rule>,
}

/// Ordered mapping of field name to rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field with its rules.
    #[must_use]
    pub fn field(mut self, field: &'static str, rules: impl Into<Vec<Rule>>) -> Self {
        self.fields.push(FieldRules {
            field,
            rules: rules.into(),
        });
        self
    }

    /// Rule expressions per field, e.g. `{"name": "required|string|max:255"}`.
    #[must_use]
    pub fn expressions(&self) -> BTreeMap<&'static str, String> {
        self.fields
            .iter()
            .map(|f| {
                let expr = f
                    .rules
                    .iter()
                    .map(Rule::expression)
                    .collect::<Vec<_>>()
                    .join("|");
                (f.field, expr)
            })
            .collect()
    }

    /// Validate `input`, returning the subset of fields known to the rule set.
    ///
    /// # Errors
    /// Returns every failing field with its messages.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut validated = Map::new();

        for field in &self.fields {
            let value = input.get(field.field);
            match check_field(field.field, &field.rules, value) {
                Ok(()) => {
                    if let Some(v) = value {
                        validated.insert(field.field.to_string(), v.clone());
                    }
                }
                Err(messages) => {
                    for message in messages {
                        errors.add(field.field, message);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

/// Human label for a field name (`max_members` -> `max members`).
fn display_name(field: &str) -> String {
    field.replace('_', " ")
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_field(field: &str, rules: &[Rule], value: Option<&Value>) -> Result<(), Vec<String>> {
    let name = display_name(field);

    if rules.contains(&Rule::Nullable) && matches!(value, None | Some(Value::Null)) {
        return Ok(());
    }

    if is_missing(value) {
        if rules.contains(&Rule::Required) {
            return Err(vec![format!("The {name} field is required.")]);
        }
        if value.is_none() {
            return Ok(());
        }
    }

    let Some(value) = value else {
        return Ok(());
    };

    for rule in rules.iter().filter(|r| r.is_type()) {
        if let Some(message) = check_type(&name, *rule, value) {
            return Err(vec![message]);
        }
    }

    let messages: Vec<String> = rules
        .iter()
        .filter_map(|rule| check_constraint(&name, *rule, value))
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(messages)
    }
}

fn check_type(name: &str, rule: Rule, value: &Value) -> Option<String> {
    let ok = match rule {
        Rule::String => value.is_string(),
        Rule::Integer => value.is_i64() || value.is_u64(),
        Rule::Numeric => value.is_number(),
        Rule::Boolean => value.is_boolean(),
        Rule::Map => value.is_object(),
        Rule::Date => value
            .as_str()
            .is_some_and(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()),
        _ => true,
    };
    if ok {
        return None;
    }
    Some(match rule {
        Rule::String => format!("The {name} field must be a string."),
        Rule::Integer => format!("The {name} field must be an integer."),
        Rule::Numeric => format!("The {name} field must be a number."),
        Rule::Boolean => format!("The {name} field must be true or false."),
        Rule::Map => format!("The {name} field must be an array."),
        _ => format!("The {name} field must be a valid date."),
    })
}

/// Size of a value as interpreted by `Min`/`Max`.
fn measure(value: &Value) -> Option<(f64, &'static str)> {
    match value {
        Value::String(s) => Some((s.chars().count() as f64, " characters")),
        Value::Number(n) => n.as_f64().map(|v| (v, "")),
        Value::Object(m) => Some((m.len() as f64, " items")),
        Value::Array(a) => Some((a.len() as f64, " items")),
        _ => None,
    }
}

fn check_constraint(name: &str, rule: Rule, value: &Value) -> Option<String> {
    match rule {
        Rule::Min(min) => {
            let (size, unit) = measure(value)?;
            (size < min as f64).then(|| format!("The {name} field must be at least {min}{unit}."))
        }
        Rule::Max(max) => {
            let (size, unit) = measure(value)?;
            (size > max as f64)
                .then(|| format!("The {name} field must not be greater than {max}{unit}."))
        }
        Rule::In(allowed) => {
            let ok = value.as_str().is_some_and(|s| allowed.contains(&s));
            (!ok).then(|| format!("The selected {name} is invalid."))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn rules() -> RuleSet {
        RuleSet::new()
            .field("name", [Rule::Required, Rule::String, Rule::Max(10)])
            .field("size", [Rule::Nullable, Rule::Integer, Rule::Min(2)])
            .field("status", [Rule::Required, Rule::In(&["open", "closed"])])
            .field("due_on", [Rule::Nullable, Rule::Date])
    }

    #[test]
    fn valid_input_passes_and_drops_unknown_fields() {
        let input = object(json!({"name": "ok", "status": "open", "extra": 1}));
        let validated = rules().validate(&input).unwrap();
        assert_eq!(validated.get("name"), Some(&json!("ok")));
        assert!(!validated.contains_key("extra"));
        assert!(!validated.contains_key("size"));
    }

    #[test]
    fn required_rejects_missing_null_and_blank() {
        for name in [None, Some(json!(null)), Some(json!("   "))] {
            let mut input = object(json!({"status": "open"}));
            if let Some(name) = name {
                input.insert("name".into(), name);
            }
            let errors = rules().validate(&input).unwrap_err();
            assert_eq!(errors.messages("name"), ["The name field is required."]);
        }
    }

    #[test]
    fn nullable_accepts_null() {
        let input = object(json!({"name": "a", "status": "open", "size": null}));
        let validated = rules().validate(&input).unwrap();
        assert_eq!(validated.get("size"), Some(&json!(null)));
    }

    #[test]
    fn type_failure_stops_further_checks() {
        let input = object(json!({"name": "a", "status": "open", "size": "big"}));
        let errors = rules().validate(&input).unwrap_err();
        assert_eq!(errors.messages("size"), ["The size field must be an integer."]);
    }

    #[test]
    fn min_and_max_depend_on_value_type() {
        let input = object(json!({"name": "far too long", "status": "open", "size": 1}));
        let errors = rules().validate(&input).unwrap_err();
        assert_eq!(
            errors.messages("name"),
            ["The name field must not be greater than 10 characters."]
        );
        assert_eq!(errors.messages("size"), ["The size field must be at least 2."]);
    }

    #[test]
    fn in_rule_and_date_rule() {
        let input = object(json!({"name": "a", "status": "pending", "due_on": "31/12/2026"}));
        let errors = rules().validate(&input).unwrap_err();
        assert_eq!(errors.messages("status"), ["The selected status is invalid."]);
        assert_eq!(
            errors.messages("due_on"),
            ["The due on field must be a valid date."]
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn expressions_render_rule_strings() {
        let expressions = rules().expressions();
        assert_eq!(expressions["name"], "required|string|max:10");
        assert_eq!(expressions["status"], "required|in:open,closed");
    }
}
