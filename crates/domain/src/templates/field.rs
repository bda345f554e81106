//! Field declarations and the ordered field maps composed from them.
//!
//! A declaration knows how to coerce an arbitrary JSON value into its declared
//! shape. Migration uses the lenient form ([`FieldDecl::clean`], which falls back
//! to the initial value); field updates use the strict form ([`FieldDecl::validate`]).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::fragments::Fragment;

/// Tolerance used when checking step granularity on floating point values.
const STEP_EPSILON: f64 = 1e-9;

/// Largest integer that survives an f64 round trip.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Value type of a declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Number,
    String,
    Boolean,
    /// One of a fixed set of string keys
    Choice(&'static [&'static str]),
    /// Object whose entries are all booleans (property flags)
    FlagMap,
    /// Ordered list of unique strings
    StringSet,
}

/// Validation bounds for a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
    pub step: Option<f64>,
    /// Strings may be empty
    pub blank: bool,
    /// `null` is a legal value
    pub nullable: bool,
}

/// Declaration of a single field inside a capability fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    path: &'static str,
    field_type: FieldType,
    required: bool,
    initial: Value,
    bounds: FieldBounds,
}

impl FieldDecl {
    fn with(path: &'static str, field_type: FieldType, initial: Value) -> Self {
        Self {
            path,
            field_type,
            required: false,
            initial,
            bounds: FieldBounds::default(),
        }
    }

    pub fn number(path: &'static str, initial: f64) -> Self {
        Self::with(path, FieldType::Number, number_value(initial))
    }

    /// Optional number whose initial value is `null`.
    pub fn nullable_number(path: &'static str) -> Self {
        Self::with(path, FieldType::Number, Value::Null).nullable()
    }

    pub fn string(path: &'static str, initial: &'static str) -> Self {
        let mut decl = Self::with(path, FieldType::String, Value::from(initial));
        decl.bounds.blank = true;
        decl
    }

    pub fn choice(
        path: &'static str,
        choices: &'static [&'static str],
        initial: &'static str,
    ) -> Self {
        Self::with(path, FieldType::Choice(choices), Value::from(initial))
    }

    pub fn boolean(path: &'static str, initial: bool) -> Self {
        Self::with(path, FieldType::Boolean, Value::Bool(initial))
    }

    pub fn flags(path: &'static str) -> Self {
        Self::with(path, FieldType::FlagMap, Value::Object(Map::new()))
    }

    pub fn string_set(path: &'static str) -> Self {
        Self::with(path, FieldType::StringSet, Value::Array(Vec::new()))
    }

    pub fn min(mut self, min: f64) -> Self {
        self.bounds.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.bounds.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.bounds.integer = true;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.bounds.step = Some(step);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.bounds.nullable = true;
        self
    }

    pub fn allow_blank(mut self) -> Self {
        self.bounds.blank = true;
        self
    }

    pub fn non_blank(mut self) -> Self {
        self.bounds.blank = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    /// Lenient coercion: invalid input degrades to the initial value.
    ///
    /// A diagnostic is produced when a present value had to be replaced, or when
    /// a required field is missing entirely.
    pub fn clean(&self, raw: Option<&Value>) -> (Value, Option<FieldDiagnostic>) {
        let Some(raw) = raw else {
            let diagnostic = self
                .required
                .then(|| FieldDiagnostic::new(self.path, "required field is missing", None));
            return (self.initial.clone(), diagnostic);
        };
        match self.coerce(raw) {
            Ok(value) => (value, None),
            Err(message) => (
                self.initial.clone(),
                Some(FieldDiagnostic::new(self.path, message, Some(raw.clone()))),
            ),
        }
    }

    /// Strict coercion used for field updates.
    pub fn validate(&self, value: &Value) -> Result<Value, FieldDiagnostic> {
        self.coerce(value)
            .map_err(|message| FieldDiagnostic::new(self.path, message, Some(value.clone())))
    }

    fn coerce(&self, raw: &Value) -> Result<Value, String> {
        match &self.field_type {
            FieldType::Number => self.coerce_number(raw),
            FieldType::String => self.coerce_string(raw, None),
            FieldType::Choice(choices) => self.coerce_string(raw, Some(choices)),
            FieldType::Boolean => coerce_boolean(raw),
            FieldType::FlagMap => coerce_flags(raw),
            FieldType::StringSet => coerce_string_set(raw),
        }
    }

    fn coerce_number(&self, raw: &Value) -> Result<Value, String> {
        let n = match raw {
            Value::Null => return self.null_or("value cannot be null"),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| "number is not representable".to_string())?,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return self.null_or("value cannot be blank");
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| format!("{:?} is not a number", s))?
            }
            _ => return Err("expected a number".to_string()),
        };
        self.check_bounds(n)?;
        Ok(number_value(n))
    }

    fn check_bounds(&self, n: f64) -> Result<(), String> {
        if self.bounds.integer && n.fract() != 0.0 {
            return Err(format!("{} must be an integer", n));
        }
        if let Some(min) = self.bounds.min {
            if n < min {
                return Err(format!("{} is below the minimum of {}", n, min));
            }
        }
        if let Some(max) = self.bounds.max {
            if n > max {
                return Err(format!("{} exceeds the maximum of {}", n, max));
            }
        }
        if let Some(step) = self.bounds.step {
            let base = self.bounds.min.unwrap_or(0.0);
            let steps = (n - base) / step;
            if (steps - steps.round()).abs() > STEP_EPSILON {
                return Err(format!("{} is not a multiple of {}", n, step));
            }
        }
        Ok(())
    }

    fn coerce_string(
        &self,
        raw: &Value,
        choices: Option<&'static [&'static str]>,
    ) -> Result<Value, String> {
        let s = match raw {
            Value::Null if self.bounds.nullable => return Ok(Value::Null),
            Value::Null if self.bounds.blank && choices.is_none() => String::new(),
            Value::Null => return Err("value cannot be null".to_string()),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err("expected a string".to_string()),
        };
        if s.trim().is_empty() && !self.bounds.blank {
            return self.null_or("value cannot be blank");
        }
        if let Some(choices) = choices {
            if !(s.is_empty() && self.bounds.blank) && !choices.contains(&s.as_str()) {
                return Err(format!("{:?} is not an allowed choice", s));
            }
        }
        Ok(Value::String(s))
    }

    fn null_or(&self, message: &str) -> Result<Value, String> {
        if self.bounds.nullable {
            Ok(Value::Null)
        } else {
            Err(message.to_string())
        }
    }
}

fn coerce_boolean(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        Value::Number(n) if n.as_f64() == Some(1.0) => Ok(Value::Bool(true)),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Value::Bool(false)),
        _ => Err("expected a boolean".to_string()),
    }
}

fn coerce_flags(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Object(entries) => Ok(Value::Object(
            entries
                .iter()
                .filter(|(_, v)| v.is_boolean())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )),
        // Older records stored only the enabled keys
        Value::Array(keys) => Ok(Value::Object(
            keys.iter()
                .filter_map(Value::as_str)
                .map(|k| (k.to_string(), Value::Bool(true)))
                .collect(),
        )),
        _ => Err("expected a map of flags".to_string()),
    }
}

fn coerce_string_set(raw: &Value) -> Result<Value, String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    let mut push = |s: &str| {
        if !s.is_empty() && seen.insert(s.to_string()) {
            out.push(Value::String(s.to_string()));
        }
    };
    match raw {
        Value::Array(items) => items.iter().filter_map(Value::as_str).for_each(&mut push),
        Value::String(s) => push(s.as_str()),
        Value::Object(entries) => entries
            .iter()
            .filter(|(_, v)| v.as_bool() == Some(true))
            .for_each(|(k, _)| push(k.as_str())),
        _ => return Err("expected a list of strings".to_string()),
    }
    Ok(Value::Array(out))
}

/// Canonical JSON form of a number: integral values are stored as integers.
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// A field-scoped validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiagnostic {
    /// Dotted path of the field
    pub field: String,
    pub message: String,
    /// The offending raw value, if one was present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldDiagnostic {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
        }
    }
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered set of field declarations, keyed by dotted path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<FieldDecl>,
}

impl FieldMap {
    /// Merge fragments left to right; a later declaration of the same path wins
    /// but keeps the position of the first declaration.
    pub fn compose<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> Self {
        let mut map = Self::default();
        for fragment in fragments {
            for decl in fragment.fields() {
                map.insert(decl.clone());
            }
        }
        map
    }

    fn insert(&mut self, decl: FieldDecl) {
        match self.fields.iter_mut().find(|f| f.path == decl.path) {
            Some(existing) => *existing = decl,
            None => self.fields.push(decl),
        }
    }

    pub fn get(&self, path: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First pair of paths where one field would have to nest inside another.
    pub fn structural_conflict(&self) -> Option<(&'static str, &'static str)> {
        self.fields.iter().find_map(|outer| {
            self.fields
                .iter()
                .find(|inner| {
                    inner.path.len() > outer.path.len()
                        && inner.path.starts_with(outer.path)
                        && inner.path.as_bytes()[outer.path.len()] == b'.'
                })
                .map(|inner| (outer.path, inner.path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_coerced() {
        let decl = FieldDecl::number("weight", 0.0).min(0.0);
        assert_eq!(decl.clean(Some(&json!(" 2.5 "))).0, json!(2.5));
        assert_eq!(decl.clean(Some(&json!("3"))).0, json!(3));
    }

    #[test]
    fn blank_nullable_number_becomes_null() {
        let decl = FieldDecl::nullable_number("armor.dex").integer();
        let (value, diagnostic) = decl.clean(Some(&json!("")));
        assert_eq!(value, Value::Null);
        assert!(diagnostic.is_none());
    }

    #[test]
    fn out_of_bounds_number_degrades_with_diagnostic() {
        let decl = FieldDecl::number("levels", 1.0).integer().min(1.0).max(20.0);
        let (value, diagnostic) = decl.clean(Some(&json!(25)));
        assert_eq!(value, json!(1));
        let diagnostic = diagnostic.unwrap();
        assert_eq!(diagnostic.field, "levels");
        assert_eq!(diagnostic.value, Some(json!(25)));
    }

    #[test]
    fn step_granularity_is_enforced() {
        let decl = FieldDecl::nullable_number("proficient")
            .min(0.0)
            .max(2.0)
            .step(0.5);
        assert_eq!(decl.validate(&json!(1.5)).unwrap(), json!(1.5));
        assert!(decl.validate(&json!(0.7)).is_err());
    }

    #[test]
    fn choice_rejects_unknown_values() {
        let decl = FieldDecl::choice("weaponType", &["simpleM", "martialM"], "simpleM");
        assert_eq!(decl.clean(Some(&json!("martialM"))).0, json!("martialM"));
        assert_eq!(decl.clean(Some(&json!("laser"))).0, json!("simpleM"));
        assert_eq!(decl.clean(Some(&Value::Null)).0, json!("simpleM"));
    }

    #[test]
    fn flag_map_drops_non_boolean_entries() {
        let decl = FieldDecl::flags("properties");
        let (value, _) = decl.clean(Some(&json!({"fin": true, "old": "legacy", "hvy": false})));
        assert_eq!(value, json!({"fin": true, "hvy": false}));
    }

    #[test]
    fn string_set_deduplicates() {
        let decl = FieldDecl::string_set("tags");
        let (value, _) = decl.clean(Some(&json!(["a", "b", "a", 3])));
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn missing_required_field_reports() {
        let decl = FieldDecl::string("identifier", "").required();
        let (value, diagnostic) = decl.clean(None);
        assert_eq!(value, json!(""));
        assert!(diagnostic.is_some());
        assert!(FieldDecl::string("chat", "").clean(None).1.is_none());
    }

    #[test]
    fn compose_is_last_wins() {
        let base = Fragment::new("base").field(FieldDecl::number("quantity", 1.0));
        let special = Fragment::new("special")
            .field(FieldDecl::number("quantity", 5.0))
            .field(FieldDecl::boolean("equipped", false));
        let map = FieldMap::compose([&base, &special]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("quantity").unwrap().initial(), &json!(5));
        assert_eq!(map.iter().next().unwrap().path(), "quantity");
    }

    #[test]
    fn detects_nesting_conflicts() {
        let a = Fragment::new("a").field(FieldDecl::flags("uses"));
        let b = Fragment::new("b").field(FieldDecl::number("uses.value", 0.0));
        let map = FieldMap::compose([&a, &b]);
        assert_eq!(map.structural_conflict(), Some(("uses", "uses.value")));
    }
}
