//! Dynamic values stored in forms, value maps and table cells

use std::fmt;

use chrono::NaiveDate;

use crate::form::FormHandle;
use crate::row::RowEntity;

/// The closed set of field types a form can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Boolean,
    Int,
    Float,
    Double,
    Short,
    Long,
    String,
    Date,
    DropDown,
    Button,
    Form,
    Table,
    Custom,
}

impl FieldType {
    /// Upper-case name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::DropDown => "DROP_DOWN",
            Self::Button => "BUTTON",
            Self::Form => "FORM",
            Self::Table => "TABLE",
            Self::Custom => "CUSTOM",
        }
    }

    /// Whether fields of this type are numeric spinners
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Double | Self::Short | Self::Long
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generic numeric value as held by a spinner widget.
///
/// Numeric fields narrow it back to their concrete type with one of the
/// `*_value` conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    #[must_use]
    pub fn short_value(self) -> i16 {
        match self {
            Self::Integer(i) => i as i16,
            Self::Real(f) => f as i16,
        }
    }

    #[must_use]
    pub fn int_value(self) -> i32 {
        match self {
            Self::Integer(i) => i as i32,
            Self::Real(f) => f as i32,
        }
    }

    #[must_use]
    pub fn long_value(self) -> i64 {
        match self {
            Self::Integer(i) => i,
            Self::Real(f) => f as i64,
        }
    }

    #[must_use]
    pub fn float_value(self) -> f32 {
        match self {
            Self::Integer(i) => i as f32,
            Self::Real(f) => f as f32,
        }
    }

    #[must_use]
    pub fn double_value(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Real(f) => f,
        }
    }

    /// Whether this number has no fractional part by construction
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Add a step, staying integral when both sides are
    #[must_use]
    pub fn increment(self, step: Number) -> Number {
        match (self, step) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a.saturating_add(b)),
            (a, b) => Self::Real(a.double_value() + b.double_value()),
        }
    }

    /// Subtract a step, staying integral when both sides are
    #[must_use]
    pub fn decrement(self, step: Number) -> Number {
        match (self, step) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a.saturating_sub(b)),
            (a, b) => Self::Real(a.double_value() - b.double_value()),
        }
    }

    /// Clamp into optional inclusive bounds; a missing bound imposes nothing
    #[must_use]
    pub fn clamp_to(self, min: Option<Number>, max: Option<Number>) -> Number {
        if let Some(min) = min {
            if self.double_value() < min.double_value() {
                return min;
            }
        }
        if let Some(max) = max {
            if self.double_value() > max.double_value() {
                return max;
            }
        }
        self
    }

    /// Parse user input, keeping the integral/real flavour of `self`
    #[must_use]
    pub fn parse_like(self, text: &str) -> Option<Number> {
        let text = text.trim();
        match self {
            Self::Integer(_) => text.parse::<i64>().ok().map(Self::Integer),
            Self::Real(_) => text.parse::<f64>().ok().map(Self::Real),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

/// A value held by a form field, a value map entry or a table cell
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value; also what an empty table cell holds
    #[default]
    Null,
    Bool(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(NaiveDate),
    /// A nested form, shared with the widget that displays it
    Form(FormHandle),
    /// Rows of a table field
    Table(Vec<RowEntity>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in logs
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Form(_) => "form",
            Self::Table(_) => "table",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a generic number, if it is numeric
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Short(v) => Some(Number::Integer(i64::from(*v))),
            Self::Int(v) => Some(Number::Integer(i64::from(*v))),
            Self::Long(v) => Some(Number::Integer(*v)),
            Self::Float(v) => Some(Number::Real(f64::from(*v))),
            Self::Double(v) => Some(Number::Real(*v)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_form(&self) -> Option<&FormHandle> {
        match self {
            Self::Form(handle) => Some(handle),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&[RowEntity]> {
        match self {
            Self::Table(rows) => Some(rows),
            _ => None,
        }
    }

    /// Text shown for this value in a cell; `Null` displays as empty
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Short(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::String(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Form(_) => "<form>".to_string(),
            Self::Table(rows) => format!("<{} rows>", rows.len()),
        }
    }

    /// Parse edited cell text into the same variant as `self`.
    ///
    /// Empty text yields `Null`. Text that does not parse as the existing
    /// variant is kept as a string.
    #[must_use]
    pub fn parse_like(&self, text: &str) -> Value {
        if text.is_empty() {
            return Self::Null;
        }
        let trimmed = text.trim();
        let parsed = match self {
            Self::Bool(_) => trimmed.parse().ok().map(Self::Bool),
            Self::Short(_) => trimmed.parse().ok().map(Self::Short),
            Self::Int(_) => trimmed.parse().ok().map(Self::Int),
            Self::Long(_) => trimmed.parse().ok().map(Self::Long),
            Self::Float(_) => trimmed.parse().ok().map(Self::Float),
            Self::Double(_) => trimmed.parse().ok().map(Self::Double),
            Self::Date(_) => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::String(text.to_string()))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<FormHandle> for Value {
    fn from(v: FormHandle) -> Self {
        Self::Form(v)
    }
}

impl From<Vec<RowEntity>> for Value {
    fn from(v: Vec<RowEntity>) -> Self {
        Self::Table(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_narrowing() {
        let n = Number::Real(3.75);
        assert_eq!(n.int_value(), 3);
        assert_eq!(n.short_value(), 3);
        assert_eq!(n.long_value(), 3);
        assert!((n.float_value() - 3.75).abs() < f32::EPSILON);

        let i = Number::Integer(70_000);
        assert_eq!(i.int_value(), 70_000);
        assert_eq!(i.double_value(), 70_000.0);
    }

    #[test]
    fn test_number_step_keeps_flavour() {
        assert_eq!(Number::Integer(4).increment(Number::Integer(1)), Number::Integer(5));
        assert_eq!(Number::Integer(4).increment(Number::Real(0.5)), Number::Real(4.5));
        assert_eq!(Number::Real(1.0).decrement(Number::Real(0.25)), Number::Real(0.75));
    }

    #[test]
    fn test_number_clamp_without_bounds_is_identity() {
        let n = Number::Integer(-1_000_000);
        assert_eq!(n.clamp_to(None, None), n);
        assert_eq!(
            n.clamp_to(Some(Number::Integer(0)), None),
            Number::Integer(0)
        );
        assert_eq!(
            Number::Real(9.5).clamp_to(None, Some(Number::Real(2.0))),
            Number::Real(2.0)
        );
    }

    #[test]
    fn test_value_as_number() {
        assert_eq!(Value::Int(7).as_number(), Some(Number::Integer(7)));
        assert_eq!(Value::Double(0.5).as_number(), Some(Number::Real(0.5)));
        assert_eq!(Value::from("7").as_number(), None);
    }

    #[test]
    fn test_value_parse_like() {
        assert_eq!(Value::Int(1).parse_like("42"), Value::Int(42));
        assert_eq!(Value::Double(1.0).parse_like("2.5"), Value::Double(2.5));
        assert_eq!(Value::Int(1).parse_like("abc"), Value::from("abc"));
        assert_eq!(Value::Int(1).parse_like(""), Value::Null);
        assert_eq!(Value::Null.parse_like("x"), Value::from("x"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::Int(5).to_display_string(), "5");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::Date(date).to_display_string(), "2024-02-29");
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<i32> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(3_i32)), Value::Int(3));
    }
}
