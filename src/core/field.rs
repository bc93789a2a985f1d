//! Field value types and the static field table records expose

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Default display form, `None` for null
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Equality used by predicates: numbers compare by value across
    /// integer/float, null never equals anything.
    pub fn loose_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Null, _) | (_, FieldValue::Null) => false,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Integer(i), FieldValue::Float(f))
            | (FieldValue::Float(f), FieldValue::Integer(i)) => float_to_exact_i64(*f) == Some(*i),
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (a, b) => a == b,
        }
    }

    /// Total order used by in-process sorting. Null sorts first; values of
    /// different kinds fall back to comparing their display form.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.to_string().cmp(&b.to_string()),
            },
        }
    }

    /// Convert this value into one of the given kind.
    ///
    /// Strings are parsed into the target kind; numbers widen or narrow when
    /// no precision is lost. Returns `None` when no sensible conversion
    /// exists. Null stays null.
    pub fn coerce_to(&self, kind: FieldKind) -> Option<FieldValue> {
        if self.is_null() {
            return Some(FieldValue::Null);
        }

        match (kind, self) {
            (FieldKind::Text, FieldValue::String(_)) => Some(self.clone()),
            (FieldKind::Text, other) => Some(FieldValue::String(other.to_string())),

            (FieldKind::Integer, FieldValue::Integer(_)) => Some(self.clone()),
            (FieldKind::Integer, FieldValue::Float(f)) => float_to_exact_i64(*f).map(FieldValue::Integer),
            (FieldKind::Integer, FieldValue::String(s)) => parse_decimal(s).and_then(|v| match v {
                FieldValue::Float(f) => float_to_exact_i64(f).map(FieldValue::Integer),
                other => Some(other),
            }),

            (FieldKind::Float, FieldValue::Float(_)) => Some(self.clone()),
            (FieldKind::Float, FieldValue::Integer(i)) => Some(FieldValue::Float(*i as f64)),
            (FieldKind::Float, FieldValue::String(s)) => {
                parse_decimal(s).and_then(|v| v.as_f64()).map(FieldValue::Float)
            }

            (FieldKind::Boolean, FieldValue::Boolean(_)) => Some(self.clone()),
            (FieldKind::Boolean, FieldValue::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Some(FieldValue::Boolean(true)),
                "false" => Some(FieldValue::Boolean(false)),
                _ => None,
            },

            (FieldKind::Uuid, FieldValue::Uuid(_)) => Some(self.clone()),
            (FieldKind::Uuid, FieldValue::String(s)) => Uuid::parse_str(s.trim()).ok().map(FieldValue::Uuid),

            (FieldKind::DateTime, FieldValue::DateTime(_)) => Some(self.clone()),
            (FieldKind::DateTime, FieldValue::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc))),

            (FieldKind::Date, FieldValue::Date(_)) => Some(self.clone()),
            (FieldKind::Date, FieldValue::String(s)) => {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(FieldValue::Date)
            }

            _ => None,
        }
    }
}

/// Parse a decimal literal, preferring an exact integer.
///
/// Accepts surrounding whitespace and a leading sign; rejects NaN and
/// infinities so that only finite decimal numbers get through. A literal
/// whose fractional digits are all zero (`42.000`) parses as the exact
/// integer.
pub fn parse_decimal(raw: &str) -> Option<FieldValue> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(FieldValue::Integer(i));
    }
    if let Some((integer, fraction)) = raw.split_once('.') {
        if fraction.chars().all(|c| c == '0') {
            if let Ok(i) = integer.parse::<i64>() {
                return Some(FieldValue::Integer(i));
            }
        }
    }

    let looks_decimal = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !looks_decimal {
        return None;
    }

    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(FieldValue::Float)
}

/// The integer a float holds exactly, if any
fn float_to_exact_i64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() != 0.0 || !(-LIMIT..LIMIT).contains(&f) {
        return None;
    }
    Some(f as i64)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Null => Ok(()),
        }
    }
}

/// The underlying type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
    Date,
}

impl FieldKind {
    /// Whether free-text search applies to fields of this kind
    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::Text)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Uuid => "uuid",
            FieldKind::DateTime => "datetime",
            FieldKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// Lookup column metadata attached to a record field.
///
/// Built with chained setters so the record macro can write
/// `ColumnAttr::new().position(1).label("Name")`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAttr {
    pub position: Option<i32>,
    pub hidden: bool,
    pub format: Option<&'static str>,
    pub label: Option<&'static str>,
}

impl ColumnAttr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

/// One entry of a record type's static field table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Present when the field is exposed as a lookup column
    pub column: Option<ColumnAttr>,
}

impl FieldDef {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            column: None,
        }
    }

    pub fn with_column(mut self, column: ColumnAttr) -> Self {
        self.column = Some(column);
        self
    }
}

/// Rust types that can back a record field
pub trait IntoFieldValue {
    const KIND: FieldKind;

    fn to_field_value(&self) -> FieldValue;
}

macro_rules! integer_field {
    ($($t:ty),*) => {
        $(
            impl IntoFieldValue for $t {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Integer(*self as i64)
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, u8, u16, u32);

impl IntoFieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self as f64)
    }
}

impl IntoFieldValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl IntoFieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl IntoFieldValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl IntoFieldValue for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl IntoFieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl IntoFieldValue for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(value) => value.to_field_value(),
            None => FieldValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_null_renders_none() {
        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Null.render(), None);
        assert_eq!(FieldValue::Integer(7).render(), Some("7".to_string()));
    }

    #[test]
    fn test_loose_eq_crosses_numeric_kinds() {
        assert!(FieldValue::Integer(5).loose_eq(&FieldValue::Float(5.0)));
        assert!(!FieldValue::Integer(5).loose_eq(&FieldValue::Float(5.5)));
        assert!(!FieldValue::Null.loose_eq(&FieldValue::Null));
        assert!(!FieldValue::String("5".into()).loose_eq(&FieldValue::Integer(5)));
    }

    #[test]
    fn test_loose_eq_is_exact_above_float_precision() {
        let big = 9_007_199_254_740_993_i64;
        assert!(!FieldValue::Integer(big).loose_eq(&FieldValue::Float(9_007_199_254_740_992.0)));
        assert!(FieldValue::Integer(big - 1).loose_eq(&FieldValue::Float(9_007_199_254_740_992.0)));
        assert!(!FieldValue::Integer(i64::MAX).loose_eq(&FieldValue::Float(9.3e18)));
    }

    #[test]
    fn test_compare_puts_null_first() {
        let mut values = vec![
            FieldValue::Integer(3),
            FieldValue::Null,
            FieldValue::Float(1.5),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![FieldValue::Null, FieldValue::Float(1.5), FieldValue::Integer(3)]
        );
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 42 "), Some(FieldValue::Integer(42)));
        assert_eq!(parse_decimal("-1.25"), Some(FieldValue::Float(-1.25)));
        assert_eq!(parse_decimal("7.00"), Some(FieldValue::Integer(7)));
        assert_eq!(
            parse_decimal("9007199254740993.0"),
            Some(FieldValue::Integer(9_007_199_254_740_993))
        );
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_coerce_string_to_integer() {
        let value = FieldValue::String("5".into());
        assert_eq!(value.coerce_to(FieldKind::Integer), Some(FieldValue::Integer(5)));
        assert_eq!(
            FieldValue::String("5.0".into()).coerce_to(FieldKind::Integer),
            Some(FieldValue::Integer(5))
        );
        assert_eq!(FieldValue::String("5.5".into()).coerce_to(FieldKind::Integer), None);
        assert_eq!(FieldValue::String("five".into()).coerce_to(FieldKind::Integer), None);
    }

    #[test]
    fn test_coerce_to_text_and_boolean() {
        assert_eq!(
            FieldValue::Integer(9).coerce_to(FieldKind::Text),
            Some(FieldValue::String("9".into()))
        );
        assert_eq!(
            FieldValue::String("TRUE".into()).coerce_to(FieldKind::Boolean),
            Some(FieldValue::Boolean(true))
        );
        assert_eq!(FieldValue::Null.coerce_to(FieldKind::Uuid), Some(FieldValue::Null));
    }

    #[test]
    fn test_coerce_uuid_and_date() {
        let id = Uuid::new_v4();
        assert_eq!(
            FieldValue::String(id.to_string()).coerce_to(FieldKind::Uuid),
            Some(FieldValue::Uuid(id))
        );
        assert_eq!(
            FieldValue::String("2024-02-29".into()).coerce_to(FieldKind::Date),
            NaiveDate::from_ymd_opt(2024, 2, 29).map(FieldValue::Date)
        );
    }

    #[test]
    fn test_field_kind_classes() {
        assert!(FieldKind::Text.is_textual());
        assert!(!FieldKind::Integer.is_textual());
        assert!(FieldKind::Integer.is_numeric());
        assert!(FieldKind::Float.is_numeric());
        assert!(!FieldKind::Uuid.is_numeric());
    }

    #[test]
    fn test_into_field_value_option() {
        assert_eq!(<Option<String> as IntoFieldValue>::KIND, FieldKind::Text);
        assert_eq!(None::<i32>.to_field_value(), FieldValue::Null);
        assert_eq!(Some(3_u8).to_field_value(), FieldValue::Integer(3));
    }

    #[test]
    fn test_column_attr_builder() {
        let attr = ColumnAttr::new().position(2).label("Name").format("{0:00}");
        assert_eq!(attr.position, Some(2));
        assert_eq!(attr.label, Some("Name"));
        assert_eq!(attr.format, Some("{0:00}"));
        assert!(!attr.hidden);
    }

    #[test]
    fn test_serde_roundtrip_integer() {
        let original = FieldValue::Integer(42);
        let json = serde_json::to_string(&original).expect("serialize should succeed");
        let restored: FieldValue =
            serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_deserialize_null() {
        let restored: FieldValue = serde_json::from_str("null").expect("null should deserialize");
        assert!(restored.is_null());
    }
}
