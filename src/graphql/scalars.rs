//! Custom GraphQL scalars.
//!
//! `Date` carries three coercions:
//!
//! - [parse_literal]: value written inline in the query text. Only integer
//!   literals (epoch milliseconds) are accepted; everything else is absent.
//! - [parse_value]: value supplied as an operation variable.
//! - [serialize]: internal representation to wire value.
//!
//! async-graphql resolves variables before calling [ScalarType::parse], so the
//! scalar cannot tell the two input paths apart and applies literal rules to
//! both.

use async_graphql::{InputValueError, InputValueResult, Number, Scalar, ScalarType, Value};
use chrono::{DateTime, SecondsFormat, Utc};

/// Internal representation of a `Date`.
#[derive(Debug, Clone, PartialEq)]
pub enum DateRepr {
    /// Text as stored, e.g. `"1546300800000"`.
    Text(String),
    /// Epoch milliseconds.
    Integer(i64),
    Float(f64),
    Instant(DateTime<Utc>),
}

/// The `Date` scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Date(pub DateRepr);

impl Date {
    pub fn now() -> Self {
        Self(DateRepr::Instant(Utc::now()))
    }

    /// Date at `millis` milliseconds since the Unix epoch, if representable.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|at| Self(DateRepr::Instant(at)))
    }

    pub fn repr(&self) -> &DateRepr {
        &self.0
    }

    /// Epoch milliseconds when the date holds an instant.
    pub fn timestamp_millis(&self) -> Option<i64> {
        match &self.0 {
            DateRepr::Instant(at) => Some(at.timestamp_millis()),
            _ => None,
        }
    }
}

impl From<DateRepr> for Date {
    fn from(repr: DateRepr) -> Self {
        Self(repr)
    }
}

/// Kind of an input node, as written in query text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralNode {
    /// Integer literal with its source text.
    Int(String),
    Float(String),
    String(String),
    Boolean(bool),
    Enum(String),
    Null,
    List,
    Object,
    Other,
}

impl From<&Value> for LiteralNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => LiteralNode::Int(n.to_string()),
            Value::Number(n) => LiteralNode::Float(n.to_string()),
            Value::String(s) => LiteralNode::String(s.clone()),
            Value::Boolean(b) => LiteralNode::Boolean(*b),
            Value::Enum(name) => LiteralNode::Enum(name.to_string()),
            Value::Null => LiteralNode::Null,
            Value::List(_) => LiteralNode::List,
            Value::Object(_) => LiteralNode::Object,
            Value::Binary(_) => LiteralNode::Other,
        }
    }
}

/// Coerce a variable value.
///
/// Always returns the current time and ignores `input`. The schema does not
/// call this; variables go through [parse_literal] like inline literals.
pub fn parse_value(_input: &Value) -> Date {
    Date::now()
}

/// Coerce an inline literal. Only integer literals (epoch milliseconds) yield
/// a date; any other kind, or an out-of-range integer, is absent.
pub fn parse_literal(node: &LiteralNode) -> Option<Date> {
    match node {
        LiteralNode::Int(text) => text.parse::<i64>().ok().and_then(Date::from_millis),
        _ => None,
    }
}

/// Render the internal representation for the wire.
///
/// Digit-only text becomes an integer, integers pass through, and everything
/// else is returned as-is.
pub fn serialize(input: &DateRepr) -> Value {
    match input {
        DateRepr::Text(text) if is_decimal_digits(text) => match text.parse::<i64>() {
            Ok(n) => Value::Number(Number::from(n)),
            Err(_) => Value::String(text.clone()),
        },
        DateRepr::Integer(n) => Value::Number(Number::from(*n)),
        DateRepr::Text(text) => Value::String(text.clone()),
        DateRepr::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        DateRepr::Instant(at) => Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

fn is_decimal_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// A date: epoch milliseconds on input, serialized according to how it is stored.
#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        parse_literal(&LiteralNode::from(&value)).ok_or_else(|| InputValueError::expected_type(value))
    }

    fn is_valid(value: &Value) -> bool {
        parse_literal(&LiteralNode::from(value)).is_some()
    }

    fn to_value(&self) -> Value {
        serialize(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_digit_string_becomes_integer() {
        assert_eq!(
            serialize(&DateRepr::Text("42".into())),
            Value::Number(42.into())
        );
    }

    #[test]
    fn test_serialize_integer_unchanged() {
        assert_eq!(serialize(&DateRepr::Integer(42)), Value::Number(42.into()));
    }

    #[test]
    fn test_serialize_fallbacks_unchanged() {
        assert_eq!(
            serialize(&DateRepr::Text("abc".into())),
            Value::String("abc".into())
        );
        assert_eq!(
            serialize(&DateRepr::Float(42.5)),
            Value::Number(Number::from_f64(42.5).unwrap())
        );
        // Mixed and empty text are not digit strings.
        assert_eq!(
            serialize(&DateRepr::Text("12a".into())),
            Value::String("12a".into())
        );
        assert_eq!(serialize(&DateRepr::Text(String::new())), Value::String(String::new()));
    }

    #[test]
    fn test_serialize_overflowing_digits_stay_text() {
        let huge = "99999999999999999999999".to_string();
        assert_eq!(serialize(&DateRepr::Text(huge.clone())), Value::String(huge));
    }

    #[test]
    fn test_serialize_instant_as_rfc3339() {
        let date = Date::from_millis(1000).unwrap();
        assert_eq!(
            serialize(date.repr()),
            Value::String("1970-01-01T00:00:01.000Z".into())
        );
    }

    #[test]
    fn test_parse_literal_integer_is_epoch_millis() {
        let date = parse_literal(&LiteralNode::Int("1000".into())).unwrap();
        assert_eq!(date.timestamp_millis(), Some(1000));
    }

    #[test]
    fn test_parse_literal_rejects_other_kinds() {
        assert_eq!(parse_literal(&LiteralNode::String("1000".into())), None);
        assert_eq!(parse_literal(&LiteralNode::Float("10.5".into())), None);
        assert_eq!(parse_literal(&LiteralNode::Boolean(true)), None);
        assert_eq!(parse_literal(&LiteralNode::Null), None);
        assert_eq!(parse_literal(&LiteralNode::Object), None);
        // Out of chrono's range.
        assert_eq!(parse_literal(&LiteralNode::Int(i64::MAX.to_string())), None);
    }

    #[test]
    fn test_parse_value_ignores_input() {
        let before = Utc::now().timestamp_millis();
        let date = parse_value(&Value::String("2019-01-01".into()));
        let millis = date.timestamp_millis().unwrap();
        assert!(millis >= before);
    }

    #[test]
    fn test_literal_node_from_value() {
        assert_eq!(
            LiteralNode::from(&Value::Number(7.into())),
            LiteralNode::Int("7".into())
        );
        assert_eq!(
            LiteralNode::from(&Value::Number(Number::from_f64(1.5).unwrap())),
            LiteralNode::Float("1.5".into())
        );
        assert_eq!(
            LiteralNode::from(&Value::String("x".into())),
            LiteralNode::String("x".into())
        );
    }

    #[test]
    fn test_scalar_type_uses_literal_rules() {
        let date = <Date as ScalarType>::parse(Value::Number(1000.into())).unwrap();
        assert_eq!(date.timestamp_millis(), Some(1000));
        assert!(<Date as ScalarType>::parse(Value::String("1000".into())).is_err());
        assert!(<Date as ScalarType>::is_valid(&Value::Number(5.into())));
        assert!(!<Date as ScalarType>::is_valid(&Value::String("5".into())));

        let stored = Date::from(DateRepr::Text("1546300800000".into()));
        assert_eq!(stored.to_value(), Value::Number(1546300800000i64.into()));
    }
}
