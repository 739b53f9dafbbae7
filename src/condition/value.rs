use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while turning raw user input into named parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("Expected NAME=VALUE, got \"{0}\"")]
    MissingSeparator(String),

    #[error("Parameter name is empty in \"{0}\"")]
    EmptyName(String),

    #[error("Invalid date \"{0}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate(String),
}

/// A scalar bound to a named placeholder at execution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl ParamValue {
    /// Interpret a CLI literal: booleans first, then integers, then reals,
    /// anything else stays text.
    pub fn parse_literal(s: &str) -> Self {
        if s.eq_ignore_ascii_case("true") {
            return ParamValue::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return ParamValue::Bool(false);
        }
        if let Ok(i) = s.parse::<i64>() {
            return ParamValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return ParamValue::Real(f);
            }
        }
        ParamValue::Text(s.to_string())
    }

    /// Parse a calendar date in compact `YYYYMMDD` or ISO `YYYY-MM-DD` form.
    pub fn parse_date(s: &str) -> Result<Self, ParamError> {
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map(ParamValue::Date)
            .map_err(|_| ParamError::InvalidDate(s.to_string()))
    }

    /// Text form used when the store has no native type for the value.
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Real(f) => f.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Integer(i64::from(i))
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Integer(i)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Real(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(d: NaiveDate) -> Self {
        ParamValue::Date(d)
    }
}

/// Split a `NAME=VALUE` argument. Only the first `=` separates; the value may
/// contain further `=` characters. Whitespace around both halves is dropped.
pub fn split_assignment(raw: &str) -> Result<(&str, &str), ParamError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ParamError::MissingSeparator(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParamError::EmptyName(raw.to_string()));
    }
    Ok((name, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_kinds() {
        assert_eq!(ParamValue::parse_literal("TRUE"), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse_literal("42"), ParamValue::Integer(42));
        assert_eq!(ParamValue::parse_literal("-1.5"), ParamValue::Real(-1.5));
        assert_eq!(
            ParamValue::parse_literal("ACTIVE"),
            ParamValue::Text("ACTIVE".to_string())
        );
        // "NaN" parses as f64 but is kept as text
        assert_eq!(
            ParamValue::parse_literal("NaN"),
            ParamValue::Text("NaN".to_string())
        );
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = ParamValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(ParamValue::parse_date("20240309").unwrap(), expected);
        assert_eq!(ParamValue::parse_date("2024-03-09").unwrap(), expected);
        assert_eq!(
            ParamValue::parse_date("2024/03/09"),
            Err(ParamError::InvalidDate("2024/03/09".to_string()))
        );
        assert_eq!(expected.to_text(), "2024-03-09");
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("status=ACTIVE").unwrap(), ("status", "ACTIVE"));
        assert_eq!(split_assignment("expr=a=b").unwrap(), ("expr", "a=b"));
        assert_eq!(split_assignment("flag=").unwrap(), ("flag", ""));
        assert_eq!(split_assignment(" age = 45 ").unwrap(), ("age", "45"));
        assert!(matches!(
            split_assignment("status"),
            Err(ParamError::MissingSeparator(_))
        ));
        assert!(matches!(
            split_assignment(" =x"),
            Err(ParamError::EmptyName(_))
        ));
    }

    #[test]
    fn test_serializes_as_plain_scalar() {
        let json = serde_json::to_string(&vec![
            ParamValue::from("EU"),
            ParamValue::from(7),
            ParamValue::from(true),
            ParamValue::Date(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()),
        ])
        .unwrap();
        assert_eq!(json, r#"["EU",7,true,"2023-01-02"]"#);
    }
}
