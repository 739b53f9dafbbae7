use rusqlite::types::{ToSql, ToSqlOutput};

use crate::condition::{ParamValue, QueryParams};

impl ToSql for ParamValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ParamValue::Text(s) => ToSqlOutput::from(s.as_str()),
            ParamValue::Integer(i) => ToSqlOutput::from(*i),
            ParamValue::Real(f) => ToSqlOutput::from(*f),
            ParamValue::Bool(b) => ToSqlOutput::from(*b),
            // ISO text sorts and compares correctly in SQLite
            ParamValue::Date(_) => ToSqlOutput::from(self.to_text()),
        })
    }
}

/// Placeholder names (`:key`) paired with their values, in insertion order.
pub fn named_placeholders(params: &QueryParams) -> Vec<(String, &ParamValue)> {
    params
        .iter()
        .map(|(key, value)| (format!(":{key}"), value))
        .collect()
}
