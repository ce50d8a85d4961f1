//! Wire types for the stats.nba.com endpoints.
//! Every endpoint answers with one or more tables: a header row plus a
//! `rowSet` of positional values. `Row` gives keyed access into one of them.
use crate::client::{ApiError, ApiResult};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub result_sets: Vec<ResultSet>,
    /// `leagueleaders` returns a single table under `resultSet` instead.
    pub result_set: Option<ResultSet>,
}

impl StatsResponse {
    /// The first table of the response, wherever the endpoint put it.
    pub fn primary(&self) -> ApiResult<&ResultSet> {
        self.result_sets
            .first()
            .or(self.result_set.as_ref())
            .ok_or_else(|| ApiError::Schema("response carried no result sets".into()))
    }

    /// The table called `name`, for endpoints that answer with several.
    pub fn table(&self, name: &str) -> ApiResult<&ResultSet> {
        self.result_sets
            .iter()
            .chain(self.result_set.as_ref())
            .find(|set| set.name == name)
            .ok_or_else(|| ApiError::Schema(format!("response has no {name} table")))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.row_set.iter().map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    /// Every row as an object keyed by the table headers, in header order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows().map(|row| row.to_record()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
    }

    /// Whether the table has this column at all (its value may still be null).
    pub fn has(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn i64(&self, column: &str) -> ApiResult<i64> {
        let value = self.require(column)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| ApiError::Schema(format!("column {column} is not an integer: {value}")))
    }

    pub fn f64(&self, column: &str) -> ApiResult<f64> {
        let value = self.require(column)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| ApiError::Schema(format!("column {column} is not a number: {value}")))
    }

    /// Like `i64`, but a missing or unreadable cell gives `default`.
    pub fn i64_or(&self, column: &str, default: i64) -> i64 {
        self.i64(column).unwrap_or(default)
    }

    pub fn f64_or(&self, column: &str, default: f64) -> f64 {
        self.f64(column).unwrap_or(default)
    }

    pub fn string(&self, column: &str) -> ApiResult<String> {
        self.require(column).map(value_to_string)
    }

    /// String value of `column`, or `default` when the column doesn't exist.
    /// A present-but-null cell renders as an empty string.
    pub fn string_or(&self, column: &str, default: &str) -> String {
        self.get(column)
            .map(value_to_string)
            .unwrap_or_else(|| default.to_owned())
    }

    /// Raw value of `column`, or `default` when the column doesn't exist.
    pub fn value_or(&self, column: &str, default: Value) -> Value {
        self.get(column).cloned().unwrap_or(default)
    }

    pub fn to_record(&self) -> Map<String, Value> {
        self.headers
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    fn require(&self, column: &str) -> ApiResult<&'a Value> {
        match self.get(column) {
            Some(Value::Null) | None => {
                Err(ApiError::Schema(format!("missing value for column {column}")))
            }
            Some(v) => Ok(v),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
