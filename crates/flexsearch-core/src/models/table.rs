use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written in place of every missing cell
pub const MISSING_VALUE: &str = "none";

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// The sentinel value used for missing cells
    pub fn missing() -> Self {
        Value::Text(MISSING_VALUE.to_string())
    }

    /// Infer a typed value from raw cell text.
    ///
    /// Inference is lossless: a number is only produced when its canonical
    /// rendering is exactly the source text, so `"007"` or `"1.50"` stay text.
    pub fn infer(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            if i.to_string() == raw {
                return Value::Integer(i);
            }
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() && f.to_string() == raw {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Borrow the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is the missing-value sentinel
    pub fn is_missing(&self) -> bool {
        self.as_text() == Some(MISSING_VALUE)
    }

    /// Convert to a JSON value for document storage
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Convert a stored JSON value back into a cell value
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::missing(),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Schema-less row: column name to cell value, in column order
pub type Row = IndexMap<String, Value>;

/// In-memory table with a header-derived column list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in header order
    pub columns: Vec<String>,

    /// Rows in file order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Append a row, filling absent columns with the missing sentinel and
    /// dropping keys that are not columns of this table
    pub fn push_row(&mut self, mut row: Row) {
        let aligned: Row = self
            .columns
            .iter()
            .map(|c| (c.clone(), row.shift_remove(c).unwrap_or_else(Value::missing)))
            .collect();
        self.rows.push(aligned);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// First `n` rows, for previews
    pub fn head(&self, n: usize) -> Table {
        Table { columns: self.columns.clone(), rows: self.rows.iter().take(n).cloned().collect() }
    }

    /// Restrict the table to the given columns, in the given order
    pub fn select(&self, columns: &[String]) -> Table {
        let mut selected = Table::new(columns.to_vec());
        for row in &self.rows {
            selected.push_row(row.clone());
        }
        selected
    }

    /// Iterate the rows as string cells in column order
    pub fn string_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_else(|| MISSING_VALUE.to_string()))
                .collect()
        })
    }
}
