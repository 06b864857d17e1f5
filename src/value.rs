//! Row values and per-cell overrides

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::style::Alignment;
use crate::table::Table;

/// Shared handle to a table rendered inside another table's cell.
///
/// The same child may be placed in several cells; rendering never mutates it.
pub type TableRef = Rc<Table>;

/// A dynamically-typed cell value
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Number(f64),
    Flag(bool),
    Nested(TableRef),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Flag(b) => write!(f, "{b}"),
            Value::Nested(_) => Ok(()),
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<TableRef> for Value {
    fn from(table: TableRef) -> Self {
        Value::Nested(table)
    }
}

/// One row of data keyed by column key, plus per-cell overrides
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, Value>,
    align: HashMap<String, Alignment>,
    row_spans: HashMap<String, usize>,
    col_spans: HashMap<String, usize>,
    nested: HashMap<String, TableRef>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a column
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Override alignment for one cell
    pub fn with_align<K: Into<String>>(mut self, key: K, align: Alignment) -> Self {
        self.align.insert(key.into(), align);
        self
    }

    /// Let one cell span `span` rows
    pub fn with_row_span<K: Into<String>>(mut self, key: K, span: usize) -> Self {
        self.row_spans.insert(key.into(), span);
        self
    }

    /// Let one cell span `span` columns
    pub fn with_col_span<K: Into<String>>(mut self, key: K, span: usize) -> Self {
        self.col_spans.insert(key.into(), span);
        self
    }

    /// Render a table inside one cell
    pub fn with_nested<K: Into<String>>(mut self, key: K, table: TableRef) -> Self {
        self.nested.insert(key.into(), table);
        self
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Textual form of a cell; absent values render as an empty string
    pub fn text(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn align(&self, key: &str) -> Option<Alignment> {
        self.align.get(key).copied()
    }

    /// Row span for a cell; zero counts as unset
    pub fn row_span(&self, key: &str) -> Option<usize> {
        self.row_spans.get(key).copied().filter(|&span| span > 0)
    }

    /// Column span for a cell; zero counts as unset
    pub fn col_span(&self, key: &str) -> Option<usize> {
        self.col_spans.get(key).copied().filter(|&span| span > 0)
    }

    /// Nested table for a cell, from the override map or a nested value
    pub fn nested(&self, key: &str) -> Option<&TableRef> {
        self.nested.get(key).or_else(|| match self.values.get(key) {
            Some(Value::Nested(table)) => Some(table),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_text_fallback() {
        let row = Row::new()
            .with("name", "Widget")
            .with("qty", 3)
            .with("price", 12.5)
            .with("taxable", true);

        assert_eq!(row.text("name"), "Widget");
        assert_eq!(row.text("qty"), "3");
        assert_eq!(row.text("price"), "12.5");
        assert_eq!(row.text("taxable"), "true");
        assert_eq!(row.text("missing"), "");
    }

    #[test]
    fn test_zero_spans_are_unset() {
        let row = Row::new()
            .with_row_span("a", 0)
            .with_col_span("b", 0)
            .with_row_span("c", 3);

        assert_eq!(row.row_span("a"), None);
        assert_eq!(row.col_span("b"), None);
        assert_eq!(row.row_span("c"), Some(3));
    }

    #[test]
    fn test_alignment_override_lookup() {
        let row = Row::new().with_align("amount", Alignment::Right);
        assert_eq!(row.align("amount"), Some(Alignment::Right));
        assert_eq!(row.align("other"), None);
    }
}
