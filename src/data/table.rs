// Column-oriented table — the in-memory form of the raw and clean
// artifacts.
//
// Columns are stored as an ordered list so the clean schema's column
// order survives a round-trip; that order is the canonical tie-break
// order for minimal-std selection. A numeric cell may be missing
// (None), which every statistic here skips rather than poisons.

use serde::{Deserialize, Serialize};

/// The values of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// A column together with its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedColumn {
    pub name: String,
    #[serde(flatten)]
    pub data: Column,
}

/// An ordered collection of named columns, all the same length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<NamedColumn>,
}

impl Table {
    pub fn new(columns: Vec<NamedColumn>) -> Self {
        Table { columns }
    }

    /// Number of rows (length of the first column; 0 for an empty table).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// The numeric values of a column, if it exists and is numeric.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of numeric columns, in schema order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.data.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Collect the present (non-missing) numeric values of `name` at the
    /// given row indices. Returns None when the column is absent or not
    /// numeric; out-of-range indices are skipped.
    pub fn masked_numeric(&self, name: &str, mask: &[usize]) -> Option<Vec<f64>> {
        let values = self.numeric(name)?;
        Some(
            mask.iter()
                .filter_map(|&i| values.get(i).copied().flatten())
                .collect(),
        )
    }

    /// Mean of a column's present values over the given row indices.
    /// None when the column is absent, non-numeric, or has no present
    /// values in the mask.
    pub fn masked_mean(&self, name: &str, mask: &[usize]) -> Option<f64> {
        let values = self.masked_numeric(name, mask)?;
        if values.is_empty() {
            return None;
        }
        Some(crate::stats::mean(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            NamedColumn {
                name: "a".to_string(),
                data: Column::Numeric(vec![Some(1.0), Some(2.0), None]),
            },
            NamedColumn {
                name: "b".to_string(),
                data: Column::Text(vec![Some("x".to_string()), None, Some("y".to_string())]),
            },
        ])
    }

    #[test]
    fn test_shape() {
        let t = sample();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_cols(), 2);
        assert_eq!(t.numeric_column_names(), vec!["a"]);
    }

    #[test]
    fn test_masked_numeric_skips_missing() {
        let t = sample();
        assert_eq!(t.masked_numeric("a", &[0, 1, 2]).unwrap(), vec![1.0, 2.0]);
        assert!(t.masked_numeric("b", &[0]).is_none());
    }

    #[test]
    fn test_masked_mean() {
        let t = sample();
        assert_eq!(t.masked_mean("a", &[0, 1]).unwrap(), 1.5);
        // All values in the mask are missing
        assert!(t.masked_mean("a", &[2]).is_none());
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        let names: Vec<&str> = back.column_names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
