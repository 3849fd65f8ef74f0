use crate::preprocessing::PreprocessingError;

/// A single named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Textual value of row `i`, used as a label key.
    ///
    /// Numeric values use their shortest round-trip representation, so
    /// `1.0` becomes `"1"`. Both zeros map to `"0"`.
    pub fn key(&self, i: usize) -> Option<String> {
        match self {
            Column::Numeric(v) => v.get(i).map(|x| (x + 0.0).to_string()),
            Column::Categorical(v) => v.get(i).cloned(),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Numeric(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Categorical(v)
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Categorical(v.into_iter().map(str::to_string).collect())
    }
}

/// Column-oriented table of labeled observations.
///
/// Columns keep their insertion order, which becomes the feature order of
/// the prepared matrices. All columns have the same number of rows.
///
/// # Example
/// ```
/// use logistic_trainer::dataset::{Column, Table};
///
/// let table = Table::new()
///     .with_column("x", vec![0.0, 1.0, 2.0, 3.0])?
///     .with_column("label", vec!["no", "no", "yes", "yes"])?;
/// assert_eq!(table.n_rows(), 4);
/// assert!(matches!(table.column("label"), Some(Column::Categorical(_))));
/// # Ok::<(), logistic_trainer::preprocessing::PreprocessingError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, replacing any existing column of the same name.
    ///
    /// # Errors
    /// [`PreprocessingError::RaggedColumn`] if the row count differs from the
    /// columns already present.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<(), PreprocessingError> {
        let name = name.into();
        let column = column.into();
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() && !self.is_single_column(&name) {
                return Err(PreprocessingError::RaggedColumn {
                    name,
                    expected: first.len(),
                    got: column.len(),
                });
            }
        }
        match self.position(&name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Builder form of [`Table::push_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<Self, PreprocessingError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    fn is_single_column(&self, name: &str) -> bool {
        self.names.len() == 1 && self.names[0] == name
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Column names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the table has no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Keeps only the named columns, in the given order.
    ///
    /// # Errors
    /// [`PreprocessingError::MissingColumn`] naming the first absent column.
    pub fn select(&self, names: &[&str]) -> Result<Table, PreprocessingError> {
        let mut out = Table::new();
        for &name in names {
            let column = self
                .column(name)
                .ok_or_else(|| PreprocessingError::MissingColumn(name.to_string()))?;
            out.push_column(name, column.clone())?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_column_rejected() {
        let err = Table::new()
            .with_column("a", vec![1.0, 2.0])
            .and_then(|t| t.with_column("b", vec![1.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            PreprocessingError::RaggedColumn { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn test_replace_column_keeps_position() {
        let table = Table::new()
            .with_column("a", vec![1.0])
            .unwrap()
            .with_column("b", vec![2.0])
            .unwrap()
            .with_column("a", vec![3.0])
            .unwrap();
        assert_eq!(table.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.column("a"), Some(&Column::Numeric(vec![3.0])));
    }

    #[test]
    fn test_select_reorders_and_reports_missing() {
        let table = Table::new()
            .with_column("a", vec![1.0])
            .unwrap()
            .with_column("b", vec!["x"])
            .unwrap();
        let selected = table.select(&["b", "a"]).unwrap();
        assert_eq!(selected.names(), &["b".to_string(), "a".to_string()]);

        let err = table.select(&["c"]).unwrap_err();
        assert!(matches!(err, PreprocessingError::MissingColumn(name) if name == "c"));
    }

    #[test]
    fn test_numeric_key_formatting() {
        let col = Column::Numeric(vec![1.0, 0.5]);
        assert_eq!(col.key(0).as_deref(), Some("1"));
        assert_eq!(col.key(1).as_deref(), Some("0.5"));
        assert_eq!(col.key(2), None);
        assert_eq!(Column::Numeric(vec![-0.0]).key(0).as_deref(), Some("0"));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.n_columns(), 0);
    }
}
