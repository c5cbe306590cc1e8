//! A header row plus string rows.
//!
//! [`Table`] is the interchange shape between the HTML parsers, the CSV
//! store and the spreadsheet sink. Rows are always exactly as wide as the
//! header row.

use std::collections::BTreeSet;

/// Errors raised when a table operation names a column that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The requested column is not in the header row.
    #[error("missing column: {name}")]
    MissingColumn {
        /// Header text that was looked up.
        name: String,
    },
}

/// Ordered headers with rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given headers.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Returns the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of a column by header text.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`Table::column`] but fails when the column is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if no header matches `name`.
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column(name).ok_or_else(|| TableError::MissingColumn {
            name: name.to_owned(),
        })
    }

    /// Appends a row, padding with empty cells or truncating so it matches
    /// the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Returns the cell at `row` under the header `name`.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Appends a column whose cells are computed from each existing row.
    pub fn add_column(&mut self, name: &str, mut cell: impl FnMut(&[String]) -> String) {
        self.headers.push(name.to_owned());
        for row in &mut self.rows {
            let value = cell(row);
            row.push(value);
        }
    }

    /// Rewrites every cell of one column in place.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if the column does not exist.
    pub fn map_column(
        &mut self,
        name: &str,
        mut f: impl FnMut(&str) -> String,
    ) -> Result<(), TableError> {
        let col = self.require_column(name)?;
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
        Ok(())
    }

    /// Keeps only the rows for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&[String]) -> bool) {
        self.rows.retain(|row| keep(row));
    }

    /// Stable sort by the given columns, compared as strings in order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if any column does not exist.
    pub fn sort_by_columns(&mut self, names: &[&str]) -> Result<(), TableError> {
        let cols = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>, _>>()?;
        self.rows.sort_by(|a, b| {
            cols.iter()
                .map(|&c| a[c].cmp(&b[c]))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }

    /// Removes rows whose value in `name` was already seen, keeping the
    /// first occurrence. Returns the number of rows dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if the column does not exist.
    pub fn dedup_by_column(&mut self, name: &str) -> Result<usize, TableError> {
        let col = self.require_column(name)?;
        let before = self.rows.len();
        let mut seen = BTreeSet::new();
        self.rows.retain(|row| seen.insert(row[col].clone()));
        Ok(before - self.rows.len())
    }

    /// Returns the header row followed by the data rows.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}
