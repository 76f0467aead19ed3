//! Assembly of records into a rectangular table.

use docscrape_core::{Field, Record};

/// Records laid out under a fixed column order.
///
/// Columns follow [`Field::ALL`]; a column that no record uses is left out
/// entirely. A record without a value for a kept column gets an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Field>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let columns: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|field| records.iter().any(|r| r.contains(*field)))
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|field| record.get(*field).unwrap_or_default().to_owned())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    #[must_use]
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|f| f.header()).collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header plus rows, as the spreadsheet API expects them.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header().into_iter().map(str::to_owned).collect())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}
