use crate::error::{Error, Result};
use crate::html::{HorizontalAlign, HtmlElement, HtmlTable, HtmlTableCell, HtmlTableRow};

/// Metadata for one listing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub align: HorizontalAlign,
}

impl Column {
    pub fn new(label: impl Into<String>, align: HorizontalAlign) -> Self {
        Self {
            label: label.into(),
            align,
        }
    }
}

/// Turns abstract rows into final markup.
pub trait RowFormatter {
    /// Set the column metadata. Clears any rows added so far.
    fn set_columns(&mut self, columns: Vec<Column>);

    /// Append a row of pre-rendered cell markup; its width must match the columns.
    fn add_row(&mut self, values: Vec<String>) -> Result<()>;

    fn row_count(&self) -> usize;

    fn to_markup(&self) -> String;
}

/// Formats rows as a bordered HTML table with a header row.
#[derive(Debug, Clone, Default)]
pub struct HtmlTableFormatter {
    columns: Vec<Column>,
    table: HtmlTable,
    border: u32,
}

impl HtmlTableFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }
}

impl RowFormatter for HtmlTableFormatter {
    fn set_columns(&mut self, columns: Vec<Column>) {
        let mut table = HtmlTable::new()
            .with_border(self.border)
            .with_cell_padding(2);
        table.set_header(
            columns
                .iter()
                .map(|c| HtmlTableCell::header(crate::encode::html(&c.label)).with_align(c.align))
                .collect(),
        );
        self.table = table;
        self.columns = columns;
    }

    fn add_row(&mut self, values: Vec<String>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::RowShape {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        let mut row = HtmlTableRow::new();
        for (value, column) in values.into_iter().zip(&self.columns) {
            row.add_cell(HtmlTableCell::new(value).with_align(column.align));
        }
        self.table.add_row(row);
        Ok(())
    }

    fn row_count(&self) -> usize {
        self.table.rows().len()
    }

    fn to_markup(&self) -> String {
        self.table.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> Vec<Column> {
        vec![
            Column::new("Name", HorizontalAlign::Left),
            Column::new("Size", HorizontalAlign::Right),
        ]
    }

    #[test]
    fn rows_follow_column_alignment() {
        let mut f = HtmlTableFormatter::new();
        f.set_columns(two_columns());
        f.add_row(vec!["a.txt".into(), "5".into()]).unwrap();
        assert_eq!(f.row_count(), 1);
        let html = f.to_markup();
        assert!(html.contains("<th align=\"left\">Name</th>"));
        assert!(html.contains("<td align=\"right\">5</td>"));
    }

    #[test]
    fn mismatched_row_is_rejected() {
        let mut f = HtmlTableFormatter::new();
        f.set_columns(two_columns());
        let err = f.add_row(vec!["only one".into()]).unwrap_err();
        assert!(matches!(
            err,
            Error::RowShape {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(f.row_count(), 0);
    }

    #[test]
    fn set_columns_resets_rows() {
        let mut f = HtmlTableFormatter::new().with_border(1);
        f.set_columns(two_columns());
        f.add_row(vec!["a".into(), "1".into()]).unwrap();
        f.set_columns(two_columns());
        assert_eq!(f.row_count(), 0);
        assert!(f.to_markup().starts_with("<table border=\"1\""));
    }
}
