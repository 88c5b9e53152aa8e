/// Results Grid Module for sqlcmd
///
/// Renders table headers and rows as a fixed-width text table for the console.

use crate::data_set::DataSet;

/// Text shown for unset values
const NULL_TEXT: &str = "NULL";

/// Represents the entire grid structure.
#[derive(Debug, Clone, Default)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// Creates a new, empty ResultsGrid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the headers for the grid.
    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    /// Adds a data set as a row, unset values shown as NULL.
    pub fn add_row(&mut self, row: &DataSet) {
        self.rows.push(
            row.values()
                .map(|v| v.unwrap_or(NULL_TEXT).to_string())
                .collect(),
        );
    }

    /// Number of columns: the widest of the header and every row
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    /// Renders the grid with a border line above and below the header and
    /// after the last row. Rows shorter than the grid are padded with blanks.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        if widths.is_empty() {
            return String::new();
        }

        let border = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );
        let line = |cells: &[String]| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    format!(" {}{} ", cell, " ".repeat(w - cell.chars().count()))
                })
                .collect();
            format!("|{}|", padded.join("|"))
        };

        let mut out = vec![border.clone()];
        if !self.headers.is_empty() {
            out.push(line(&self.headers[..]));
            out.push(border.clone());
        }
        for row in &self.rows {
            out.push(line(&row[..]));
        }
        if !self.rows.is_empty() {
            out.push(border);
        }
        out.join("\n")
    }
}
