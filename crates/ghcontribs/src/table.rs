//! Bordered monospaced text grids.
//!
//! ```text
//! +------------+------------+-------+
//! | Repository | 2024-03-01 | Total |
//! +------------+------------+-------+
//! | org/repo1  |          4 |     4 |
//! | TOTAL      |          4 |     4 |
//! +------------+------------+-------+
//! ```

use unicode_width::UnicodeWidthStr;

/// Background color used by [`highlight_alternate_rows`].
pub const HIGHLIGHT_START: &str = "\x1b[30;48;5;227m";
pub const HIGHLIGHT_END: &str = "\x1b[m";

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A grid of text cells with one header row.
///
/// The first column is left-aligned and every other column right-aligned
/// unless overridden with [`TextTable::with_align`].
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Vec<Align>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = (0..headers.len())
            .map(|i| if i == 0 { Align::Left } else { Align::Right })
            .collect();
        Self {
            headers,
            rows: Vec::new(),
            align,
        }
    }

    /// Override the alignment of column `column`.
    pub fn with_align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Append a row. Short rows are padded with blank cells; extra cells are
    /// dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = {
            let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            format!("+{}+", segments.join("+"))
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(rule.clone());
        lines.push(self.render_row(&self.headers, &widths));
        lines.push(rule.clone());
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.push(rule);
        lines.join("\n")
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.align)
            .map(|((cell, &width), align)| {
                let fill = " ".repeat(width.saturating_sub(cell.width()));
                match align {
                    Align::Left => format!(" {cell}{fill} "),
                    Align::Right => format!(" {fill}{cell} "),
                }
            })
            .collect();
        format!("|{}|", padded.join("|"))
    }
}

/// Wrap every other data row of a rendered [`TextTable`] in a background
/// color, starting with the second data row. Border pipes stay uncolored.
pub fn highlight_alternate_rows(rendered: &str) -> String {
    let mut lines: Vec<String> = rendered.lines().map(str::to_string).collect();
    let last = lines.len().saturating_sub(1);
    for line in lines.iter_mut().take(last).skip(4).step_by(2) {
        if let Some(inner) = line.strip_prefix('|').and_then(|l| l.strip_suffix('|')) {
            *line = format!("|{HIGHLIGHT_START}{inner}{HIGHLIGHT_END}|");
        }
    }
    lines.join("\n")
}
