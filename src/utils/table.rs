//! Table rendering utilities for CLI outputs.

use crate::utils::colors::visible_width;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Right,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    separator: char,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            separator: '-',
        }
    }

    /// Character used for the rule under the header (from the config).
    pub fn with_separator(mut self, sep: &str) -> Self {
        self.separator = sep.chars().next().unwrap_or('-');
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn add_rule(&mut self) {
        self.rows.push(Vec::new());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| visible_width(&c.header))
            .collect();

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        let rule: String = std::iter::repeat_n(self.separator, total).collect();

        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        out.push_str(&self.render_row(&header, &widths));
        out.push_str(&rule);
        out.push('\n');

        for row in &self.rows {
            if row.is_empty() {
                out.push_str(&rule);
                out.push('\n');
            } else {
                out.push_str(&self.render_row(row, &widths));
            }
        }

        out
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let mut cells = Vec::with_capacity(self.columns.len());
        for (i, col) in self.columns.iter().enumerate() {
            let value = row.get(i).map(String::as_str).unwrap_or("");
            let pad = widths[i].saturating_sub(visible_width(value));
            let cell = match col.align {
                Align::Left => format!("{}{}", value, " ".repeat(pad)),
                Align::Right => format!("{}{}", " ".repeat(pad), value),
            };
            cells.push(cell);
        }
        let mut line = cells.join("  ").trim_end().to_string();
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_aligns_columns() {
        let mut t = Table::new(vec![Column::left("Name"), Column::right("Hours")]);
        t.add_row(vec!["Alice".into(), "7.5".into()]);
        t.add_row(vec!["Bob".into(), "12".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Name   Hours");
        assert_eq!(lines[1], "------------");
        assert_eq!(lines[2], "Alice    7.5");
        assert_eq!(lines[3], "Bob       12");
    }
}
