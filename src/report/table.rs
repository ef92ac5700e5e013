//! Box-drawn text tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A fixed set of columns and any number of rows
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<'a>(headers: impl IntoIterator<Item = (&'a str, Align)>) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|(title, align)| (title.to_string(), align))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty and extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut cells = cells;
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(column, (title, _))| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[column]))
                    .chain(std::iter::once(display_width(title)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> Vec<String> {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 4);

        lines.push(border(&widths, '┌', '┬', '┐'));
        let header: Vec<&str> = self.headers.iter().map(|(t, _)| t.as_str()).collect();
        lines.push(self.line(&widths, &header, true));
        lines.push(border(&widths, '├', '┼', '┤'));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.line(&widths, &cells, false));
        }
        lines.push(border(&widths, '└', '┴', '┘'));

        lines
    }

    fn line(&self, widths: &[usize], cells: &[&str], header: bool) -> String {
        let mut out = String::from("│");
        for ((cell, width), (_, align)) in cells.iter().zip(widths).zip(&self.headers) {
            let align = if header { Align::Left } else { *align };
            out.push(' ');
            out.push_str(&pad(cell, *width, align));
            out.push_str(" │");
        }
        out
    }
}

fn border(widths: &[usize], left: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&join.to_string()))
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(cell)));
    match align {
        Align::Left => format!("{cell}{fill}"),
        Align::Right => format!("{fill}{cell}"),
    }
}

/// Width in terminal columns, counting one per character.
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new([("name", Align::Left), ("value", Align::Right)]);
        table.push_row(vec!["a".into(), "1".into()]);
        table.push_row(vec!["longer".into(), "12345".into()]);

        let lines = table.render();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "┌────────┬───────┐");
        assert_eq!(lines[1], "│ name   │ value │");
        assert_eq!(lines[2], "├────────┼───────┤");
        assert_eq!(lines[3], "│ a      │     1 │");
        assert_eq!(lines[4], "│ longer │ 12345 │");
        assert_eq!(lines[5], "└────────┴───────┘");
    }

    #[test]
    fn test_empty_table_has_header_and_footer() {
        let table = Table::new([("only", Align::Left)]);
        let lines = table.render();
        assert_eq!(lines.len(), 4);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new([("a", Align::Left), ("b", Align::Left)]);
        table.push_row(vec!["x".into()]);
        assert_eq!(table.render()[3], "│ x │   │");
    }
}
