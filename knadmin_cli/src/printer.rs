use std::io::Write;

use super::Result;

/// Left aligned columns separated by three spaces
///
/// Every column but the last is padded to its widest cell.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    no_headers: bool,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_uppercase()).collect(),
            ..Default::default()
        }
    }

    /// Suppress the header line (`--no-headers`)
    pub fn no_headers(mut self, no_headers: bool) -> Self {
        self.no_headers = no_headers;
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = if self.no_headers {
            vec![]
        } else {
            self.headers.iter().map(|h| h.chars().count()).collect()
        };
        for r in &self.rows {
            for (i, cell) in r.iter().enumerate() {
                let len = cell.chars().count();
                if i >= widths.len() {
                    widths.push(len);
                } else if len > widths[i] {
                    widths[i] = len;
                }
            }
        }
        widths
    }

    fn write_line(w: &mut impl Write, cells: &[String], widths: &[usize]) -> Result<()> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i + 1 == cells.len() {
                line.push_str(cell);
            } else {
                let pad = widths[i] - cell.chars().count();
                line.push_str(cell);
                line.push_str(&" ".repeat(pad + 3));
            }
        }
        writeln!(w, "{}", line.trim_end())?;
        Ok(())
    }

    pub fn print(&self, w: &mut impl Write) -> Result<()> {
        let widths = self.widths();
        if !self.no_headers {
            Self::write_line(w, &self.headers, &widths)?;
        }
        for r in &self.rows {
            Self::write_line(w, r, &widths)?;
        }
        Ok(())
    }
}
