//! In-memory model for delimited placement tables.
//!
//! A table is an ordered field schema shared by every row, plus the rows
//! themselves with values kept positionally. Parsing and serialization
//! preserve field order and row order exactly. Serialization emits CRLF
//! line terminators, byte-compatible with the files the packing pipeline
//! already produces; parsing accepts both LF and CRLF.

/// One delimited table, held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Field names, in file order.
    pub columns: Vec<String>,
    /// Data rows; each row's values positionally match `columns`.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses delimited text: the first line holds the field names, every
    /// following line one row.
    ///
    /// Blank lines are skipped. Input without a single non-blank line
    /// parses to a table with an empty schema.
    pub fn parse(input: &str) -> Self {
        let mut lines = input.lines().filter(|line| !line.is_empty());
        let columns = match lines.next() {
            Some(header) => split_fields(header),
            None => Vec::new(),
        };
        let rows = lines.map(split_fields).collect();
        Self { columns, rows }
    }

    /// Serializes the table back to delimited text, one CRLF terminator
    /// per line including the final row.
    pub fn to_delimited(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push_str("\r\n");
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push_str("\r\n");
        }
        out
    }

    /// Returns the position of a named field in the schema.
    ///
    /// Field names are matched exactly, like every other identifier in the
    /// pipeline.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}
