use crate::error::{MapError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub offset: usize,
    pub width: usize,
}

/// Fixed-width column layout derived from a listing's divider row.
///
/// Columns are separated by exactly one character, so each column starts at
/// `previous.offset + previous.width + 1`. All offsets and widths count
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl ColumnLayout {
    /// Derive column widths from a divider row such as `"---- ----- --- "`.
    ///
    /// The divider is split on single spaces and the trailing token is
    /// dropped, so a divider without a trailing space loses its last column.
    pub fn from_divider(divider: &str) -> Result<Self> {
        let mut tokens: Vec<&str> = divider.split(' ').collect();
        tokens.pop();

        if tokens.is_empty() {
            return Err(MapError::Layout(format!(
                "divider row '{}' yields no columns",
                divider
            )));
        }

        let mut offset = 0;
        let columns = tokens
            .iter()
            .map(|token| {
                let width = token.chars().count();
                let column = Column {
                    name: String::new(),
                    offset,
                    width,
                };
                offset += width + 1;
                column
            })
            .collect();

        Ok(Self { columns })
    }

    /// Attach names sliced from the header row, with every space removed.
    pub fn with_header(mut self, header: &str) -> Self {
        for column in &mut self.columns {
            column.name = char_slice(header, column.offset, column.width).replace(' ', "");
        }
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn widths(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Slice a data row into one field per column.
    ///
    /// Double spaces are removed from every field; single spaces are kept,
    /// so a field can end up with a leading or trailing space. Rows shorter
    /// than the layout produce short or empty fields.
    pub fn slice_fields(&self, row: &str) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| char_slice(row, column.offset, column.width).replace("  ", ""))
            .collect()
    }
}

/// `&row[start..start + len]` in characters, clamped to the end of the row.
fn char_slice(row: &str, start: usize, len: usize) -> &str {
    let mut boundaries = row
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(row.len()));

    let begin = boundaries.nth(start).unwrap_or(row.len());
    let end = if len == 0 {
        begin
    } else {
        boundaries.nth(len - 1).unwrap_or(row.len())
    };

    &row[begin..end]
}
