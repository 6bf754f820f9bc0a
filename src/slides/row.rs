use crate::foundation::{
    core::SlideSeconds,
    error::{ReelError, ReelResult},
};

/// Number of rows an editor table holds.
pub const MAX_ROWS: usize = 10;

/// One slide as entered by the operator.
///
/// Rows are plain values: editing produces a new row and never reaches specs derived earlier.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "duration_secs", default)]
    pub duration: SlideSeconds,
}

impl ContentRow {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            duration: SlideSeconds::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_duration(mut self, duration: SlideSeconds) -> Self {
        self.duration = duration;
        self
    }

    /// Both title and content are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Fixed-capacity table of [`MAX_ROWS`] rows, empty rows included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowTable {
    rows: Vec<ContentRow>,
}

impl Default for RowTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RowTable {
    /// A table of empty rows.
    pub fn new() -> Self {
        Self {
            rows: vec![ContentRow::default(); MAX_ROWS],
        }
    }

    /// Fill the table from the top; remaining rows stay empty.
    pub fn from_rows(rows: impl IntoIterator<Item = ContentRow>) -> ReelResult<Self> {
        let mut table = Self::new();
        for (index, row) in rows.into_iter().enumerate() {
            table.set(index, row)?;
        }
        Ok(table)
    }

    pub fn set(&mut self, index: usize, row: ContentRow) -> ReelResult<()> {
        let slot = self.rows.get_mut(index).ok_or_else(|| {
            ReelError::validation(format!(
                "row index {index} is out of range (table holds {MAX_ROWS} rows)"
            ))
        })?;
        *slot = row;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ContentRow> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[ContentRow] {
        &self.rows
    }

    /// Number of complete rows in the whole table.
    pub fn complete_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_complete()).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slides/row.rs"]
mod tests;
