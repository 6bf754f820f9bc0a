use crate::{
    foundation::{
        core::{AspectRatio, JobId, SlideSeconds},
        error::{ReelError, ReelResult},
    },
    slides::{
        row::{MAX_ROWS, RowTable},
        theme::{Background, Theme},
    },
};

/// How incomplete rows among the selected ones are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Reject the whole selection if any selected row is incomplete.
    #[default]
    AllOrNothing,
    /// Drop incomplete rows and build jobs for the rest.
    SkipIncomplete,
}

/// Fully resolved instruction for producing one slide video.
///
/// Only [`build_job_specs`] creates these, so every spec comes from a complete row.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct JobSpec {
    id: JobId,
    source_row: usize,
    title: String,
    content: String,
    #[serde(rename = "duration_secs")]
    duration: SlideSeconds,
    aspect_ratio: AspectRatio,
    background: Background,
}

impl JobSpec {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Index of the table row this job was built from.
    pub fn source_row(&self) -> usize {
        self.source_row
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn duration(&self) -> SlideSeconds {
        self.duration
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn background(&self) -> &Background {
        &self.background
    }
}

/// Non-empty, ordered list of job specs sharing one theme.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct JobPlan {
    specs: Vec<JobSpec>,
}

impl JobPlan {
    pub fn specs(&self) -> &[JobSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn into_specs(self) -> Vec<JobSpec> {
        self.specs
    }
}

impl<'a> IntoIterator for &'a JobPlan {
    type Item = &'a JobSpec;
    type IntoIter = std::slice::Iter<'a, JobSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

/// Turn the first `count` rows of `rows` into job specs over `theme`.
///
/// With [`RowPolicy::AllOrNothing`] any incomplete row among the first `count` rejects the whole
/// selection with [`ReelError::IncompleteInput`] and no spec is produced.
#[tracing::instrument(skip(rows, theme), fields(aspect = %theme.aspect_ratio))]
pub fn build_job_specs(
    rows: &RowTable,
    count: usize,
    theme: &Theme,
    policy: RowPolicy,
) -> ReelResult<JobPlan> {
    if !(1..=MAX_ROWS).contains(&count) {
        return Err(ReelError::validation(format!(
            "row count must be within 1..={MAX_ROWS}, got {count}"
        )));
    }

    let selected = &rows.rows()[..count];
    let valid = selected.iter().filter(|r| r.is_complete()).count();

    let incomplete = match policy {
        RowPolicy::AllOrNothing => valid < count,
        RowPolicy::SkipIncomplete => valid == 0,
    };
    if incomplete {
        tracing::debug!(requested = count, valid, "rejecting incomplete selection");
        return Err(ReelError::IncompleteInput {
            requested: count,
            valid,
        });
    }

    let specs: Vec<JobSpec> = selected
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_complete())
        .enumerate()
        .map(|(ordinal, (source_row, row))| JobSpec {
            id: JobId(ordinal),
            source_row,
            title: row.title.trim().to_owned(),
            content: row.content.trim().to_owned(),
            duration: row.duration,
            aspect_ratio: theme.aspect_ratio,
            background: theme.background.clone(),
        })
        .collect();

    if specs.len() < count {
        tracing::info!(
            requested = count,
            kept = specs.len(),
            "skipped incomplete rows"
        );
    }

    Ok(JobPlan { specs })
}

#[cfg(test)]
#[path = "../../tests/unit/batch/spec.rs"]
mod tests;
