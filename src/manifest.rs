use std::path::Path;

use anyhow::Context as _;

use crate::{
    batch::spec::{JobPlan, RowPolicy, build_job_specs},
    foundation::{
        core::AspectRatio,
        error::{ReelError, ReelResult},
    },
    slides::{
        color::ColorSpec,
        row::{ContentRow, MAX_ROWS, RowTable},
        theme::{Background, ImageSpec, Theme},
    },
};

/// A batch described as JSON: rows, how many of them to render, the theme and the row policy.
///
/// ```json
/// {
///   "count": 2,
///   "policy": "all_or_nothing",
///   "theme": { "aspect_ratio": "16:9", "background": { "color": "#60a5fa" } },
///   "rows": [ { "title": "Intro", "content": "Welcome", "duration_secs": 30 } ]
/// }
/// ```
///
/// `background` is either `{ "color": "<hex>" }` or `{ "image": "<path or data URL>" }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchManifest {
    pub rows: RowTable,
    pub count: usize,
    pub policy: RowPolicy,
    pub theme: Theme,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    policy: RowPolicy,
    #[serde(default)]
    theme: ThemeFile,
    rows: Vec<ContentRow>,
}

#[derive(Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeFile {
    #[serde(default)]
    aspect_ratio: AspectRatio,
    #[serde(default)]
    background: BackgroundFile,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum BackgroundFile {
    Color(ColorSpec),
    Image(String),
}

impl Default for BackgroundFile {
    fn default() -> Self {
        BackgroundFile::Color(ColorSpec::default())
    }
}

impl BatchManifest {
    /// Read a manifest file. Relative image paths resolve against its directory.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open manifest '{}'", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&text, base)
    }

    /// Parse manifest JSON, resolving relative image paths against `base_dir`.
    pub fn from_json(json: &str, base_dir: &Path) -> ReelResult<Self> {
        let file: ManifestFile =
            serde_json::from_str(json).map_err(|e| ReelError::serde(e.to_string()))?;

        if file.rows.len() > MAX_ROWS {
            return Err(ReelError::validation(format!(
                "manifest lists {} rows; at most {MAX_ROWS} are supported",
                file.rows.len()
            )));
        }
        let count = file.count.unwrap_or(file.rows.len());
        let rows = RowTable::from_rows(file.rows)?;

        let background = match file.theme.background {
            BackgroundFile::Color(color) => Background::Color(color),
            BackgroundFile::Image(src) => Background::Image(resolve_image(&src, base_dir)?),
        };

        Ok(Self {
            rows,
            count,
            policy: file.policy,
            theme: Theme::new(file.theme.aspect_ratio, background),
        })
    }

    /// Replace the number of rows to render.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Validate the selection and build its job specs.
    pub fn plan(&self) -> ReelResult<JobPlan> {
        build_job_specs(&self.rows, self.count, &self.theme, self.policy)
    }
}

fn resolve_image(src: &str, base_dir: &Path) -> ReelResult<ImageSpec> {
    if src.trim_start().starts_with("data:") {
        return ImageSpec::from_data_url(src);
    }
    let path = Path::new(src);
    if path.is_absolute() {
        ImageSpec::from_path(path)
    } else {
        ImageSpec::from_path(&base_dir.join(path))
    }
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
