//! Slidereel renders batches of short title/body slides into MP4 clips.
//!
//! Up to ten content rows share one [`Theme`] (aspect ratio plus a color or image background).
//! A batch turns the first N rows into [`JobSpec`]s and runs them strictly one after another
//! through an [`EncodeEngine`]:
//!
//! - Validate the selection with [`build_job_specs`]
//! - Open a batch with [`Orchestrator::start`] (or [`Orchestrator::submit`])
//! - Iterate the returned [`BatchRun`] to receive each [`JobOutcome`] as it is recorded
//!
//! A job failure never aborts its batch, and starting a new batch supersedes the previous one.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod batch;
pub(crate) mod engine;
pub(crate) mod manifest;
pub(crate) mod slides;

pub use crate::foundation::core::{AspectRatio, BatchId, Canvas, JobId, SlideSeconds};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::batch::orchestrator::{BatchRun, BatchSummary, Orchestrator};
pub use crate::batch::outcome::{Artifact, ArtifactHandle, JobOutcome};
pub use crate::batch::spec::{JobPlan, JobSpec, RowPolicy, build_job_specs};
pub use crate::batch::store::ResultStore;
pub use crate::engine::adapter::{EncodeEngine, EncodeError};
pub use crate::engine::ffmpeg::{FfmpegEngine, FfmpegEngineOpts, is_ffmpeg_on_path};
pub use crate::engine::memory::InMemoryEngine;
pub use crate::manifest::BatchManifest;
pub use crate::slides::color::ColorSpec;
pub use crate::slides::row::{ContentRow, MAX_ROWS, RowTable};
pub use crate::slides::theme::{Background, ImageSpec, Theme};
