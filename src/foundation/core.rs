use crate::foundation::error::{ReelError, ReelResult};

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Supported slide aspect ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// Landscape.
    #[default]
    #[serde(rename = "16:9")]
    Landscape16x9,
    /// Portrait.
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "1:1")]
    Square1x1,
    #[serde(rename = "4:3")]
    Classic4x3,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait9x16,
        AspectRatio::Square1x1,
        AspectRatio::Classic4x3,
    ];

    /// Canvas the engines render at. Both sides are even (yuv420p output).
    pub fn canvas(self) -> Canvas {
        let (width, height) = match self {
            AspectRatio::Landscape16x9 => (1280, 720),
            AspectRatio::Portrait9x16 => (720, 1280),
            AspectRatio::Square1x1 => (1080, 1080),
            AspectRatio::Classic4x3 => (960, 720),
        };
        Canvas { width, height }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Square1x1 => "1:1",
            AspectRatio::Classic4x3 => "4:3",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        let s = s.trim();
        AspectRatio::ALL
            .into_iter()
            .find(|ar| ar.as_str() == s)
            .ok_or_else(|| {
                ReelError::validation(format!(
                    "unknown aspect ratio \"{s}\" (expected one of 16:9, 9:16, 1:1, 4:3)"
                ))
            })
    }
}

/// Per-slide duration in whole seconds, bounded to `MIN..=MAX`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlideSeconds(u32);

impl SlideSeconds {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 120;
    pub const DEFAULT: u32 = 30;

    pub fn new(secs: u32) -> ReelResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&secs) {
            return Err(ReelError::validation(format!(
                "slide duration must be within {}..={} seconds, got {secs}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(secs))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SlideSeconds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for SlideSeconds {
    type Error = ReelError;

    fn try_from(secs: u32) -> ReelResult<Self> {
        Self::new(secs)
    }
}

impl From<SlideSeconds> for u32 {
    fn from(secs: SlideSeconds) -> Self {
        secs.0
    }
}

/// Ordinal of a job within its batch (0-based, submission order).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct JobId(pub usize);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job {}", self.0)
    }
}

/// Identifier of one batch run on an orchestrator. Later batches have larger ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u64);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch {}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
