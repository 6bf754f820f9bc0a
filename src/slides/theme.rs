use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    foundation::{
        core::AspectRatio,
        digest::sha256_hex,
        error::{ReelError, ReelResult},
    },
    slides::color::ColorSpec,
};

/// Rendering parameters shared by every slide of a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Theme {
    pub aspect_ratio: AspectRatio,
    pub background: Background,
}

impl Theme {
    pub fn new(aspect_ratio: AspectRatio, background: Background) -> Self {
        Self {
            aspect_ratio,
            background,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Color(ColorSpec),
    Image(ImageSpec),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(ColorSpec::default())
    }
}

impl From<ColorSpec> for Background {
    fn from(color: ColorSpec) -> Self {
        Background::Color(color)
    }
}

impl From<ImageSpec> for Background {
    fn from(image: ImageSpec) -> Self {
        Background::Image(image)
    }
}

/// Encoded background image payload (PNG, JPEG, WebP, ...).
///
/// The bytes are immutable and shared; cloning an `ImageSpec` never copies the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSpec {
    bytes: Arc<[u8]>,
    format: image::ImageFormat,
}

impl ImageSpec {
    /// Wrap an encoded image. The format is sniffed from the leading bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> ReelResult<Self> {
        let bytes: Vec<u8> = bytes.into();
        if bytes.is_empty() {
            return Err(ReelError::validation("background image payload is empty"));
        }
        let format = image::guess_format(&bytes).map_err(|e| {
            ReelError::validation(format!("background image format not recognized: {e}"))
        })?;
        Ok(Self {
            bytes: bytes.into(),
            format,
        })
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read background image '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Decode a `data:<media type>;base64,<payload>` URL, as produced by browser file pickers.
    pub fn from_data_url(url: &str) -> ReelResult<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ReelError::validation("data URL must start with \"data:\""))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ReelError::validation("data URL is missing the ',' separator"))?;
        if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(ReelError::validation(
                "only base64-encoded data URLs are supported",
            ));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ReelError::validation(format!("invalid base64 in data URL: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> image::ImageFormat {
        self.format
    }

    pub fn media_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn sha256(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

impl std::fmt::Debug for ImageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSpec")
            .field("media_type", &self.media_type())
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl serde::Serialize for ImageSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;
        let mut s = serializer.serialize_struct("ImageSpec", 3)?;
        s.serialize_field("media_type", self.media_type())?;
        s.serialize_field("bytes", &self.bytes.len())?;
        s.serialize_field("sha256", &self.sha256())?;
        s.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slides/theme.rs"]
mod tests;
