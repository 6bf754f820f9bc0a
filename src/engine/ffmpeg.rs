use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    batch::spec::JobSpec,
    engine::adapter::{EncodeEngine, EncodeError},
    foundation::core::Canvas,
    slides::{
        color::ColorSpec,
        theme::{Background, ImageSpec},
    },
};

const TITLE_FILE: &str = "title.txt";
const BODY_FILE: &str = "body.txt";
const BACKGROUND_FILE: &str = "background.png";
const OUTPUT_FILE: &str = "slide.mp4";

/// Font sizes and padding are given for a 720 px short side and scaled to the canvas.
const REFERENCE_SHORT_SIDE: f64 = 720.0;

/// Options for [`FfmpegEngine`].
#[derive(Clone, Debug)]
pub struct FfmpegEngineOpts {
    /// `ffmpeg` executable; looked up on `PATH` when relative.
    pub ffmpeg: PathBuf,
    /// Output frames-per-second.
    pub fps: u32,
    /// Font for both text boxes. `None` lets ffmpeg pick through fontconfig.
    pub font_file: Option<PathBuf>,
    pub title_font_px: u32,
    pub body_font_px: u32,
    pub text_color: ColorSpec,
    /// Fill of the boxes behind title and body.
    pub box_color: ColorSpec,
    /// Distance of the boxes from the frame edges.
    pub padding_px: u32,
    /// Parent of the engine scratch directory. Defaults to the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl Default for FfmpegEngineOpts {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            fps: 30,
            font_file: None,
            title_font_px: 48,
            body_font_px: 32,
            text_color: ColorSpec::rgb(0x11, 0x18, 0x27),
            box_color: ColorSpec::rgba(0xff, 0xff, 0xff, 0xd9),
            padding_px: 24,
            scratch_root: None,
        }
    }
}

/// Engine that renders each slide with the system `ffmpeg`.
///
/// The background is a lavfi `color` source or the theme image (cover-fitted to the canvas);
/// the title is boxed in the top-left corner and the body in the bottom-left, both with
/// `drawtext`. Output is H.264 / yuv420p MP4 for broad compatibility.
pub struct FfmpegEngine {
    opts: FfmpegEngineOpts,
    scratch: Option<PathBuf>,
}

impl FfmpegEngine {
    pub fn new(opts: FfmpegEngineOpts) -> Self {
        Self {
            opts,
            scratch: None,
        }
    }

    pub fn opts(&self) -> &FfmpegEngineOpts {
        &self.opts
    }

    /// Build the ffmpeg invocation for `job`, to run inside `job_dir`.
    ///
    /// `job_dir` must already hold the title/body text files and, for image backgrounds, the
    /// prepared background PNG.
    pub fn command(&self, job: &JobSpec, job_dir: &Path) -> Command {
        let canvas = job.aspect_ratio().canvas();
        let fps = self.opts.fps.to_string();

        let mut cmd = Command::new(&self.opts.ffmpeg);
        cmd.current_dir(job_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(["-hide_banner", "-loglevel", "error", "-y"]);

        match job.background() {
            Background::Color(color) => {
                cmd.args(["-f", "lavfi", "-i"]).arg(format!(
                    "color=c={}:s={}x{}:r={}",
                    color.to_ffmpeg_rgb(),
                    canvas.width,
                    canvas.height,
                    fps
                ));
            }
            Background::Image(_) => {
                cmd.args(["-loop", "1", "-framerate"])
                    .arg(&fps)
                    .args(["-i", BACKGROUND_FILE]);
            }
        }

        cmd.arg("-t")
            .arg(job.duration().get().to_string())
            .arg("-vf")
            .arg(self.filter_graph(canvas))
            .args(["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-r"])
            .arg(&fps)
            .args(["-movflags", "+faststart", OUTPUT_FILE]);
        cmd
    }

    fn filter_graph(&self, canvas: Canvas) -> String {
        let scale = f64::from(canvas.width.min(canvas.height)) / REFERENCE_SHORT_SIDE;
        let px = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
        let pad = px(self.opts.padding_px);
        let border = (pad / 2).max(1);

        let mut common = format!(
            "fontcolor={}:box=1:boxcolor={}:boxborderw={border}:expansion=none",
            ffmpeg_color_with_alpha(self.opts.text_color),
            ffmpeg_color_with_alpha(self.opts.box_color),
        );
        if let Some(font) = &self.opts.font_file {
            common.push_str(":fontfile=");
            common.push_str(&escape_filter_option(&font.to_string_lossy()));
        }

        format!(
            "drawtext=textfile={TITLE_FILE}:fontsize={}:{common}:x={pad}:y={pad},\
             drawtext=textfile={BODY_FILE}:fontsize={}:{common}:x={pad}:y=h-th-{pad}",
            px(self.opts.title_font_px),
            px(self.opts.body_font_px),
        )
    }

    /// Characters per line for `font_px` text on `canvas`, leaving room for the padding.
    fn wrap_width(&self, canvas: Canvas, font_px: u32) -> usize {
        let scale = f64::from(canvas.width.min(canvas.height)) / REFERENCE_SHORT_SIDE;
        let usable = f64::from(canvas.width) - 4.0 * f64::from(self.opts.padding_px) * scale;
        let glyph = (f64::from(font_px) * scale * 0.55).max(1.0);
        ((usable / glyph).floor() as usize).max(8)
    }

    fn write_job_inputs(&self, job: &JobSpec, dir: &Path) -> Result<(), EncodeError> {
        let canvas = job.aspect_ratio().canvas();
        let title = wrap_text(job.title(), self.wrap_width(canvas, self.opts.title_font_px));
        let body = wrap_text(job.content(), self.wrap_width(canvas, self.opts.body_font_px));
        write_file(&dir.join(TITLE_FILE), title.as_bytes())?;
        write_file(&dir.join(BODY_FILE), body.as_bytes())?;

        if let Background::Image(image) = job.background() {
            let fitted = cover_fit(image, canvas)?;
            fitted
                .save_with_format(dir.join(BACKGROUND_FILE), image::ImageFormat::Png)
                .map_err(|e| EncodeError::new(format!("failed to write background image: {e}")))?;
        }
        Ok(())
    }
}

impl EncodeEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    #[tracing::instrument(skip(self), fields(ffmpeg = %self.opts.ffmpeg.display()))]
    fn ensure_ready(&mut self) -> Result<(), EncodeError> {
        if self.scratch.is_some() {
            return Ok(());
        }
        if self.opts.fps == 0 {
            return Err(EncodeError::new("fps must be non-zero"));
        }
        if !is_ffmpeg_available(&self.opts.ffmpeg) {
            return Err(EncodeError::new(format!(
                "'{}' was not found or failed to run (is ffmpeg installed and on PATH?)",
                self.opts.ffmpeg.display()
            )));
        }
        if !has_filter(&self.opts.ffmpeg, "drawtext") {
            return Err(EncodeError::new(
                "ffmpeg was built without the drawtext filter (libfreetype)",
            ));
        }
        if let Some(font) = &self.opts.font_file
            && !font.is_file()
        {
            return Err(EncodeError::new(format!(
                "font file '{}' does not exist",
                font.display()
            )));
        }

        let root = self
            .opts
            .scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let scratch = root.join(format!(
            "slidereel_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&scratch).map_err(|e| {
            EncodeError::new(format!(
                "failed to create scratch directory '{}': {e}",
                scratch.display()
            ))
        })?;
        tracing::debug!(scratch = %scratch.display(), "ffmpeg engine ready");
        self.scratch = Some(scratch);
        Ok(())
    }

    #[tracing::instrument(skip(self, job), fields(job = %job.id(), secs = job.duration().get()))]
    fn encode(&mut self, job: &JobSpec) -> Result<Vec<u8>, EncodeError> {
        let scratch = self
            .scratch
            .as_ref()
            .ok_or_else(|| EncodeError::new("ffmpeg engine used before ensure_ready"))?;
        let dir = ScratchDirGuard(scratch.join(format!("job_{:02}", job.id().0)));
        if dir.0.exists() {
            let _ = std::fs::remove_dir_all(&dir.0);
        }
        std::fs::create_dir_all(&dir.0).map_err(|e| {
            EncodeError::new(format!("failed to create job directory: {e}"))
        })?;

        self.write_job_inputs(job, &dir.0)?;

        let output = self.command(job, &dir.0).output().map_err(|e| {
            EncodeError::new(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodeError::new(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        std::fs::read(dir.0.join(OUTPUT_FILE))
            .map_err(|e| EncodeError::new(format!("failed to read ffmpeg output: {e}")))
    }
}

impl Drop for FfmpegEngine {
    fn drop(&mut self) {
        if let Some(dir) = self.scratch.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

struct ScratchDirGuard(PathBuf);

impl Drop for ScratchDirGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    std::fs::write(path, bytes)
        .map_err(|e| EncodeError::new(format!("failed to write '{}': {e}", path.display())))
}

/// Decode `image` and scale/crop it to fill `canvas` (CSS `background-size: cover`).
pub(crate) fn cover_fit(image: &ImageSpec, canvas: Canvas) -> Result<image::RgbaImage, EncodeError> {
    let decoded = image::load_from_memory_with_format(image.bytes(), image.format())
        .map_err(|e| EncodeError::new(format!("failed to decode background image: {e}")))?;
    Ok(decoded
        .resize_to_fill(
            canvas.width,
            canvas.height,
            image::imageops::FilterType::Lanczos3,
        )
        .to_rgba8())
}

/// Greedy word wrap to at most `max_chars` per line; longer words are split.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            let word_len = chars.len();
            if line_len > 0 && line_len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chars);
            line_len += word_len;
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn ffmpeg_color_with_alpha(color: ColorSpec) -> String {
    format!("{}@{:.3}", color.to_ffmpeg_rgb(), f64::from(color.a) / 255.0)
}

/// Escape a filter option value for both unescaping passes ffmpeg applies: the option parser
/// (`\`, `:`, `'`) and then the filtergraph parser (`\`, `'`, `[`, `]`, `,`, `;`).
pub(crate) fn escape_filter_option(value: &str) -> String {
    let escape = |input: &str, special: &[char]| {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if special.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    };
    let option = escape(value, &['\\', ':', '\'']);
    escape(&option, &['\\', '\'', '[', ']', ',', ';'])
}

/// Return `true` when `ffmpeg` can be invoked.
pub fn is_ffmpeg_available(ffmpeg: impl AsRef<OsStr>) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_ffmpeg_available("ffmpeg")
}

fn has_filter(ffmpeg: &Path, filter: &str) -> bool {
    Command::new(ffmpeg)
        .args(["-hide_banner", "-filters"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map(|out| {
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(filter))
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/ffmpeg.rs"]
mod tests;
