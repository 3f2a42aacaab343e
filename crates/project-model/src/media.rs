//! Source media records.
//!
//! A [`MediaRecord`] describes one asset that clips can be cut from: a
//! video or audio file, a still image, a generated element (black video,
//! adjustment layer) or a text graphic. All kinds share one struct; the
//! kind-specific payload lives in [`MediaKind`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::{AlphaMode, FieldDominance, LabelColor};
use crate::effect::Effect;
use crate::timecode::{sync_framerate, Timecode};

/// Identity of a media record inside a project's media pool.
///
/// Ids start at 1; `MediaId(0)` marks a record that has not been
/// registered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MediaId(pub u32);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Synthetic video produced by the editor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    BlackVideo,
    AdjustmentLayer,
}

impl Generator {
    pub fn default_name(&self) -> &'static str {
        match self {
            Generator::BlackVideo => "Black Video",
            Generator::AdjustmentLayer => "Adjustment Layer",
        }
    }
}

/// What a record is, plus the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Generated(Generator),
    Text(String),
}

/// Which set of tracks a kind is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => f.write_str("video"),
            TrackKind::Audio => f.write_str("audio"),
        }
    }
}

impl MediaKind {
    pub fn track_kind(&self) -> TrackKind {
        match self {
            MediaKind::Audio => TrackKind::Audio,
            _ => TrackKind::Video,
        }
    }

    /// Rendered as a `genere-{id}` file with no masterclip link.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, MediaKind::Generated(_) | MediaKind::Text(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
            MediaKind::Generated(_) => "generated",
            MediaKind::Text(_) => "text",
        }
    }
}

/// Position of a clip's centre in timeline pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPosition {
    pub x: i32,
    pub y: i32,
}

/// One source asset.
#[derive(Debug, Clone)]
pub struct MediaRecord {
    id: MediaId,
    kind: MediaKind,
    file_name: String,
    framerate: u32,
    in_point: Timecode,
    out_point: Timecode,
    start: Timecode,
    file_duration: Option<Timecode>,
    width: u32,
    height: u32,
    used_in_timeline: bool,
    effects: Vec<Arc<dyn Effect>>,

    /// Display name; the clip name falls back to the file name.
    pub name: Option<String>,
    /// Location of the file: a plain path or a URL.
    pub location: Option<String>,
    pub reel_name: Option<String>,
    pub pixel_aspect_ratio: f64,
    pub position: PixelPosition,
    pub scale_percent: u32,
    pub alpha: AlphaMode,
    pub field_dominance: FieldDominance,
    /// Audio channels carried by the file.
    pub channel_count: u32,
    /// 1-based source channel an audio clip reads from.
    pub source_channel: u32,
    /// Hold the first frame for the whole clip.
    pub freeze: bool,
    pub label: LabelColor,
}

impl MediaRecord {
    fn with_kind(kind: MediaKind, file_name: impl Into<String>, framerate: u32) -> Self {
        let zero = Timecode::from_frames(0, framerate);
        Self {
            id: MediaId::default(),
            kind,
            file_name: file_name.into(),
            framerate,
            in_point: zero,
            out_point: zero,
            start: zero,
            file_duration: None,
            width: 0,
            height: 0,
            used_in_timeline: false,
            effects: Vec::new(),
            name: None,
            location: None,
            reel_name: None,
            pixel_aspect_ratio: 1.0,
            position: PixelPosition::default(),
            scale_percent: 100,
            alpha: AlphaMode::None,
            field_dominance: FieldDominance::None,
            channel_count: 0,
            source_channel: 1,
            freeze: false,
            label: LabelColor::Iris,
        }
    }

    /// A video file. `framerate` may be 0 and adopted later from a timecode.
    pub fn video(file_name: impl Into<String>, framerate: u32) -> Self {
        Self::with_kind(MediaKind::Video, file_name, framerate)
    }

    /// A mono-per-channel audio file.
    pub fn audio(file_name: impl Into<String>, framerate: u32) -> Self {
        let mut record = Self::with_kind(MediaKind::Audio, file_name, framerate);
        record.channel_count = 1;
        record.label = LabelColor::Caribbean;
        record
    }

    /// A still image, placed like video.
    pub fn image(file_name: impl Into<String>, framerate: u32) -> Self {
        Self::with_kind(MediaKind::Image, file_name, framerate)
    }

    /// A generated element named after its generator.
    pub fn generated(generator: Generator, framerate: u32) -> Self {
        Self::with_kind(MediaKind::Generated(generator), generator.default_name(), framerate)
    }

    /// A text graphic. The underlying file is effectively unbounded.
    pub fn text(text: impl Into<String>, framerate: u32) -> Self {
        let mut record = Self::with_kind(MediaKind::Text(text.into()), "Graphic", framerate);
        record.file_duration = Some(Timecode::from_components(99, 0, 0, 0, framerate));
        record.alpha = AlphaMode::Straight;
        record
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: MediaId) {
        self.id = id;
    }

    pub fn kind(&self) -> &MediaKind {
        &self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    /// Force a framerate onto the record and every timecode it holds.
    pub fn set_framerate(&mut self, framerate: u32) {
        self.framerate = framerate;
        self.in_point.set_framerate(framerate);
        self.out_point.set_framerate(framerate);
        self.start.set_framerate(framerate);
        if let Some(duration) = self.file_duration.as_mut() {
            duration.set_framerate(framerate);
        }
    }

    pub fn in_point(&self) -> Timecode {
        self.in_point
    }

    pub fn out_point(&self) -> Timecode {
        self.out_point
    }

    pub fn start(&self) -> Timecode {
        self.start
    }

    pub fn set_in(&mut self, mut tc: Timecode) {
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.in_point = tc;
        self.adopt(adopted);
    }

    pub fn set_out(&mut self, mut tc: Timecode) {
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.out_point = tc;
        self.adopt(adopted);
    }

    pub fn set_start(&mut self, mut tc: Timecode) {
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.start = tc;
        self.adopt(adopted);
    }

    fn adopt(&mut self, rate: Option<u32>) {
        if let Some(rate) = rate {
            self.set_framerate(rate);
        }
    }

    /// `out - in + 1` frames, recomputed on every call. An inverted range
    /// yields an empty duration.
    pub fn duration(&self) -> Timecode {
        let frames = (self.out_point.frames_count() + 1).saturating_sub(self.in_point.frames_count());
        Timecode::from_frames(frames, self.framerate)
    }

    /// Length of the underlying file, defaulting to the clip duration.
    pub fn file_duration(&self) -> Timecode {
        self.file_duration.unwrap_or_else(|| self.duration())
    }

    pub fn set_file_duration(&mut self, tc: Option<Timecode>) {
        self.file_duration = tc.map(|mut tc| {
            sync_framerate(&mut self.framerate, &mut tc);
            tc
        });
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the frame size and re-centre the position.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.position = PixelPosition {
            x: (width / 2) as i32,
            y: (height / 2) as i32,
        };
    }

    pub fn effects(&self) -> &[Arc<dyn Effect>] {
        &self.effects
    }

    pub fn add_effect(&mut self, effect: Arc<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn is_used_in_timeline(&self) -> bool {
        self.used_in_timeline
    }

    pub(crate) fn mark_used(&mut self) {
        self.used_in_timeline = true;
    }

    /// Name shown on clips: the display name, or the last path component
    /// of the file name.
    pub fn clip_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        base_name(&self.file_name).to_string()
    }

    /// Base name of the file, whatever separator the path uses.
    pub fn file_base_name(&self) -> &str {
        base_name(&self.file_name)
    }

    /// Location as a `file://localhost/` URL. Locations that already
    /// carry a scheme are returned untouched.
    pub fn path_url(&self) -> String {
        let Some(location) = self.location.as_deref() else {
            return String::new();
        };
        if location.contains("://") {
            return location.to_string();
        }

        let normalized = location.replace('\\', "/");
        let mut url = String::from("file://localhost/");
        for ch in normalized.trim_start_matches('/').chars() {
            match ch {
                ':' => url.push_str("%3a"),
                ' ' => url.push_str("%20"),
                _ => url.push(ch),
            }
        }
        url
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
