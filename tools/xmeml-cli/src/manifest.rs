//! JSON project manifests.
//!
//! A manifest names every media record and timeline with a local key so
//! placements, bins and the project root can refer to them. Timelines are
//! registered in manifest order, which fixes their sequence ids.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use xmeml_common::config::ExportDefaults;
use xmeml_common::TargetEditor;
use xmeml_project_model::{
    AlphaMode, FieldDominance, Folder, Generator, LabelColor, Lumetri, Marker, MarkerColor,
    MediaId, MediaRecord, PlacementRange, PlacementRequest, Project, Timecode, Timeline,
    TimelineId, TrackKind,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,

    /// Editor to write for; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetEditor>,

    #[serde(default)]
    pub media: Vec<MediaSpec>,

    #[serde(default)]
    pub timelines: Vec<TimelineSpec>,

    #[serde(default)]
    pub folders: Vec<FolderSpec>,

    /// Media keys listed directly under the project.
    #[serde(default)]
    pub root_media: Vec<String>,

    /// Timeline keys listed directly under the project.
    #[serde(default)]
    pub root_timelines: Vec<String>,
}

/// What a media entry is made from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSpec {
    Video { file: String },
    Audio { file: String },
    Image { file: String },
    Generated { generator: Generator },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSpec {
    pub key: String,

    #[serde(flatten)]
    pub source: SourceSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,

    /// Source in point, `HH:MM:SS:FF`.
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_point: Option<String>,
    #[serde(default, rename = "out", skip_serializing_if = "Option::is_none")]
    pub out_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_aspect_ratio: Option<f64>,

    /// Pixel position of the clip centre on the timeline frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<AlphaMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_dominance: Option<FieldDominance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_channel: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub freeze: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelColor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EffectSpec {
    Lumetri { whites: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSpec {
    pub key: String,

    /// Display name; the key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_aspect_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<u64>,

    #[serde(default)]
    pub placements: Vec<PlacementSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<MarkerSpec>,

    #[serde(default)]
    pub locks: LockSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub media: String,

    #[serde(default = "default_track")]
    pub track: u32,

    /// Explicit timeline range; both ends must be given together.
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub timeline_in: Option<String>,
    #[serde(default, rename = "out", skip_serializing_if = "Option::is_none")]
    pub timeline_out: Option<String>,

    /// Use the media's own in/out points as the timeline range.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub source_points: bool,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(rename = "in")]
    pub in_point: String,
    #[serde(default, rename = "out", skip_serializing_if = "Option::is_none")]
    pub out_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LockSpec {
    pub video: Vec<u32>,
    pub audio: Vec<u32>,
    pub all_video: bool,
    pub all_audio: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<LabelColor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<FolderSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timelines: Vec<String>,
}

fn default_track() -> u32 {
    1
}

fn default_enabled() -> bool {
    true
}

/// A built project plus the manifest keys of its timelines.
#[derive(Debug)]
pub struct BuiltProject {
    pub project: Project,
    pub timeline_keys: Vec<(String, TimelineId)>,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse manifest {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }

    /// A small manifest showing every section, used by `xmeml init`.
    pub fn starter(title: &str, defaults: &ExportDefaults) -> Self {
        let clip = |key: &str, file: &str, out: &str| MediaSpec {
            key: key.to_string(),
            source: SourceSpec::Video {
                file: file.to_string(),
            },
            name: None,
            location: Some(format!("/path/to/{file}")),
            reel: None,
            fps: None,
            in_point: Some("00:00:00:00".to_string()),
            out_point: Some(out.to_string()),
            start: None,
            file_duration: None,
            width: Some(defaults.width),
            height: Some(defaults.height),
            pixel_aspect_ratio: None,
            position: None,
            scale: None,
            alpha: None,
            field_dominance: None,
            channels: None,
            source_channel: None,
            freeze: false,
            label: None,
            effects: vec![],
        };
        let placement = |media: &str| PlacementSpec {
            media: media.to_string(),
            track: 1,
            timeline_in: None,
            timeline_out: None,
            source_points: false,
            enabled: true,
        };

        Self {
            title: title.to_string(),
            target: Some(defaults.target),
            media: vec![
                clip("a001", "A001.mov", "00:00:09:24"),
                clip("a002", "A002.mov", "00:00:04:24"),
            ],
            timelines: vec![TimelineSpec {
                key: "main".to_string(),
                name: Some("Main".to_string()),
                fps: Some(defaults.framerate),
                width: Some(defaults.width),
                height: Some(defaults.height),
                pixel_aspect_ratio: None,
                start: None,
                audio_channels: Some(defaults.audio_channels),
                cursor: None,
                placements: vec![placement("a001"), placement("a002")],
                markers: vec![MarkerSpec {
                    name: "Start".to_string(),
                    note: String::new(),
                    in_point: "00:00:00:00".to_string(),
                    out_point: None,
                    color: Some(MarkerColor::Green),
                }],
                locks: LockSpec::default(),
            }],
            folders: vec![FolderSpec {
                name: "Footage".to_string(),
                color: None,
                folders: vec![],
                media: vec!["a001".to_string(), "a002".to_string()],
                timelines: vec![],
            }],
            root_media: vec![],
            root_timelines: vec!["main".to_string()],
        }
    }

    /// Build the project, filling unset values from `defaults`.
    ///
    /// Root entries keep declaration order, not the order of the root lists.
    pub fn build(&self, defaults: &ExportDefaults) -> anyhow::Result<BuiltProject> {
        let target = self.target.unwrap_or(defaults.target);
        let mut project = Project::new(self.title.clone(), target);

        let mut media_ids: HashMap<&str, MediaId> = HashMap::new();
        for spec in &self.media {
            if media_ids.contains_key(spec.key.as_str()) {
                bail!("duplicate media key '{}'", spec.key);
            }
            let record = spec
                .to_record(defaults)
                .with_context(|| format!("invalid media '{}'", spec.key))?;
            let id = if self.root_media.contains(&spec.key) {
                project.add_media(record)
            } else {
                project.register_media(record)
            };
            media_ids.insert(&spec.key, id);
        }

        for key in &self.root_media {
            lookup(&media_ids, key, "media")?;
        }

        let mut timeline_ids: HashMap<&str, TimelineId> = HashMap::new();
        let mut timeline_keys = Vec::with_capacity(self.timelines.len());
        for spec in &self.timelines {
            if timeline_ids.contains_key(spec.key.as_str()) {
                bail!("duplicate timeline key '{}'", spec.key);
            }
            let timeline = spec
                .to_timeline(defaults)
                .with_context(|| format!("invalid timeline '{}'", spec.key))?;
            let id = if self.root_timelines.contains(&spec.key) {
                project.add_timeline(timeline)
            } else {
                project.register_timeline(timeline)
            };
            timeline_ids.insert(&spec.key, id);
            timeline_keys.push((spec.key.clone(), id));
        }

        for key in &self.root_timelines {
            lookup(&timeline_ids, key, "timeline")?;
        }

        for spec in &self.timelines {
            let tl = timeline_ids[spec.key.as_str()];
            for placement in &spec.placements {
                let media = lookup(&media_ids, &placement.media, "media")?;
                let fps = project.timeline(tl).map(Timeline::framerate).unwrap_or(0);
                let request = placement
                    .to_request(fps)
                    .with_context(|| format!("invalid placement of '{}'", placement.media))?;
                project.place_media(tl, media, request).with_context(|| {
                    format!("failed to place '{}' on '{}'", placement.media, spec.key)
                })?;
            }
        }

        for spec in &self.folders {
            let folder = spec.to_folder(&media_ids, &timeline_ids)?;
            project.add_folder(folder);
        }

        Ok(BuiltProject {
            project,
            timeline_keys,
        })
    }
}

fn lookup<T: Copy>(ids: &HashMap<&str, T>, key: &str, what: &str) -> anyhow::Result<T> {
    match ids.get(key) {
        Some(id) => Ok(*id),
        None => bail!("unknown {what} key '{key}'"),
    }
}

fn timecode(value: &str, fps: u32) -> anyhow::Result<Timecode> {
    Timecode::parse_with_rate(value, fps).with_context(|| format!("bad timecode '{value}'"))
}

impl MediaSpec {
    fn to_record(&self, defaults: &ExportDefaults) -> anyhow::Result<MediaRecord> {
        let fps = self.fps.unwrap_or(defaults.framerate);
        let mut record = match &self.source {
            SourceSpec::Video { file } => MediaRecord::video(file.as_str(), fps),
            SourceSpec::Audio { file } => MediaRecord::audio(file.as_str(), fps),
            SourceSpec::Image { file } => MediaRecord::image(file.as_str(), fps),
            SourceSpec::Generated { generator } => MediaRecord::generated(*generator, fps),
            SourceSpec::Text { text } => MediaRecord::text(text.as_str(), fps),
        };

        if let (Some(width), Some(height)) = (self.width, self.height) {
            record.set_dimensions(width, height);
        } else if self.width.is_some() || self.height.is_some() {
            bail!("width and height must be given together");
        }
        if let Some([x, y]) = self.position {
            record.position.x = x;
            record.position.y = y;
        }

        if let Some(value) = &self.in_point {
            record.set_in(timecode(value, fps)?);
        }
        if let Some(value) = &self.out_point {
            record.set_out(timecode(value, fps)?);
        }
        if let Some(value) = &self.start {
            record.set_start(timecode(value, fps)?);
        }
        if let Some(value) = &self.file_duration {
            record.set_file_duration(Some(timecode(value, fps)?));
        }
        if record.out_point().frames_count() < record.in_point().frames_count() {
            bail!("out point precedes in point");
        }

        record.name = self.name.clone();
        record.location = self.location.clone();
        record.reel_name = self.reel.clone();
        if let Some(par) = self.pixel_aspect_ratio {
            record.pixel_aspect_ratio = par;
        }
        if let Some(scale) = self.scale {
            record.scale_percent = scale;
        }
        if let Some(alpha) = self.alpha {
            record.alpha = alpha;
        }
        if let Some(dominance) = self.field_dominance {
            record.field_dominance = dominance;
        }
        if let Some(channels) = self.channels {
            record.channel_count = channels;
        }
        if let Some(channel) = self.source_channel {
            record.source_channel = channel;
        }
        if let Some(label) = self.label {
            record.label = label;
        }
        record.freeze = self.freeze;

        for effect in &self.effects {
            match effect {
                EffectSpec::Lumetri { whites } => {
                    record.add_effect(Arc::new(Lumetri::new(*whites)))
                }
            }
        }
        Ok(record)
    }
}

impl TimelineSpec {
    fn to_timeline(&self, defaults: &ExportDefaults) -> anyhow::Result<Timeline> {
        let fps = self.fps.unwrap_or(defaults.framerate);
        let name = self.name.clone().unwrap_or_else(|| self.key.clone());
        let mut timeline = Timeline::with_framerate(name, fps);

        timeline.set_dimensions(
            self.width.unwrap_or(defaults.width),
            self.height.unwrap_or(defaults.height),
        );
        if let Some(par) = self.pixel_aspect_ratio {
            timeline.set_pixel_aspect_ratio(par);
        }
        if let Some(start) = &self.start {
            timeline.set_start(timecode(start, fps)?);
        }
        timeline.audio_channels = self.audio_channels.unwrap_or(defaults.audio_channels);
        timeline.cursor = self.cursor.unwrap_or(0);

        for spec in &self.markers {
            let mut marker = Marker::new(spec.name.as_str(), timecode(&spec.in_point, fps)?)
                .with_note(spec.note.as_str());
            if let Some(out) = &spec.out_point {
                marker = marker.with_out(timecode(out, fps)?);
            }
            if let Some(color) = spec.color {
                marker = marker.with_color(color);
            }
            timeline.add_marker(marker);
        }

        if self.locks.all_video {
            timeline.lock_all(TrackKind::Video);
        }
        if self.locks.all_audio {
            timeline.lock_all(TrackKind::Audio);
        }
        for track in &self.locks.video {
            timeline.set_track_locked(TrackKind::Video, *track, true);
        }
        for track in &self.locks.audio {
            timeline.set_track_locked(TrackKind::Audio, *track, true);
        }
        Ok(timeline)
    }
}

impl PlacementSpec {
    fn to_request(&self, fps: u32) -> anyhow::Result<PlacementRequest> {
        let range = match (&self.timeline_in, &self.timeline_out) {
            (Some(timeline_in), Some(timeline_out)) => PlacementRange::Explicit {
                timeline_in: timecode(timeline_in, fps)?,
                timeline_out: timecode(timeline_out, fps)?,
            },
            (None, None) if self.source_points => PlacementRange::MediaPoints,
            (None, None) => PlacementRange::Implied,
            _ => bail!("'in' and 'out' must be given together"),
        };
        Ok(PlacementRequest {
            track: self.track,
            range,
            enabled: self.enabled,
        })
    }
}

impl FolderSpec {
    fn to_folder(
        &self,
        media_ids: &HashMap<&str, MediaId>,
        timeline_ids: &HashMap<&str, TimelineId>,
    ) -> anyhow::Result<Folder> {
        let mut folder = match self.color {
            Some(color) => Folder::with_color(self.name.as_str(), color),
            None => Folder::new(self.name.as_str()),
        };
        for child in &self.folders {
            folder.add_folder(child.to_folder(media_ids, timeline_ids)?);
        }
        for key in &self.media {
            let id = lookup(media_ids, key, "media")
                .with_context(|| format!("in bin '{}'", self.name))?;
            folder.add_media(id);
        }
        for key in &self.timelines {
            let id = lookup(timeline_ids, key, "timeline")
                .with_context(|| format!("in bin '{}'", self.name))?;
            folder.add_timeline(id);
        }
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "title": "Promo",
        "target": "resolve",
        "media": [
            { "key": "a", "kind": "video", "file": "A.mov", "location": "/f/A.mov",
              "in": "00:00:00:00", "out": "00:00:03:24", "width": 1920, "height": 1080,
              "effects": [{ "type": "lumetri", "whites": 20 }] },
            { "key": "b", "kind": "video", "file": "B.mov", "location": "/f/B.mov",
              "in": "00:00:02:00", "out": "00:00:05:24" },
            { "key": "vo", "kind": "audio", "file": "vo.wav", "location": "/f/vo.wav",
              "out": "00:00:01:24", "channels": 2 },
            { "key": "title", "kind": "text", "text": "Hello" },
            { "key": "adj", "kind": "generated", "generator": "adjustment_layer" }
        ],
        "timelines": [
            { "key": "main", "name": "Main Edit", "fps": 25,
              "placements": [
                  { "media": "a", "source_points": true },
                  { "media": "b", "source_points": true },
                  { "media": "vo", "in": "00:00:10:00", "out": "00:00:11:24" }
              ],
              "markers": [{ "name": "Hit", "in": "00:00:01:00", "color": "red" }],
              "locks": { "audio": [1] } },
            { "key": "alt" }
        ],
        "folders": [
            { "name": "Selects", "color": "forest", "media": ["a", "b"],
              "folders": [{ "name": "Cuts", "timelines": ["alt"] }] }
        ],
        "root_media": ["vo"],
        "root_timelines": ["main"]
    }"#;

    fn defaults() -> ExportDefaults {
        ExportDefaults::default()
    }

    #[test]
    fn test_build_full_manifest() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let built = manifest.build(&defaults()).unwrap();
        let project = &built.project;

        assert_eq!(project.title, "Promo");
        assert_eq!(project.target(), TargetEditor::Resolve);
        assert_eq!(project.media_pool().len(), 5);
        assert_eq!(project.timelines().len(), 2);
        assert_eq!(project.root_media().len(), 1);
        assert_eq!(project.root_timelines(), &[TimelineId(0)]);

        let main = project.timeline(TimelineId(0)).unwrap();
        assert_eq!(main.name, "Main Edit");
        assert_eq!(main.max_track(TrackKind::Video), 2);
        assert_eq!(main.markers().len(), 1);
        assert!(main.is_track_locked(TrackKind::Audio, 1));

        let vo = &main.placements(TrackKind::Audio)[0];
        assert_eq!(vo.timeline_in.frames_count(), 250);

        let selects = &project.folders()[0];
        assert_eq!(selects.color, LabelColor::Forest);
        assert_eq!(selects.media().len(), 2);
        assert_eq!(selects.folders()[0].timelines(), &[TimelineId(1)]);

        assert_eq!(
            built.timeline_keys,
            vec![
                ("main".to_string(), TimelineId(0)),
                ("alt".to_string(), TimelineId(1))
            ]
        );
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "title": "T", "timelines": [{ "key": "m", "placements": [{ "media": "nope" }] }] }"#,
        )
        .unwrap();
        let err = manifest.build(&defaults()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown media key 'nope'"));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "title": "T", "media": [
                { "key": "a", "kind": "video", "file": "A.mov" },
                { "key": "a", "kind": "video", "file": "B.mov" }
            ] }"#,
        )
        .unwrap();
        assert!(manifest.build(&defaults()).is_err());
    }

    #[test]
    fn test_half_open_range_is_rejected() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "title": "T",
                 "media": [{ "key": "a", "kind": "video", "file": "A.mov" }],
                 "timelines": [{ "key": "m", "placements": [{ "media": "a", "in": "00:00:01:00" }] }] }"#,
        )
        .unwrap();
        let err = manifest.build(&defaults()).unwrap_err();
        assert!(format!("{err:#}").contains("must be given together"));
    }

    #[test]
    fn test_defaults_fill_target_and_framerate() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "title": "T",
                 "media": [{ "key": "a", "kind": "video", "file": "A.mov" }],
                 "timelines": [{ "key": "m", "placements": [{ "media": "a" }] }] }"#,
        )
        .unwrap();
        let mut defaults = defaults();
        defaults.framerate = 30;
        defaults.audio_channels = 6;
        let built = manifest.build(&defaults).unwrap();

        assert_eq!(built.project.target(), TargetEditor::Premiere);
        let timeline = built.project.timeline(TimelineId(0)).unwrap();
        assert_eq!(timeline.framerate(), 30);
        assert_eq!(timeline.audio_channels, 6);
        assert_eq!(timeline.name, "m");
    }

    #[test]
    fn test_starter_round_trips_and_renders() {
        let starter = Manifest::starter("Demo", &defaults());
        let json = serde_json::to_string_pretty(&starter).unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        let built = parsed.build(&defaults()).unwrap();

        let xml = xmeml_render_engine::render_document(&built.project).unwrap();
        assert!(xml.contains("<name>Demo</name>"));
        assert!(xml.contains("<name>Footage</name>"));
    }
}
