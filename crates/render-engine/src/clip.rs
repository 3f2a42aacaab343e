//! `<clipitem>` and `<file>` fragments.
//!
//! A media file is described in full the first time the document
//! references it and by a bare `<file id="..."/>` afterwards; the
//! [`RenderSession`] decides which.

use xmeml_common::TargetEditor;
use xmeml_project_model::{
    motion_center, ClipPlacement, Geometry, LabelColor, MediaKind, MediaRecord, Timeline,
    TimecodeFormat, TrackKind,
};

use crate::filters::{self, BasicMotion};
use crate::session::RenderSession;
use crate::xml::XmlWriter;

/// Premiere ticks per second.
pub const TICKS_PER_SECOND: u64 = 254_016_000_000;

const SAMPLE_RATE: u32 = 48_000;
const SAMPLE_DEPTH: u32 = 16;

/// Convert a frame count to Premiere ticks. Zero when `fps` is zero.
pub fn ticks(frames: u64, fps: u32) -> u128 {
    if fps == 0 {
        return 0;
    }
    u128::from(frames) * u128::from(TICKS_PER_SECOND) / u128::from(fps)
}

/// Document id of a media record's file.
pub fn file_id(media: &MediaRecord) -> String {
    if media.kind().is_synthetic() {
        format!("genere-{}", media.id())
    } else {
        format!("file-{}", media.id())
    }
}

pub fn masterclip_id(media: &MediaRecord) -> String {
    format!("masterclip-{}", media.id())
}

/// Render one placement as a `<clipitem>`.
pub fn render_clip(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    timeline: &Timeline,
    placement: &ClipPlacement,
    media: &MediaRecord,
) {
    match media.kind().track_kind() {
        TrackKind::Video => render_video_clip(w, session, timeline, placement, media),
        TrackKind::Audio => render_audio_clip(w, session, timeline, placement, media),
    }
}

/// Timing fields shared by audio and video clipitems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipTiming {
    pub duration: u64,
    pub start: u64,
    pub end: u64,
    pub source_in: u64,
    pub source_out: u64,
    pub ticks_out: u128,
}

impl ClipTiming {
    pub fn new(timeline: &Timeline, placement: &ClipPlacement, media: &MediaRecord) -> Self {
        let duration = media.duration().frames_count();
        // Placements never precede the start; the timeline rejects them.
        let start = placement
            .timeline_in
            .frames_count()
            .saturating_sub(timeline.start().frames_count());
        let end = if duration > 1 {
            start + duration - 1
        } else {
            start + duration
        };
        let source_out = media.out_point().frames_count();
        Self {
            duration,
            start,
            end,
            source_in: media.in_point().frames_count(),
            source_out,
            ticks_out: ticks(source_out, timeline.framerate()),
        }
    }
}

fn clip_rate(media: &MediaRecord, timeline: &Timeline) -> u32 {
    match media.framerate() {
        0 => timeline.framerate(),
        fps => fps,
    }
}

fn write_clip_head(
    w: &mut XmlWriter,
    media: &MediaRecord,
    enabled: bool,
    rate: u32,
    timing: &ClipTiming,
) {
    w.leaf("masterclipid", masterclip_id(media));
    w.leaf("name", media.clip_name());
    w.leaf("enabled", bool_upper(enabled));
    w.leaf("duration", timing.duration);
    write_rate(w, rate, "FALSE");
    w.leaf("start", timing.start);
    w.leaf("end", timing.end);
    w.leaf("in", timing.source_in);
    w.leaf("out", timing.source_out);
    w.leaf("pproTicksIn", 0);
    w.leaf("pproTicksOut", timing.ticks_out);
}

fn render_video_clip(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    timeline: &Timeline,
    placement: &ClipPlacement,
    media: &MediaRecord,
) {
    let target = timeline.target();
    let timing = ClipTiming::new(timeline, placement, media);
    let clip_id = session.next_clip_id();

    w.open_with("clipitem", &[("id", clip_id.as_str())]);
    write_clip_head(w, media, placement.enabled, clip_rate(media, timeline), &timing);
    if target == TargetEditor::Premiere {
        w.leaf("alphatype", media.alpha.as_str());
    }
    w.leaf("pixelaspectratio", pixel_aspect_label(media.pixel_aspect_ratio));
    w.leaf("anamorphic", "FALSE");

    render_file(w, session, media, target);

    if !media.kind().is_synthetic() {
        w.open("link");
        w.leaf("linkclipref", masterclip_id(media));
        w.leaf("mediatype", "video");
        w.leaf("trackindex", 1);
        w.leaf("clipindex", 1);
        w.close("link");
        if target == TargetEditor::Resolve {
            w.leaf("compositemode", "normal");
        }
    }

    for effect in media.effects() {
        w.raw(&effect.render());
    }

    if !media.kind().is_synthetic() {
        let center = motion_center(
            media.position,
            Geometry::new(media.width(), media.height(), media.pixel_aspect_ratio),
            timeline.geometry(),
            target,
        );
        let source_range = (target == TargetEditor::Resolve).then(|| {
            let start = media.start().frames_count();
            (start, start + timing.duration)
        });
        filters::write_basic_motion(
            w,
            &BasicMotion {
                scale_percent: media.scale_percent,
                center: center.formatted(target),
                source_range,
            },
        );
    }

    if let MediaKind::Text(text) = media.kind() {
        filters::write_text_filter(w, text);
    }

    if media.freeze && filters::freeze_supported(target) {
        filters::write_time_remap(w);
    }

    write_clip_tail(w, media.label);
    w.close("clipitem");
}

fn render_audio_clip(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    timeline: &Timeline,
    placement: &ClipPlacement,
    media: &MediaRecord,
) {
    let timing = ClipTiming::new(timeline, placement, media);
    let clip_id = session.next_clip_id();

    w.open_with(
        "clipitem",
        &[("id", clip_id.as_str()), ("premiereChannelType", "mono")],
    );
    write_clip_head(w, media, placement.enabled, clip_rate(media, timeline), &timing);
    render_file(w, session, media, timeline.target());
    write_source_track(w, media);
    write_clip_tail(w, media.label);
    w.close("clipitem");
}

pub(crate) fn write_source_track(w: &mut XmlWriter, media: &MediaRecord) {
    w.open("sourcetrack");
    w.leaf("mediatype", "audio");
    w.leaf("trackindex", media.source_channel);
    w.close("sourcetrack");
}

fn write_clip_tail(w: &mut XmlWriter, label: LabelColor) {
    write_logging_info(w);
    w.open("colorinfo");
    for tag in ["lut", "lut1", "asc_sop", "asc_sat", "lut2"] {
        w.empty(tag);
    }
    w.close("colorinfo");
    write_labels(w, label);
}

pub(crate) fn write_logging_info(w: &mut XmlWriter) {
    w.open("logginginfo");
    for tag in [
        "description",
        "scene",
        "shottake",
        "lognote",
        "good",
        "originalvideofilename",
        "originalaudiofilename",
    ] {
        w.empty(tag);
    }
    w.close("logginginfo");
}

pub(crate) fn write_labels(w: &mut XmlWriter, label: LabelColor) {
    w.open("labels");
    w.leaf("label2", label);
    w.close("labels");
}

pub(crate) fn write_rate(w: &mut XmlWriter, timebase: u32, ntsc: &str) {
    w.open("rate");
    w.leaf("timebase", timebase);
    w.leaf("ntsc", ntsc);
    w.close("rate");
}

/// Write the `<file>` element of `media`: the full description on first
/// use in this session, a reference afterwards.
pub fn render_file(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    media: &MediaRecord,
    target: TargetEditor,
) {
    let id = file_id(media);
    if !session.claim_file(media.id()) {
        w.self_closing("file", &[("id", id.as_str())]);
        return;
    }

    w.open_with("file", &[("id", id.as_str())]);
    match media.kind() {
        MediaKind::Generated(_) | MediaKind::Text(_) => write_generated_file(w, media),
        MediaKind::Audio => write_audio_file(w, media),
        MediaKind::Video | MediaKind::Image => match target {
            TargetEditor::Premiere => write_premiere_file(w, media),
            TargetEditor::Resolve => write_resolve_file(w, media),
        },
    }
    w.close("file");
}

fn write_reel(w: &mut XmlWriter, reel: Option<&str>) {
    if let Some(name) = reel {
        w.open("reel");
        w.leaf("name", name);
        w.close("reel");
    }
}

fn write_premiere_file(w: &mut XmlWriter, media: &MediaRecord) {
    let fps = media.framerate();
    w.leaf("name", media.file_base_name());
    w.leaf("pathurl", media.path_url());
    write_rate(w, fps, "FALSE");
    w.leaf("duration", media.file_duration().frames_count());

    w.open("timecode");
    write_rate(w, fps, "FALSE");
    w.leaf("string", media.start().display(TimecodeFormat::NonDropFrame));
    w.leaf("frame", media.start().frames_count());
    w.leaf("displayformat", TimecodeFormat::NonDropFrame.tag());
    write_reel(w, media.reel_name.as_deref());
    w.close("timecode");

    w.open("media");
    w.open("video");
    w.open("samplecharacteristics");
    write_rate(w, fps, "FALSE");
    w.leaf("width", media.width());
    w.leaf("height", media.height());
    w.leaf("anamorphic", "FALSE");
    w.leaf("pixelaspectratio", pixel_aspect_label(media.pixel_aspect_ratio));
    w.leaf("fielddominance", media.field_dominance.as_str());
    w.close("samplecharacteristics");
    w.close("video");
    write_embedded_audio(w, media.channel_count);
    w.close("media");
}

fn write_resolve_file(w: &mut XmlWriter, media: &MediaRecord) {
    let fps = media.framerate();
    let file_duration = media.file_duration().frames_count();
    w.leaf("duration", file_duration);
    write_rate(w, fps, "false");
    w.leaf("name", media.file_base_name());
    w.leaf("pathurl", media.path_url());

    w.open("timecode");
    w.leaf("string", media.start().display(TimecodeFormat::NonDropFrame));
    w.leaf("displayformat", TimecodeFormat::NonDropFrame.tag());
    write_rate(w, fps, "false");
    write_reel(w, media.reel_name.as_deref());
    w.close("timecode");

    w.open("media");
    w.open("video");
    w.leaf("duration", file_duration);
    w.open("samplecharacteristics");
    w.leaf("width", media.width());
    w.leaf("height", media.height());
    w.close("samplecharacteristics");
    w.close("video");
    write_embedded_audio(w, media.channel_count);
    w.close("media");
}

/// Audio tracks carried inside a video file.
fn write_embedded_audio(w: &mut XmlWriter, channels: u32) {
    match channels {
        0 => {}
        2 => {
            for (source, label) in [(1, "left"), (2, "right")] {
                w.open("audio");
                write_sample_characteristics(w);
                w.leaf("channelcount", 1);
                w.leaf("layout", "stereo");
                w.open("audiochannel");
                w.leaf("sourcechannel", source);
                w.leaf("channellabel", label);
                w.close("audiochannel");
                w.close("audio");
            }
        }
        n => {
            w.open("audio");
            write_sample_characteristics(w);
            w.leaf("channelcount", n);
            w.close("audio");
        }
    }
}

fn write_sample_characteristics(w: &mut XmlWriter) {
    w.open("samplecharacteristics");
    w.leaf("depth", SAMPLE_DEPTH);
    w.leaf("samplerate", SAMPLE_RATE);
    w.close("samplecharacteristics");
}

fn write_audio_file(w: &mut XmlWriter, media: &MediaRecord) {
    let fps = media.framerate();
    w.leaf("name", media.file_base_name());
    w.leaf("pathurl", media.path_url());
    write_rate(w, fps, "FALSE");
    w.leaf("duration", media.file_duration().frames_count());

    w.open("timecode");
    write_rate(w, fps, "FALSE");
    w.leaf("string", media.start().display(TimecodeFormat::NonDropFrame));
    w.leaf("frame", media.start().frames_count());
    w.leaf("displayformat", TimecodeFormat::NonDropFrame.tag());
    write_reel(w, media.reel_name.as_deref());
    w.close("timecode");

    w.open("media");
    for channel in 1..=media.channel_count {
        w.open("audio");
        write_sample_characteristics(w);
        w.leaf("channelcount", 1);
        w.open("audiochannel");
        w.leaf("sourcechannel", channel);
        w.close("audiochannel");
        w.close("audio");
    }
    w.close("media");
}

fn write_generated_file(w: &mut XmlWriter, media: &MediaRecord) {
    let fps = media.framerate();
    let is_text = matches!(media.kind(), MediaKind::Text(_));

    w.leaf("name", media.file_name());
    if is_text {
        w.leaf("mediaSource", "GraphicAndType");
    }
    write_rate(w, fps, "FALSE");

    w.open("timecode");
    write_rate(w, fps, "FALSE");
    w.leaf("string", "00;00;00;00");
    w.leaf("frame", 0);
    w.leaf("displayformat", TimecodeFormat::DropFrame.tag());
    if !is_text {
        w.open("reel");
        w.empty("name");
        w.close("reel");
    }
    w.close("timecode");

    w.open("media");
    w.open("video");
    w.open("samplecharacteristics");
    write_rate(w, fps, "FALSE");
    w.leaf("width", media.width());
    w.leaf("height", media.height());
    w.leaf("anamorphic", "FALSE");
    w.leaf("pixelaspectratio", pixel_aspect_label(media.pixel_aspect_ratio));
    w.leaf("fielddominance", "none");
    w.close("samplecharacteristics");
    w.close("video");
    w.close("media");
}

pub(crate) fn bool_upper(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// `square` for 1:1 pixels, otherwise the ratio itself.
pub fn pixel_aspect_label(par: f64) -> String {
    if (par - 1.0).abs() < f64::EPSILON {
        "square".to_string()
    } else {
        format!("{par}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmeml_project_model::{Generator, PlacementRequest, Project, Timecode, TimelineId};

    fn one_clip_project(target: TargetEditor, media: MediaRecord) -> (Project, TimelineId) {
        let mut project = Project::new("Test", target);
        let id = project.add_media(media);
        let tl = project.add_timeline(Timeline::new("Main"));
        project
            .place_media(tl, id, PlacementRequest::on_track(1))
            .unwrap();
        (project, tl)
    }

    fn render_first(project: &Project, tl: TimelineId, session: &mut RenderSession) -> String {
        let timeline = project.timeline(tl).unwrap();
        let placement = timeline
            .placements(TrackKind::Video)
            .first()
            .or_else(|| timeline.placements(TrackKind::Audio).first())
            .unwrap();
        let media = project.media(placement.media).unwrap();
        let mut w = XmlWriter::new();
        render_clip(&mut w, session, timeline, placement, media);
        w.finish()
    }

    fn video(frames: u64) -> MediaRecord {
        let mut media = MediaRecord::video("/footage/A001.mov", 25);
        media.location = Some("/footage/A001.mov".into());
        media.set_dimensions(1920, 1080);
        media.set_out(Timecode::from_frames(frames - 1, 25));
        media
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(25, 25), 254_016_000_000);
        assert_eq!(ticks(99, 25), 99 * 254_016_000_000 / 25);
        assert_eq!(ticks(10, 0), 0);
        // Large frame counts do not overflow.
        assert_eq!(ticks(u64::MAX, 1), u128::from(u64::MAX) * 254_016_000_000);
    }

    #[test]
    fn test_timing_fields() {
        let (project, tl) = one_clip_project(TargetEditor::Premiere, video(100));
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.contains("<duration>100</duration>"));
        assert!(xml.contains("<start>0</start>"));
        assert!(xml.contains("<end>99</end>"));
        assert!(xml.contains("<in>0</in>"));
        assert!(xml.contains("<out>99</out>"));
        assert!(xml.contains(&format!("<pproTicksOut>{}</pproTicksOut>", ticks(99, 25))));
    }

    #[test]
    fn test_single_frame_clip_end() {
        let (project, tl) = one_clip_project(TargetEditor::Premiere, video(1));
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.contains("<start>0</start>"));
        assert!(xml.contains("<end>1</end>"));
    }

    #[test]
    fn test_premiere_video_clip_shape() {
        let (project, tl) = one_clip_project(TargetEditor::Premiere, video(100));
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.starts_with("<clipitem id=\"clipitem-1\">"));
        assert!(xml.contains("<alphatype>none</alphatype>"));
        assert!(xml.contains("<file id=\"file-1\">"));
        assert!(xml.contains("<pathurl>file://localhost/footage/A001.mov</pathurl>"));
        assert!(xml.contains("<linkclipref>masterclip-1</linkclipref>"));
        assert!(!xml.contains("compositemode"));
        assert!(xml.contains("<name>Basic Motion</name>"));
        assert!(xml.contains("<horiz>0</horiz>"));
        assert!(xml.contains("<label2>Iris</label2>"));
    }

    #[test]
    fn test_resolve_video_clip_shape() {
        let (project, tl) = one_clip_project(TargetEditor::Resolve, video(100));
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(!xml.contains("alphatype"));
        assert!(xml.contains("<compositemode>normal</compositemode>"));
        assert!(xml.contains("<ntsc>false</ntsc>"));
        assert!(xml.contains("<horiz>0.0</horiz>"));
        assert!(xml.contains("<start>0</start>\n\t\t<end>100</end>"));
    }

    #[test]
    fn test_second_reference_is_stub() {
        let (project, tl) = one_clip_project(TargetEditor::Premiere, video(10));
        let mut session = RenderSession::new();
        let first = render_first(&project, tl, &mut session);
        let second = render_first(&project, tl, &mut session);
        assert!(first.contains("<file id=\"file-1\">"));
        assert!(second.contains("<file id=\"file-1\"/>"));
        assert!(second.starts_with("<clipitem id=\"clipitem-2\">"));
    }

    #[test]
    fn test_generated_clip_has_no_link_or_motion() {
        let mut media = MediaRecord::generated(Generator::AdjustmentLayer, 25);
        media.set_out(Timecode::from_frames(49, 25));
        let (project, tl) = one_clip_project(TargetEditor::Premiere, media);
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.contains("<file id=\"genere-1\">"));
        assert!(xml.contains("<string>00;00;00;00</string>"));
        assert!(xml.contains("<displayformat>DF</displayformat>"));
        assert!(xml.contains("<reel>"));
        assert!(!xml.contains("<link>"));
        assert!(!xml.contains("Basic Motion"));
    }

    #[test]
    fn test_text_clip_carries_graphic_filter() {
        let mut media = MediaRecord::text("Opening title", 25);
        media.set_out(Timecode::from_frames(74, 25));
        let (project, tl) = one_clip_project(TargetEditor::Premiere, media);
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.contains("<mediaSource>GraphicAndType</mediaSource>"));
        assert!(xml.contains("<name>Opening title</name>"));
        assert!(xml.contains("<alphatype>straight</alphatype>"));
        assert!(!xml.contains("<reel>"));
    }

    #[test]
    fn test_freeze_renders_time_remap_for_resolve_only() {
        let mut media = MediaRecord::image("/stills/frame.png", 25);
        media.set_out(Timecode::from_frames(24, 25));
        media.freeze = true;

        let (project, tl) = one_clip_project(TargetEditor::Resolve, media.clone());
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.contains("<name>Time Remap</name>"));

        let (project, tl) = one_clip_project(TargetEditor::Premiere, media);
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(!xml.contains("Time Remap"));
    }

    #[test]
    fn test_audio_clip_shape() {
        let mut media = MediaRecord::audio("music.wav", 25);
        media.location = Some("/audio/music.wav".into());
        media.channel_count = 2;
        media.source_channel = 2;
        media.set_out(Timecode::from_frames(249, 25));
        let (project, tl) = one_clip_project(TargetEditor::Premiere, media);
        let xml = render_first(&project, tl, &mut RenderSession::new());
        assert!(xml.starts_with("<clipitem id=\"clipitem-1\" premiereChannelType=\"mono\">"));
        assert_eq!(xml.matches("<audiochannel>").count(), 2);
        assert!(xml.contains("<sourcetrack>\n\t\t<mediatype>audio</mediatype>\n\t\t<trackindex>2</trackindex>"));
        assert!(!xml.contains("alphatype"));
    }

    #[test]
    fn test_embedded_audio_layouts() {
        let mut w = XmlWriter::new();
        write_embedded_audio(&mut w, 2);
        let stereo = w.finish();
        assert!(stereo.contains("<channellabel>left</channellabel>"));
        assert!(stereo.contains("<channellabel>right</channellabel>"));

        let mut w = XmlWriter::new();
        write_embedded_audio(&mut w, 6);
        let surround = w.finish();
        assert_eq!(surround.matches("<audio>").count(), 1);
        assert!(surround.contains("<channelcount>6</channelcount>"));

        let mut w = XmlWriter::new();
        write_embedded_audio(&mut w, 0);
        assert!(w.finish().is_empty());
    }

    #[test]
    fn test_pixel_aspect_label() {
        assert_eq!(pixel_aspect_label(1.0), "square");
        assert_eq!(pixel_aspect_label(1.5), "1.5");
    }
}
