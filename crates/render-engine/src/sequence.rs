//! `<sequence>` rendering.

use uuid::Uuid;
use xmeml_common::{TargetEditor, XmemlError, XmemlResult};
use xmeml_project_model::{LabelColor, Marker, MediaPool, Timeline, TimecodeFormat, TrackKind};

use crate::clip::{self, bool_upper, ticks, write_labels, write_rate};
use crate::session::RenderSession;
use crate::xml::XmlWriter;

/// Premiere's work area end when nothing is set.
const WORK_OUT_POINT: &str = "1461057696000000";
const EDITING_MODE_GUID: &str = "9678af98-a7b7-4bdb-b477-7ac9c8df4a4e";
const PREVIEW_PRESET_PATH: &str =
    "EncoderPresets\\SequencePreview\\9678af98-a7b7-4bdb-b477-7ac9c8df4a4e\\I-Frame Only MPEG.epr";
const PANNER_START_KEYFRAME: &str = "-91445760000000000,0.,0,0,0,0,0,0";

/// Refuse timelines the editors cannot open.
pub fn check_renderable(timeline: &Timeline) -> XmemlResult<()> {
    if timeline.is_empty() {
        return Err(XmemlError::render(format!(
            "timeline '{}' has no clips",
            timeline.name
        )));
    }
    if timeline.framerate() == 0 {
        return Err(XmemlError::render(format!(
            "timeline '{}' has no framerate",
            timeline.name
        )));
    }
    Ok(())
}

/// Deterministic sequence UUID derived from the project title and the
/// sequence position.
pub fn sequence_uuid(project_title: &str, sequence_index: usize) -> Uuid {
    let name = format!("{project_title}/sequence-{}", sequence_index + 1);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

fn sequence_attributes(timeline: &Timeline) -> Vec<(&'static str, String)> {
    let fps = timeline.framerate();
    let geometry = timeline.geometry();
    let fixed = |value: &str| value.to_string();
    vec![
        ("id", format!("sequence-{}", timeline.sequence_index() + 1)),
        ("TL.SQAudioVisibleBase", fixed("0")),
        ("TL.SQVideoVisibleBase", fixed("0")),
        ("TL.SQVisibleBaseTime", fixed("0")),
        ("TL.SQAVDividerPosition", fixed("0.5")),
        ("TL.SQHideShyTracks", fixed("0")),
        ("TL.SQHeaderWidth", fixed("236")),
        ("Monitor.ProgramZoomOut", fixed(WORK_OUT_POINT)),
        ("Monitor.ProgramZoomIn", fixed("0")),
        ("TL.SQTimePerPixel", fixed("5.6763479296991362")),
        ("MZ.EditLine", ticks(timeline.cursor, fps).to_string()),
        ("MZ.Sequence.PreviewFrameSizeHeight", geometry.height.to_string()),
        ("MZ.Sequence.PreviewFrameSizeWidth", geometry.width.to_string()),
        ("MZ.Sequence.AudioTimeDisplayFormat", fixed("200")),
        ("MZ.Sequence.PreviewRenderingClassID", fixed("1061109567")),
        ("MZ.Sequence.PreviewRenderingPresetCodec", fixed("1096172337")),
        ("MZ.Sequence.PreviewRenderingPresetPath", fixed(PREVIEW_PRESET_PATH)),
        ("MZ.Sequence.PreviewUseMaxRenderQuality", fixed("false")),
        ("MZ.Sequence.PreviewUseMaxBitDepth", fixed("false")),
        ("MZ.Sequence.EditingModeGUID", fixed(EDITING_MODE_GUID)),
        ("MZ.Sequence.VideoTimeDisplayFormat", fixed("100")),
        ("MZ.WorkOutPoint", fixed(WORK_OUT_POINT)),
        ("MZ.WorkInPoint", fixed("0")),
        (
            "MZ.ZeroPoint",
            ticks(timeline.start().frames_count(), fps).to_string(),
        ),
        ("explodedTracks", fixed("true")),
    ]
}

fn as_attrs<'a>(owned: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
    owned.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Render a whole timeline. Clip ids and file descriptors are shared with
/// the rest of the document through `session`.
pub fn render_sequence(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    project_title: &str,
    media: &MediaPool,
    timeline: &Timeline,
) -> XmemlResult<()> {
    check_renderable(timeline)?;
    let fps = timeline.framerate();

    let attributes = sequence_attributes(timeline);
    w.open_with("sequence", &as_attrs(&attributes));
    w.leaf("uuid", sequence_uuid(project_title, timeline.sequence_index()));
    w.leaf("duration", timeline.duration_frames());
    write_rate(w, fps, "FALSE");
    w.leaf("name", &timeline.name);

    w.open("media");
    render_video_tracks(w, session, media, timeline)?;
    render_audio_tracks(w, session, media, timeline)?;
    w.close("media");

    w.open("timecode");
    write_rate(w, fps, "FALSE");
    w.leaf("string", timeline.start().display(TimecodeFormat::NonDropFrame));
    w.leaf("frame", timeline.start().frames_count());
    w.leaf("displayformat", TimecodeFormat::NonDropFrame.tag());
    w.close("timecode");

    for marker in timeline.markers() {
        render_marker(w, timeline, marker);
    }

    write_labels(w, LabelColor::Forest);
    w.close("sequence");

    tracing::debug!(
        sequence = timeline.sequence_index() + 1,
        name = %timeline.name,
        clips = timeline.placement_count(),
        "rendered sequence"
    );
    Ok(())
}

fn render_track_clips(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    media: &MediaPool,
    timeline: &Timeline,
    kind: TrackKind,
    track: u32,
) -> XmemlResult<()> {
    for placement in timeline.placements_on_track(kind, track) {
        let record = media.get(placement.media).ok_or_else(|| {
            XmemlError::render(format!(
                "timeline '{}' references unknown media {}",
                timeline.name, placement.media
            ))
        })?;
        clip::render_clip(w, session, timeline, placement, record);
    }
    Ok(())
}

fn render_video_tracks(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    media: &MediaPool,
    timeline: &Timeline,
) -> XmemlResult<()> {
    let geometry = timeline.geometry();
    w.open("video");
    w.open("format");
    w.open("samplecharacteristics");
    write_rate(w, timeline.framerate(), "FALSE");
    write_codec(w);
    w.leaf("width", geometry.width);
    w.leaf("height", geometry.height);
    w.leaf("anamorphic", "FALSE");
    w.leaf(
        "pixelaspectratio",
        clip::pixel_aspect_label(geometry.pixel_aspect_ratio),
    );
    w.leaf("fielddominance", "none");
    w.leaf("colordepth", 24);
    w.close("samplecharacteristics");
    w.close("format");

    for track in 1..=timeline.max_track(TrackKind::Video) {
        w.open_with(
            "track",
            &[
                ("TL.SQTrackShy", "0"),
                ("TL.SQTrackExpandedHeight", "25"),
                ("TL.SQTrackExpanded", "0"),
                ("MZ.TrackTargeted", "1"),
            ],
        );
        render_track_clips(w, session, media, timeline, TrackKind::Video, track)?;
        w.leaf("enabled", "TRUE");
        w.leaf(
            "locked",
            bool_upper(timeline.is_track_locked(TrackKind::Video, track)),
        );
        w.close("track");
    }
    w.close("video");
    Ok(())
}

fn write_codec(w: &mut XmlWriter) {
    w.open("codec");
    w.leaf("name", "Apple ProRes 422");
    w.open("appspecificdata");
    w.leaf("appname", "Final Cut Pro");
    w.leaf("appmanufacturer", "Apple Inc.");
    w.leaf("appversion", "7.0");
    w.open("data");
    w.open("qtcodec");
    w.leaf("codecname", "Apple ProRes 422");
    w.leaf("codectypename", "Apple ProRes 422");
    w.leaf("codectypecode", "apcn");
    w.leaf("codecvendorcode", "appl");
    w.leaf("spatialquality", 1024);
    w.leaf("temporalquality", 0);
    w.leaf("keyframerate", 0);
    w.leaf("datarate", 0);
    w.close("qtcodec");
    w.close("data");
    w.close("appspecificdata");
    w.close("codec");
}

/// Attributes of audio track `index`. Odd tracks carry the panner's
/// current value and start keyframe.
fn audio_track_attributes(index: u32) -> Vec<(&'static str, &'static str)> {
    let odd = index % 2 == 1;
    let mut attrs = vec![
        ("monotrack", "TRUE"),
        ("TL.SQTrackAudioKeyframeStyle", "0"),
        ("TL.SQTrackShy", "0"),
        ("TL.SQTrackExpandedHeight", "25"),
        ("TL.SQTrackExpanded", "0"),
        ("MZ.TrackTargeted", "1"),
    ];
    if odd {
        attrs.push(("PannerCurrentValue", "0"));
    }
    attrs.push(("PannerIsInverted", "true"));
    if odd {
        attrs.push(("PannerStartKeyframe", PANNER_START_KEYFRAME));
    }
    attrs.extend([
        ("PannerName", "Pan"),
        ("currentExplodedTrackIndex", "0"),
        ("totalExplodedTrackCount", "1"),
        ("premiereTrackType", "Mono"),
    ]);
    attrs
}

fn render_audio_tracks(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    media: &MediaPool,
    timeline: &Timeline,
) -> XmemlResult<()> {
    let channels = timeline.audio_channels;
    w.open("audio");
    w.leaf("numOutputChannels", channels);
    w.open("format");
    w.open("samplecharacteristics");
    w.leaf("depth", 16);
    w.leaf("samplerate", 48_000);
    w.close("samplecharacteristics");
    w.close("format");

    w.open("outputs");
    for index in 1..=channels {
        w.open("group");
        w.leaf("index", index);
        w.leaf("numchannels", 1);
        w.leaf("downmix", 0);
        w.open("channel");
        w.leaf("index", index);
        w.close("channel");
        w.close("group");
    }
    w.close("outputs");

    let track_count = timeline.max_track(TrackKind::Audio).max(channels);
    for track in 1..=track_count {
        w.open_with("track", &audio_track_attributes(track));
        render_track_clips(w, session, media, timeline, TrackKind::Audio, track)?;
        w.leaf("enabled", "TRUE");
        w.leaf(
            "locked",
            bool_upper(timeline.is_track_locked(TrackKind::Audio, track)),
        );
        w.leaf("outputchannelindex", track);
        w.close("track");
    }
    w.close("audio");
    Ok(())
}

/// Marker in/out relative to the sequence start; a point marker has out -1.
pub fn marker_bounds(timeline: &Timeline, marker: &Marker) -> (i64, i64) {
    let start = timeline.start().frames_count() as i64;
    let marker_in = marker.in_point().frames_count() as i64 - start;
    let marker_out = match marker.out_point() {
        Some(out) if !marker.is_point() => out.frames_count() as i64 - start + 1,
        _ => -1,
    };
    (marker_in, marker_out)
}

fn render_marker(w: &mut XmlWriter, timeline: &Timeline, marker: &Marker) {
    let (marker_in, marker_out) = marker_bounds(timeline, marker);
    w.open("marker");
    w.leaf("name", &marker.name);
    w.leaf("comment", &marker.note);
    w.leaf("in", marker_in);
    w.leaf("out", marker_out);
    if let Some(color) = marker.color {
        match timeline.target() {
            TargetEditor::Premiere => {
                if let Some(code) = color.premiere_code() {
                    w.leaf("pproColor", code);
                }
            }
            TargetEditor::Resolve => {
                let argb = color.argb();
                w.open("color");
                w.leaf("alpha", argb.alpha);
                w.leaf("red", argb.red);
                w.leaf("green", argb.green);
                w.leaf("blue", argb.blue);
                w.close("color");
            }
        }
    }
    w.close("marker");
}
