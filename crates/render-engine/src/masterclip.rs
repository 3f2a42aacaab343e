//! Browser entries (`<clip>`) for media listed in bins or at the root.

use xmeml_common::TargetEditor;
use xmeml_project_model::{MediaRecord, TrackKind};

use crate::clip::{
    masterclip_id, render_file, write_labels, write_logging_info, write_rate, write_source_track,
};
use crate::session::RenderSession;
use crate::xml::XmlWriter;

/// Render `media` as a master clip holding a single one-track clipitem.
pub fn render_masterclip(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    media: &MediaRecord,
    target: TargetEditor,
) {
    let id = masterclip_id(media);
    let kind = media.kind().track_kind();

    w.open_with("clip", &[("id", id.as_str()), ("explodedTracks", "true")]);
    w.leaf("masterclipid", &id);
    w.leaf("ismasterclip", "TRUE");
    w.leaf("duration", media.duration().frames_count());
    write_rate(w, media.framerate(), "FALSE");
    w.leaf("name", media.clip_name());

    w.open("media");
    w.open(&kind.to_string());
    w.open("track");
    let clip_id = session.next_clip_id();
    w.open_with("clipitem", &[("id", clip_id.as_str())]);
    w.leaf("masterclipid", &id);
    w.leaf("name", media.clip_name());
    write_rate(w, media.framerate(), "FALSE");
    render_file(w, session, media, target);
    if kind == TrackKind::Audio {
        write_source_track(w, media);
    }
    w.close("clipitem");
    w.close("track");
    w.close(&kind.to_string());
    w.close("media");

    write_logging_info(w);
    write_labels(w, media.label);
    w.close("clip");
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmeml_project_model::{MediaPool, Timecode};

    #[test]
    fn test_video_masterclip() {
        let mut pool = MediaPool::default();
        let mut record = MediaRecord::video("A001.mov", 25);
        record.set_out(Timecode::from_frames(49, 25));
        let id = pool.insert(record);
        let media = pool.get(id).unwrap();

        let mut session = RenderSession::new();
        let mut w = XmlWriter::new();
        render_masterclip(&mut w, &mut session, media, TargetEditor::Premiere);
        let xml = w.finish();

        assert!(xml.starts_with("<clip id=\"masterclip-1\" explodedTracks=\"true\">"));
        assert!(xml.contains("<ismasterclip>TRUE</ismasterclip>"));
        assert!(xml.contains("<duration>50</duration>"));
        assert!(xml.contains("\t\t<video>\n\t\t\t<track>\n\t\t\t\t<clipitem id=\"clipitem-1\">"));
        assert!(xml.contains("<file id=\"file-1\">"));
        assert!(!xml.contains("sourcetrack"));
    }

    #[test]
    fn test_audio_masterclip_reuses_described_file() {
        let mut pool = MediaPool::default();
        let id = pool.insert(MediaRecord::audio("vo.wav", 25));
        let media = pool.get(id).unwrap();

        let mut session = RenderSession::new();
        assert!(session.claim_file(id));
        let mut w = XmlWriter::new();
        render_masterclip(&mut w, &mut session, media, TargetEditor::Resolve);
        let xml = w.finish();

        assert!(xml.contains("\t\t<audio>\n\t\t\t<track>"));
        assert!(xml.contains("<file id=\"file-1\"/>"));
        assert!(xml.contains("<sourcetrack>"));
        assert!(xml.contains("<label2>Caribbean</label2>"));
    }
}
