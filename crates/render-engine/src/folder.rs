//! `<bin>` rendering for the project's folder tree.

use xmeml_common::{XmemlError, XmemlResult};
use xmeml_project_model::{Folder, Project};

use crate::clip::write_labels;
use crate::masterclip::render_masterclip;
use crate::sequence::render_sequence;
use crate::session::RenderSession;
use crate::xml::XmlWriter;

/// Render `folder` and everything below it: sub-bins first, then media,
/// then timelines, each in insertion order.
pub fn render_bin(
    w: &mut XmlWriter,
    session: &mut RenderSession,
    project: &Project,
    folder: &Folder,
) -> XmemlResult<()> {
    w.open("bin");
    w.leaf("name", &folder.name);
    write_labels(w, folder.color);
    w.open("children");

    for child in folder.folders() {
        render_bin(w, session, project, child)?;
    }

    for id in folder.media() {
        let media = project.media(*id).ok_or_else(|| {
            XmemlError::render(format!("bin '{}' references unknown media {id}", folder.name))
        })?;
        render_masterclip(w, session, media, project.target());
    }

    for id in folder.timelines() {
        let timeline = project.timeline(*id).ok_or_else(|| {
            XmemlError::render(format!("bin '{}' references unknown {id}", folder.name))
        })?;
        render_sequence(w, session, &project.title, project.media_pool(), timeline)?;
    }

    w.close("children");
    w.close("bin");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmeml_common::TargetEditor;
    use xmeml_project_model::{LabelColor, MediaId, MediaRecord, Timecode};

    #[test]
    fn test_bin_order_and_nesting() {
        let mut project = Project::new("Bins", TargetEditor::Premiere);
        let mut record = MediaRecord::video("b-roll.mov", 25);
        record.set_out(Timecode::from_frames(9, 25));
        let media = project.register_media(record);

        let mut inner = Folder::with_color("Selects", LabelColor::Rose);
        inner.add_media(media);
        let mut outer = Folder::new("Day 1");
        outer.add_media(media);
        outer.add_folder(inner);

        let mut session = RenderSession::new();
        let mut w = XmlWriter::new();
        render_bin(&mut w, &mut session, &project, &outer).unwrap();
        let xml = w.finish();

        let inner_pos = xml.find("<name>Selects</name>").unwrap();
        let clip_positions: Vec<usize> = xml.match_indices("<clip id=").map(|(i, _)| i).collect();
        assert_eq!(clip_positions.len(), 2);
        // Sub-bin content comes before the outer bin's own media.
        assert!(inner_pos < clip_positions[0]);
        assert!(xml.contains("<label2>Rose</label2>"));
        assert!(xml.contains("<label2>Mango</label2>"));
        // Second listing of the same media only references the file.
        assert_eq!(xml.matches("<file id=\"file-1\">").count(), 1);
        assert_eq!(xml.matches("<file id=\"file-1\"/>").count(), 1);
    }

    #[test]
    fn test_dangling_media_reference() {
        let project = Project::new("Bins", TargetEditor::Premiere);
        let mut folder = Folder::new("Broken");
        folder.add_media(MediaId(7));

        let mut w = XmlWriter::new();
        let err = render_bin(&mut w, &mut RenderSession::new(), &project, &folder).unwrap_err();
        assert!(err.to_string().contains("unknown media 7"));
    }
}
