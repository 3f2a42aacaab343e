//! Whole-document rendering and export.

use std::path::{Path, PathBuf};

use anyhow::Context;
use xmeml_common::{TargetEditor, XmemlError, XmemlResult};
use xmeml_project_model::Project;

use crate::folder::render_bin;
use crate::masterclip::render_masterclip;
use crate::sequence::{check_renderable, render_sequence};
use crate::session::RenderSession;
use crate::xml::XmlWriter;

/// An export job ready to be written.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Output file path.
    pub output_path: PathBuf,

    /// Editor override; the project's own target when `None`.
    pub target: Option<TargetEditor>,
}

impl ExportJob {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: TargetEditor) -> Self {
        self.target = Some(target);
        self
    }
}

/// `{title}_{SUFFIX}.xml`, the conventional name for an exported project.
pub fn default_file_name(title: &str, target: TargetEditor) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{}_{}.xml", stem.trim(), target.file_suffix())
}

/// Render the complete XMEML document for `project`.
///
/// Every timeline is checked before any text is produced, so a failure
/// never leaves a partial document behind.
pub fn render_document(project: &Project) -> XmemlResult<String> {
    for timeline in project.timelines() {
        check_renderable(timeline)?;
    }

    let mut session = RenderSession::new();
    let mut w = XmlWriter::new();
    w.line(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    w.line("<!DOCTYPE xmeml>");
    w.open_with("xmeml", &[("version", "4")]);
    w.open("project");
    w.leaf("name", &project.title);
    w.open("children");

    for folder in project.folders() {
        render_bin(&mut w, &mut session, project, folder)?;
    }

    for id in project.root_timelines() {
        let timeline = project
            .timeline(*id)
            .ok_or_else(|| XmemlError::render(format!("unknown {id} at project root")))?;
        render_sequence(&mut w, &mut session, &project.title, project.media_pool(), timeline)?;
    }

    for id in project.root_media() {
        let media = project
            .media(*id)
            .ok_or_else(|| XmemlError::render(format!("unknown media {id} at project root")))?;
        render_masterclip(&mut w, &mut session, media, project.target());
    }

    w.close("children");
    w.close("project");
    w.close("xmeml");

    tracing::debug!(
        clips = session.clips_rendered(),
        bytes = w.as_str().len(),
        "rendered document"
    );
    Ok(w.finish())
}

/// Render `project` and write it to `path`, creating parent directories.
pub fn write_document(project: &Project, path: &Path) -> XmemlResult<()> {
    let xml = render_document(project)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        target = %project.target(),
        timelines = project.timelines().len(),
        media = project.media_pool().len(),
        "Wrote XMEML document"
    );
    Ok(())
}

/// Export the project to an XMEML file.
///
/// This is the main entry point for writing documents.
pub fn export_project(project: &Project, job: &ExportJob) -> XmemlResult<PathBuf> {
    tracing::info!(
        output = %job.output_path.display(),
        target = ?job.target,
        "Starting export"
    );

    match job.target {
        Some(target) if target != project.target() => {
            let mut retargeted = project.clone();
            retargeted.set_target(target);
            write_document(&retargeted, &job.output_path)?;
        }
        _ => write_document(project, &job.output_path)?,
    }

    Ok(job.output_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmeml_project_model::{MediaRecord, PlacementRequest, Timecode, Timeline};

    fn project() -> Project {
        let mut project = Project::new("Short Film", TargetEditor::Premiere);
        let mut record = MediaRecord::video("A001.mov", 25);
        record.location = Some("/footage/A001.mov".into());
        record.set_out(Timecode::from_frames(99, 25));
        let media = project.add_media(record);
        let tl = project.add_timeline(Timeline::new("Edit"));
        project
            .place_media(tl, media, PlacementRequest::on_track(1))
            .unwrap();
        project
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name("Short Film", TargetEditor::Premiere),
            "Short Film_PRE.xml"
        );
        assert_eq!(
            default_file_name("a/b", TargetEditor::Resolve),
            "a_b_RESOLVE.xml"
        );
    }

    #[test]
    fn test_document_envelope() {
        let xml = render_document(&project()).unwrap();
        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE xmeml>\n<xmeml version=\"4\">\n"
        ));
        assert!(xml.ends_with("</xmeml>\n"));
        assert!(xml.contains("\t<project>\n\t\t<name>Short Film</name>\n\t\t<children>"));
    }

    #[test]
    fn test_timelines_before_root_media() {
        let xml = render_document(&project()).unwrap();
        let sequence = xml.find("<sequence ").unwrap();
        let masterclip = xml.find("<clip id=\"masterclip-1\"").unwrap();
        assert!(sequence < masterclip);
    }

    #[test]
    fn test_empty_timeline_fails_before_output() {
        let mut project = project();
        project.add_timeline(Timeline::new("Empty"));
        let err = render_document(&project).unwrap_err();
        assert!(matches!(err, XmemlError::Render { .. }));
    }

    #[test]
    fn test_export_writes_file_with_target_override() {
        let dir = std::env::temp_dir().join(format!("xmeml-export-{}", std::process::id()));
        let job =
            ExportJob::new(dir.join("out").join("film.xml")).with_target(TargetEditor::Resolve);
        let written = export_project(&project(), &job).unwrap();

        let xml = std::fs::read_to_string(&written).unwrap();
        assert!(xml.contains("<compositemode>normal</compositemode>"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
