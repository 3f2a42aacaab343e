//! Project bins.

use crate::color::LabelColor;
use crate::media::MediaId;
use crate::project::TimelineId;

/// A bin in the project tree.
///
/// Children are kept per category in insertion order and rendered
/// sub-folders first, then media, then timelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: String,
    pub color: LabelColor,
    folders: Vec<Folder>,
    media: Vec<MediaId>,
    timelines: Vec<TimelineId>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_color(name, LabelColor::Mango)
    }

    pub fn with_color(name: impl Into<String>, color: LabelColor) -> Self {
        Self {
            name: name.into(),
            color,
            folders: Vec::new(),
            media: Vec::new(),
            timelines: Vec::new(),
        }
    }

    pub fn add_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    pub fn add_media(&mut self, media: MediaId) {
        self.media.push(media);
    }

    pub fn add_timeline(&mut self, timeline: TimelineId) {
        self.timelines.push(timeline);
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn media(&self) -> &[MediaId] {
        &self.media
    }

    pub fn timelines(&self) -> &[TimelineId] {
        &self.timelines
    }

    /// Visit this folder and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Folder, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Folder, usize)) {
        visit(self, depth);
        for child in &self.folders {
            child.walk_at(depth + 1, visit);
        }
    }
}
