//! The project: owner of media, timelines and the bin tree.
//!
//! Media records live in a [`MediaPool`] and are referred to by
//! [`MediaId`]; timelines are registered in order and referred to by
//! [`TimelineId`]. Folders and the root lists only hold ids, so a record
//! can be reached from several places without shared mutable state.

use std::fmt;
use std::path::Path;

use xmeml_common::TargetEditor;

use crate::folder::Folder;
use crate::media::{MediaId, MediaRecord};
use crate::timeline::{PlacementRequest, Timeline};

/// Registration index of a timeline inside its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(pub usize);

impl fmt::Display for TimelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence-{}", self.0 + 1)
    }
}

/// Owns every media record and hands out ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct MediaPool {
    records: Vec<MediaRecord>,
}

impl MediaPool {
    pub fn insert(&mut self, mut record: MediaRecord) -> MediaId {
        let id = MediaId(self.records.len() as u32 + 1);
        record.assign_id(id);
        self.records.push(record);
        id
    }

    pub fn get(&self, id: MediaId) -> Option<&MediaRecord> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.records.get(index)
    }

    pub fn get_mut(&mut self, id: MediaId) -> Option<&mut MediaRecord> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A complete editorial project.
#[derive(Debug, Clone)]
pub struct Project {
    pub title: String,
    target: TargetEditor,
    media: MediaPool,
    timelines: Vec<Timeline>,
    folders: Vec<Folder>,
    root_media: Vec<MediaId>,
    root_timelines: Vec<TimelineId>,
}

impl Project {
    pub fn new(title: impl Into<String>, target: TargetEditor) -> Self {
        Self {
            title: title.into(),
            target,
            media: MediaPool::default(),
            timelines: Vec::new(),
            folders: Vec::new(),
            root_media: Vec::new(),
            root_timelines: Vec::new(),
        }
    }

    pub fn target(&self) -> TargetEditor {
        self.target
    }

    /// Retarget the project and every timeline it owns.
    pub fn set_target(&mut self, target: TargetEditor) {
        self.target = target;
        for timeline in &mut self.timelines {
            timeline.set_target(target);
        }
    }

    /// Register a media record and list it at the project root.
    pub fn add_media(&mut self, record: MediaRecord) -> MediaId {
        let id = self.register_media(record);
        self.root_media.push(id);
        id
    }

    /// Register a media record without listing it at the root (for media
    /// that only lives in a bin or on a timeline).
    pub fn register_media(&mut self, record: MediaRecord) -> MediaId {
        self.media.insert(record)
    }

    /// Register a timeline and list it at the project root.
    pub fn add_timeline(&mut self, timeline: Timeline) -> TimelineId {
        let id = self.register_timeline(timeline);
        self.root_timelines.push(id);
        id
    }

    /// Register a timeline without listing it at the root.
    pub fn register_timeline(&mut self, mut timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.timelines.len());
        timeline.set_target(self.target);
        timeline.set_sequence_index(id.0);
        self.timelines.push(timeline);
        id
    }

    pub fn add_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    /// Place a registered media record on a registered timeline.
    pub fn place_media(
        &mut self,
        timeline: TimelineId,
        media: MediaId,
        request: PlacementRequest,
    ) -> Result<u32, ProjectError> {
        let timeline_ref = self
            .timelines
            .get_mut(timeline.0)
            .ok_or(ProjectError::UnknownTimeline(timeline))?;
        let record = self
            .media
            .get_mut(media)
            .ok_or(ProjectError::UnknownMedia(media))?;
        timeline_ref.add_media(record, request)
    }

    pub fn media(&self, id: MediaId) -> Option<&MediaRecord> {
        self.media.get(id)
    }

    pub fn media_mut(&mut self, id: MediaId) -> Option<&mut MediaRecord> {
        self.media.get_mut(id)
    }

    pub fn media_pool(&self) -> &MediaPool {
        &self.media
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(id.0)
    }

    pub fn timeline_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.get_mut(id.0)
    }

    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn root_media(&self) -> &[MediaId] {
        &self.root_media
    }

    pub fn root_timelines(&self) -> &[TimelineId] {
        &self.root_timelines
    }

    /// Collect problems that would make the document unusable or
    /// rendering impossible.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        for timeline in &self.timelines {
            if timeline.is_empty() {
                errors.push(format!("Timeline '{}' has no clips", timeline.name));
            }
            if timeline.framerate() == 0 {
                errors.push(format!("Timeline '{}' has no framerate", timeline.name));
            }
        }

        let check_refs = |folder: &Folder, errors: &mut Vec<String>| {
            for id in folder.media() {
                if self.media.get(*id).is_none() {
                    errors.push(format!("Bin '{}' references unknown media {id}", folder.name));
                }
            }
            for id in folder.timelines() {
                if self.timeline(*id).is_none() {
                    errors.push(format!("Bin '{}' references unknown {id}", folder.name));
                }
            }
        };
        for folder in &self.folders {
            folder.walk(&mut |f, _| check_refs(f, &mut errors));
        }

        for record in self.media.iter() {
            if !record.kind().is_synthetic() && record.location.is_none() {
                errors.push(format!("Media '{}' has no location", record.clip_name()));
            }
        }

        errors
    }

    /// Report local media files that do not exist on disk. URL locations
    /// are not checked.
    pub fn missing_sources(&self) -> Vec<String> {
        self.media
            .iter()
            .filter_map(|record| record.location.as_deref())
            .filter(|location| !location.contains("://"))
            .filter(|location| !Path::new(location).exists())
            .map(|location| format!("Source missing: {location}"))
            .collect()
    }
}

/// Errors raised while assembling a project.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("invalid track {track}: track indices start at 1")]
    InvalidTrack { track: u32 },

    #[error("placement out ({timeline_out}) precedes in ({timeline_in})")]
    InvertedRange { timeline_in: u64, timeline_out: u64 },

    #[error("placement in ({timeline_in}) precedes the timeline start ({start})")]
    BeforeStart { timeline_in: u64, start: u64 },

    #[error("unknown media {0}")]
    UnknownMedia(MediaId),

    #[error("unknown timeline {0}")]
    UnknownTimeline(TimelineId),
}
