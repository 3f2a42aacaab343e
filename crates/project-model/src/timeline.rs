//! Timelines: clip placements, markers and track state.
//!
//! Adding media to a timeline resolves where the clip lands in time,
//! asks the per-kind [`TrackAllocator`] for a track, and records the
//! resulting [`ClipPlacement`]. Placements keep insertion order; the
//! renderer walks them track by track.

use std::collections::BTreeSet;

use xmeml_common::TargetEditor;

use crate::allocator::TrackAllocator;
use crate::marker::Marker;
use crate::media::{MediaId, MediaRecord, TrackKind};
use crate::project::ProjectError;
use crate::timecode::{sync_framerate, Timecode};
use crate::transform::Geometry;

/// A media record placed on a timeline track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPlacement {
    pub track: u32,
    pub media: MediaId,
    pub timeline_in: Timecode,
    pub timeline_out: Timecode,
    pub enabled: bool,
}

/// Where on the timeline a placement goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementRange {
    /// Right after the current content of the media's kind, or at the
    /// timeline start when there is none, for the media's duration.
    #[default]
    Implied,
    /// The media's own in and out points.
    MediaPoints,
    /// An explicit inclusive range.
    Explicit {
        timeline_in: Timecode,
        timeline_out: Timecode,
    },
}

/// Parameters of a single add-media call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Requested track (1-based). The clip may land higher.
    pub track: u32,
    pub range: PlacementRange,
    pub enabled: bool,
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self {
            track: 1,
            range: PlacementRange::Implied,
            enabled: true,
        }
    }
}

impl PlacementRequest {
    /// Place on `track` using the media's own in/out points.
    pub fn on_track(track: u32) -> Self {
        Self {
            track,
            range: PlacementRange::MediaPoints,
            enabled: true,
        }
    }

    /// Place on `track` over an explicit range.
    pub fn at(track: u32, timeline_in: Timecode, timeline_out: Timecode) -> Self {
        Self {
            track,
            range: PlacementRange::Explicit {
                timeline_in,
                timeline_out,
            },
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, Default)]
struct TrackSet {
    placements: Vec<ClipPlacement>,
    allocator: TrackAllocator,
    locked: BTreeSet<u32>,
    lock_all: bool,
}

/// An editorial sequence.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub name: String,
    /// Number of audio output channels.
    pub audio_channels: u32,
    /// Playhead position in frames.
    pub cursor: u64,
    framerate: u32,
    start: Timecode,
    width: u32,
    height: u32,
    pixel_aspect_ratio: f64,
    target: TargetEditor,
    sequence_index: usize,
    video: TrackSet,
    audio: TrackSet,
    markers: Vec<Marker>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Timeline {
    /// A 25 fps 1920x1080 timeline starting at `00:00:00:00`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_framerate(name, 25)
    }

    pub fn with_framerate(name: impl Into<String>, framerate: u32) -> Self {
        Self {
            name: name.into(),
            audio_channels: 2,
            cursor: 0,
            framerate,
            start: Timecode::from_frames(0, framerate),
            width: 1920,
            height: 1080,
            pixel_aspect_ratio: 1.0,
            target: TargetEditor::Premiere,
            sequence_index: 0,
            video: TrackSet::default(),
            audio: TrackSet::default(),
            markers: Vec::new(),
        }
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    /// Change the framerate and bring the start, markers and placement
    /// timecodes to it. Track occupancy is not recomputed, so this is meant
    /// for use before any media is placed.
    pub fn set_framerate(&mut self, framerate: u32) {
        self.framerate = framerate;
        self.start.set_framerate(framerate);
        for marker in &mut self.markers {
            marker.set_framerate(framerate);
        }
        for placement in self
            .video
            .placements
            .iter_mut()
            .chain(self.audio.placements.iter_mut())
        {
            placement.timeline_in.set_framerate(framerate);
            placement.timeline_out.set_framerate(framerate);
        }
    }

    /// Take `framerate` when the timeline has none yet.
    fn adopt_framerate(&mut self, framerate: u32) {
        if self.framerate == 0 && framerate != 0 {
            self.set_framerate(framerate);
        }
    }

    pub fn start(&self) -> Timecode {
        self.start
    }

    pub fn set_start(&mut self, mut tc: Timecode) {
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.start = tc;
        if let Some(rate) = adopted {
            self.set_framerate(rate);
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height, self.pixel_aspect_ratio)
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_pixel_aspect_ratio(&mut self, par: f64) {
        self.pixel_aspect_ratio = par;
    }

    pub fn target(&self) -> TargetEditor {
        self.target
    }

    pub fn set_target(&mut self, target: TargetEditor) {
        self.target = target;
    }

    /// Registration index inside the owning project; the document id is
    /// `sequence-{index + 1}`.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub(crate) fn set_sequence_index(&mut self, index: usize) {
        self.sequence_index = index;
    }

    /// Place `media` according to `request` and return the assigned track.
    ///
    /// The media record is marked as used. Timecodes are brought to the
    /// timeline framerate, or lend theirs when the timeline has none; this
    /// happens before allocation so occupancy is counted at the final rate.
    /// A placement starting before the timeline start is rejected.
    pub fn add_media(
        &mut self,
        media: &mut MediaRecord,
        request: PlacementRequest,
    ) -> Result<u32, ProjectError> {
        if request.track == 0 {
            return Err(ProjectError::InvalidTrack {
                track: request.track,
            });
        }

        let kind = media.kind().track_kind();
        let (mut timeline_in, mut timeline_out) = match request.range {
            PlacementRange::Explicit {
                timeline_in,
                timeline_out,
            } => (timeline_in, timeline_out),
            PlacementRange::MediaPoints => (media.in_point(), media.out_point()),
            PlacementRange::Implied => {
                self.adopt_framerate(media.framerate());
                self.implied_range(kind, media)
            }
        };

        for tc in [&mut timeline_in, &mut timeline_out] {
            if let Some(rate) = sync_framerate(&mut self.framerate, tc) {
                self.set_framerate(rate);
            }
        }
        if self.framerate != 0 {
            timeline_in.set_framerate(self.framerate);
            timeline_out.set_framerate(self.framerate);
        }

        let first = timeline_in.frames_count();
        let last = timeline_out.frames_count();
        if last < first {
            return Err(ProjectError::InvertedRange {
                timeline_in: first,
                timeline_out: last,
            });
        }
        let start = self.start.frames_count();
        if first < start {
            return Err(ProjectError::BeforeStart {
                timeline_in: first,
                start,
            });
        }

        let tracks = self.tracks_mut(kind);
        let track = tracks.allocator.allocate(request.track, first, last);
        tracks.placements.push(ClipPlacement {
            track,
            media: media.id(),
            timeline_in,
            timeline_out,
            enabled: request.enabled,
        });
        media.mark_used();

        tracing::debug!(
            timeline = %self.name,
            media = %media.id(),
            %kind,
            requested = request.track,
            track,
            timeline_in = first,
            timeline_out = last,
            "media placed"
        );
        Ok(track)
    }

    fn implied_range(&self, kind: TrackKind, media: &MediaRecord) -> (Timecode, Timecode) {
        let rate = if self.framerate != 0 {
            self.framerate
        } else {
            media.framerate()
        };
        let start = self.start.frames_count();
        let first = match self.tracks(kind).allocator.content_end() {
            Some(end) => (end + 1).max(start),
            None => start,
        };
        let length = media.duration().frames_count().max(1);
        (
            Timecode::from_frames(first, rate),
            Timecode::from_frames(first + length - 1, rate),
        )
    }

    /// Markers take the timeline framerate; a timeline without one adopts
    /// the marker's.
    pub fn add_marker(&mut self, mut marker: Marker) {
        if self.framerate != 0 {
            marker.set_framerate(self.framerate);
        } else {
            self.adopt_framerate(marker.framerate());
        }
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Placements of one kind, in insertion order.
    pub fn placements(&self, kind: TrackKind) -> &[ClipPlacement] {
        &self.tracks(kind).placements
    }

    /// Placements on a single track, in insertion order.
    pub fn placements_on_track(
        &self,
        kind: TrackKind,
        track: u32,
    ) -> impl Iterator<Item = &ClipPlacement> + '_ {
        self.tracks(kind)
            .placements
            .iter()
            .filter(move |p| p.track == track)
    }

    pub fn allocator(&self, kind: TrackKind) -> &TrackAllocator {
        &self.tracks(kind).allocator
    }

    /// Highest track index used by `kind`, 0 when empty.
    pub fn max_track(&self, kind: TrackKind) -> u32 {
        self.tracks(kind).allocator.max_track()
    }

    pub fn placement_count(&self) -> usize {
        self.video.placements.len() + self.audio.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placement_count() == 0
    }

    /// Last occupied frame over every placement of both kinds.
    pub fn content_end(&self) -> Option<u64> {
        match (
            self.video.allocator.content_end(),
            self.audio.allocator.content_end(),
        ) {
            (Some(v), Some(a)) => Some(v.max(a)),
            (v, a) => v.or(a),
        }
    }

    /// Sequence length in frames, measured from the start timecode.
    pub fn duration_frames(&self) -> u64 {
        match self.content_end() {
            Some(end) => (end + 1).saturating_sub(self.start.frames_count()),
            None => 0,
        }
    }

    /// Lock every track of `kind`.
    pub fn lock_all(&mut self, kind: TrackKind) {
        self.tracks_mut(kind).lock_all = true;
    }

    pub fn set_track_locked(&mut self, kind: TrackKind, track: u32, locked: bool) {
        let tracks = self.tracks_mut(kind);
        if locked {
            tracks.locked.insert(track);
        } else {
            tracks.locked.remove(&track);
        }
    }

    pub fn is_track_locked(&self, kind: TrackKind, track: u32) -> bool {
        let tracks = self.tracks(kind);
        tracks.lock_all || tracks.locked.contains(&track)
    }

    fn tracks(&self, kind: TrackKind) -> &TrackSet {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
        }
    }

    fn tracks_mut(&mut self, kind: TrackKind) -> &mut TrackSet {
        match kind {
            TrackKind::Video => &mut self.video,
            TrackKind::Audio => &mut self.audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(id: u32, first: u64, last: u64) -> MediaRecord {
        let mut media = MediaRecord::video(format!("clip{id}.mov"), 25);
        media.assign_id(MediaId(id));
        media.set_in(Timecode::from_frames(first, 25));
        media.set_out(Timecode::from_frames(last, 25));
        media
    }

    #[test]
    fn test_overlapping_clips_stack() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 99);
        let mut b = clip(2, 50, 150);

        assert_eq!(timeline.add_media(&mut a, PlacementRequest::on_track(1)).unwrap(), 1);
        assert_eq!(timeline.allocator(TrackKind::Video).last_occupied(1), Some(99));
        assert_eq!(timeline.add_media(&mut b, PlacementRequest::on_track(1)).unwrap(), 2);
        assert_eq!(timeline.max_track(TrackKind::Video), 2);
        assert!(a.is_used_in_timeline());
        assert!(b.is_used_in_timeline());
    }

    #[test]
    fn test_video_and_audio_allocate_independently() {
        let mut timeline = Timeline::new("Main");
        let mut video = clip(1, 0, 99);
        let mut audio = MediaRecord::audio("mix.wav", 25);
        audio.assign_id(MediaId(2));
        audio.set_out(Timecode::from_frames(99, 25));

        timeline.add_media(&mut video, PlacementRequest::on_track(1)).unwrap();
        assert_eq!(timeline.add_media(&mut audio, PlacementRequest::on_track(1)).unwrap(), 1);
        assert_eq!(timeline.placements(TrackKind::Audio).len(), 1);
        assert_eq!(timeline.placements(TrackKind::Video).len(), 1);
    }

    #[test]
    fn test_implied_placement_appends() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 49);
        let mut b = clip(2, 100, 124);

        timeline.add_media(&mut a, PlacementRequest::default()).unwrap();
        timeline.add_media(&mut b, PlacementRequest::default()).unwrap();

        let placements = timeline.placements(TrackKind::Video);
        assert_eq!(placements[0].timeline_in.frames_count(), 0);
        assert_eq!(placements[0].timeline_out.frames_count(), 49);
        assert_eq!(placements[1].timeline_in.frames_count(), 50);
        assert_eq!(placements[1].timeline_out.frames_count(), 74);
        assert_eq!(placements[1].track, 1);
        assert_eq!(timeline.duration_frames(), 75);
    }

    #[test]
    fn test_implied_placement_starts_at_timeline_start() {
        let mut timeline = Timeline::new("Main");
        timeline.set_start(Timecode::parse("01:00:00:00").unwrap());
        let mut a = clip(1, 0, 24);
        timeline.add_media(&mut a, PlacementRequest::default()).unwrap();

        let placement = timeline.placements(TrackKind::Video)[0];
        assert_eq!(placement.timeline_in.to_string(), "01:00:00:00");
        assert_eq!(timeline.duration_frames(), 25);
    }

    #[test]
    fn test_rejects_track_zero_and_inverted_range() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 10);
        assert!(matches!(
            timeline.add_media(&mut a, PlacementRequest::on_track(0)),
            Err(ProjectError::InvalidTrack { track: 0 })
        ));

        let request = PlacementRequest::at(1, Timecode::from_frames(20, 25), Timecode::from_frames(10, 25));
        assert!(matches!(
            timeline.add_media(&mut a, request),
            Err(ProjectError::InvertedRange { .. })
        ));
        assert!(timeline.is_empty());
        assert!(!a.is_used_in_timeline());
    }

    #[test]
    fn test_placement_timecodes_take_timeline_rate() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 10);
        let request = PlacementRequest::at(
            1,
            Timecode::parse_with_rate("00:00:01:00", 30).unwrap(),
            Timecode::parse_with_rate("00:00:02:00", 30).unwrap(),
        );
        timeline.add_media(&mut a, request).unwrap();
        let placement = timeline.placements(TrackKind::Video)[0];
        assert_eq!(placement.timeline_in.framerate(), 25);
        assert_eq!(placement.timeline_in.frames_count(), 25);
        assert_eq!(placement.timeline_out.frames_count(), 50);
    }

    #[test]
    fn test_timeline_adopts_rate_from_placement() {
        let mut timeline = Timeline::with_framerate("NoRate", 0);
        let mut a = clip(1, 0, 10);
        let request = PlacementRequest::at(1, Timecode::from_frames(0, 24), Timecode::from_frames(10, 24));
        timeline.add_media(&mut a, request).unwrap();
        assert_eq!(timeline.framerate(), 24);
    }

    #[test]
    fn test_disabled_placement() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 10);
        timeline
            .add_media(&mut a, PlacementRequest::on_track(1).disabled())
            .unwrap();
        assert!(!timeline.placements(TrackKind::Video)[0].enabled);
    }

    #[test]
    fn test_track_locks() {
        let mut timeline = Timeline::new("Main");
        timeline.set_track_locked(TrackKind::Video, 2, true);
        assert!(timeline.is_track_locked(TrackKind::Video, 2));
        assert!(!timeline.is_track_locked(TrackKind::Video, 1));
        timeline.set_track_locked(TrackKind::Video, 2, false);
        assert!(!timeline.is_track_locked(TrackKind::Video, 2));

        timeline.lock_all(TrackKind::Audio);
        assert!(timeline.is_track_locked(TrackKind::Audio, 7));
        assert!(!timeline.is_track_locked(TrackKind::Video, 7));
    }

    #[test]
    fn test_placements_on_track_keep_order() {
        let mut timeline = Timeline::new("Main");
        let mut a = clip(1, 0, 10);
        let mut b = clip(2, 5, 8);
        let mut c = clip(3, 20, 30);
        timeline.add_media(&mut a, PlacementRequest::on_track(1)).unwrap();
        timeline.add_media(&mut b, PlacementRequest::on_track(1)).unwrap();
        timeline.add_media(&mut c, PlacementRequest::on_track(1)).unwrap();

        let on_one: Vec<_> = timeline
            .placements_on_track(TrackKind::Video, 1)
            .map(|p| p.media)
            .collect();
        assert_eq!(on_one, vec![MediaId(1), MediaId(3)]);
    }

    #[test]
    fn test_marker_adopts_timeline_rate() {
        let mut timeline = Timeline::new("Main");
        timeline.add_marker(Marker::new("Cue", Timecode::parse("00:00:01:00").unwrap()));
        assert_eq!(timeline.markers()[0].in_point().frames_count(), 25);
    }

    #[test]
    fn test_adopted_rate_reaches_start_and_markers() {
        let mut timeline = Timeline::with_framerate("NoRate", 0);
        timeline.set_start(Timecode::parse("00:00:10:00").unwrap());
        timeline.add_marker(Marker::new("Cue", Timecode::parse("00:00:11:00").unwrap()));
        assert_eq!(timeline.start().frames_count(), 0);

        let mut a = clip(1, 0, 24);
        let request = PlacementRequest::at(
            1,
            Timecode::parse_with_rate("00:00:12:00", 25).unwrap(),
            Timecode::parse_with_rate("00:00:12:24", 25).unwrap(),
        );
        timeline.add_media(&mut a, request).unwrap();

        assert_eq!(timeline.framerate(), 25);
        assert_eq!(timeline.start().framerate(), 25);
        assert_eq!(timeline.start().frames_count(), 250);
        assert_eq!(timeline.markers()[0].framerate(), 25);
        assert_eq!(timeline.markers()[0].in_point().frames_count(), 275);
        assert_eq!(timeline.placements(TrackKind::Video)[0].timeline_in.frames_count(), 300);
    }

    #[test]
    fn test_implied_placement_on_rateless_timeline_uses_media_rate() {
        let mut timeline = Timeline::with_framerate("NoRate", 0);
        timeline.set_start(Timecode::parse("00:00:10:00").unwrap());
        let mut a = clip(1, 0, 24);
        timeline.add_media(&mut a, PlacementRequest::default()).unwrap();

        let placement = timeline.placements(TrackKind::Video)[0];
        assert_eq!(timeline.framerate(), 25);
        assert_eq!(placement.timeline_in.frames_count(), 250);
        assert_eq!(placement.timeline_out.frames_count(), 274);
        assert_eq!(timeline.duration_frames(), 25);
    }

    #[test]
    fn test_rateless_timeline_adopts_marker_rate() {
        let mut timeline = Timeline::with_framerate("NoRate", 0);
        timeline.set_start(Timecode::parse("00:00:01:00").unwrap());
        timeline.add_marker(Marker::new("Cue", Timecode::from_frames(30, 25)));
        assert_eq!(timeline.framerate(), 25);
        assert_eq!(timeline.start().frames_count(), 25);
    }

    #[test]
    fn test_start_with_rate_on_rateless_timeline() {
        let mut timeline = Timeline::with_framerate("NoRate", 0);
        timeline.add_marker(Marker::new("Cue", Timecode::parse("00:00:02:00").unwrap()));
        timeline.set_start(Timecode::from_frames(24, 24));
        assert_eq!(timeline.framerate(), 24);
        assert_eq!(timeline.markers()[0].in_point().frames_count(), 48);
    }

    #[test]
    fn test_rejects_placement_before_start() {
        let mut timeline = Timeline::new("Main");
        timeline.set_start(Timecode::parse("01:00:00:00").unwrap());
        let mut a = clip(1, 0, 24);
        assert!(matches!(
            timeline.add_media(&mut a, PlacementRequest::on_track(1)),
            Err(ProjectError::BeforeStart {
                timeline_in: 0,
                start: 90_000
            })
        ));
        assert!(timeline.is_empty());
        assert!(!a.is_used_in_timeline());
    }
}
