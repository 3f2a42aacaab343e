//! Timeline markers.

use crate::color::MarkerColor;
use crate::timecode::{sync_framerate, Timecode};

/// A named, optionally colored annotation on a timeline.
///
/// A marker without an out point, or whose out equals its in, is a point
/// marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub note: String,
    pub color: Option<MarkerColor>,
    in_point: Timecode,
    out_point: Option<Timecode>,
    framerate: u32,
}

impl Marker {
    /// A point marker at `in_point`. The marker adopts its framerate.
    pub fn new(name: impl Into<String>, in_point: Timecode) -> Self {
        Self {
            name: name.into(),
            note: String::new(),
            color: None,
            framerate: in_point.framerate(),
            in_point,
            out_point: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_color(mut self, color: MarkerColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_out(mut self, out_point: Timecode) -> Self {
        self.set_out(Some(out_point));
        self
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn set_framerate(&mut self, framerate: u32) {
        self.framerate = framerate;
        self.in_point.set_framerate(framerate);
        if let Some(out) = self.out_point.as_mut() {
            out.set_framerate(framerate);
        }
    }

    pub fn in_point(&self) -> Timecode {
        self.in_point
    }

    pub fn out_point(&self) -> Option<Timecode> {
        self.out_point
    }

    pub fn set_in(&mut self, mut tc: Timecode) {
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.in_point = tc;
        if let Some(rate) = adopted {
            self.set_framerate(rate);
        }
    }

    pub fn set_out(&mut self, tc: Option<Timecode>) {
        let Some(mut tc) = tc else {
            self.out_point = None;
            return;
        };
        let adopted = sync_framerate(&mut self.framerate, &mut tc);
        self.out_point = Some(tc);
        if let Some(rate) = adopted {
            self.set_framerate(rate);
        }
    }

    pub fn is_point(&self) -> bool {
        match self.out_point {
            None => true,
            Some(out) => out.frames_count() == self.in_point.frames_count(),
        }
    }

    /// `out - in + 1` frames for ranged markers.
    pub fn duration(&self) -> Option<Timecode> {
        self.out_point.map(|out| {
            let frames = (out.frames_count() + 1).saturating_sub(self.in_point.frames_count());
            Timecode::from_frames(frames, self.framerate)
        })
    }
}
