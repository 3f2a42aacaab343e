//! Greedy track allocation.
//!
//! Each track remembers the last frame it has been occupied up to. A new
//! placement starts at the requested track and moves upward until it
//! finds a track whose content ends before the placement starts. Lower
//! tracks are never revisited, so the result depends on insertion order.

use std::collections::BTreeMap;

/// Per-kind track occupancy for one timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackAllocator {
    last_occupied: BTreeMap<u32, u64>,
}

impl TrackAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a track to the inclusive frame range `[timeline_in, timeline_out]`.
    pub fn allocate(&mut self, requested: u32, timeline_in: u64, timeline_out: u64) -> u32 {
        let mut track = requested;
        while self
            .last_occupied
            .get(&track)
            .is_some_and(|&end| end >= timeline_in)
        {
            track += 1;
        }

        let end = self.last_occupied.entry(track).or_insert(timeline_out);
        *end = (*end).max(timeline_out);

        tracing::trace!(requested, assigned = track, timeline_in, timeline_out, "track allocated");
        track
    }

    /// Last frame occupied on `track`, if anything was placed there.
    pub fn last_occupied(&self, track: u32) -> Option<u64> {
        self.last_occupied.get(&track).copied()
    }

    /// Highest track index in use, 0 when empty.
    pub fn max_track(&self) -> u32 {
        self.last_occupied.keys().next_back().copied().unwrap_or(0)
    }

    /// Last occupied frame over every track.
    pub fn content_end(&self) -> Option<u64> {
        self.last_occupied.values().copied().max()
    }

    pub fn is_empty(&self) -> bool {
        self.last_occupied.is_empty()
    }
}
