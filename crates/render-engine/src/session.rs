//! Per-document render state.

use std::collections::HashSet;

use xmeml_project_model::MediaId;

/// Counters and bookkeeping shared by every fragment of one document.
///
/// Clip ids are unique across the whole document, and each media file is
/// described in full exactly once; later references use a stub.
#[derive(Debug)]
pub struct RenderSession {
    next_clip: u32,
    described: HashSet<MediaId>,
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession {
    pub fn new() -> Self {
        Self {
            next_clip: 1,
            described: HashSet::new(),
        }
    }

    /// Next `clipitem-{k}` id, starting at 1.
    pub fn next_clip_id(&mut self) -> String {
        let id = format!("clipitem-{}", self.next_clip);
        self.next_clip += 1;
        id
    }

    /// Whether the file of `media` still needs its full description.
    /// Returns `true` only the first time it is asked for a given record.
    pub fn claim_file(&mut self, media: MediaId) -> bool {
        self.described.insert(media)
    }

    /// Number of clip ids handed out so far.
    pub fn clips_rendered(&self) -> u32 {
        self.next_clip - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_ids_are_sequential() {
        let mut session = RenderSession::new();
        assert_eq!(session.next_clip_id(), "clipitem-1");
        assert_eq!(session.next_clip_id(), "clipitem-2");
        assert_eq!(session.clips_rendered(), 2);
    }

    #[test]
    fn test_file_claimed_once() {
        let mut session = RenderSession::new();
        assert!(session.claim_file(MediaId(4)));
        assert!(!session.claim_file(MediaId(4)));
        assert!(session.claim_file(MediaId(5)));
    }
}
