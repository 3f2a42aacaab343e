//! Xmeml Project Model
//!
//! Defines the in-memory editorial project that gets written out as XMEML:
//! - **Timecode:** frame-accurate time values tied to a framerate
//! - **Media:** source records (video, audio, image, generated, text)
//! - **Timeline:** clip placements on numbered tracks, markers, locks
//! - **Project:** the media pool, registered timelines and the bin tree
//!
//! Track allocation and the motion-centre transform live here too, so the
//! renderer only has to turn a finished model into text.

pub mod allocator;
pub mod color;
pub mod effect;
pub mod folder;
pub mod marker;
pub mod media;
pub mod project;
pub mod timecode;
pub mod timeline;
pub mod transform;

pub use allocator::*;
pub use color::*;
pub use effect::*;
pub use folder::*;
pub use marker::*;
pub use media::*;
pub use project::*;
pub use timecode::*;
pub use timeline::*;
pub use transform::*;
