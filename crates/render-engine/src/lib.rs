//! Xmeml Render Engine
//!
//! Turns a finished [`xmeml_project_model::Project`] into an XMEML v4
//! document that Premiere Pro or DaVinci Resolve can import.
//!
//! # Document Layout
//!
//! ```text
//! <xmeml version="4">
//!   <project>
//!     <children>
//!       <bin> ...        folders, depth first
//!       <sequence> ...   root timelines
//!       <clip> ...       root media (master clips)
//! ```
//!
//! Rendering is a set of functions that append to one [`XmlWriter`]
//! while a [`RenderSession`] hands out clip ids and remembers which media
//! files were already described.

pub mod clip;
pub mod document;
pub mod filters;
pub mod folder;
pub mod masterclip;
pub mod sequence;
pub mod session;
pub mod xml;

pub use document::*;
pub use session::RenderSession;
pub use xml::XmlWriter;
