//! Data model shared by the fragment feed and the outline engine.
//!
//! Fragments flow in from a [`FragmentFeed`]; the engine derives
//! [`HeadingCandidate`]s and finally an [`OutlineDocument`].

mod feed;
mod fragment;
mod outline;

pub use feed::FragmentFeed;
pub use fragment::{round_size, size_key, BoundingBox, StyleFlags, TextFragment};
pub use outline::{HeadingCandidate, HeadingLevel, OutlineDocument, OutlineEntry, UNTITLED};
