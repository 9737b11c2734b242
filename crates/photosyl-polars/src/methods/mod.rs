//! DataFrame operations behind the aligner and the timeline extension trait

pub mod align;
pub mod timeline;
