//! Git repository reads via git2.

pub mod head;
pub mod tags;

pub use head::{HeadCommit, head_commit};
pub use tags::tag_exists;
