//! Version parsing and patch bumping.

pub mod bump;
pub mod parse;

pub use bump::bump_patch;
pub use parse::parse_version;
