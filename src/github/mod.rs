//! GitHub release publishing.

pub mod auth;
pub mod release;
pub mod remote;

pub use release::{PublishedRelease, ReleaseRequest, publish_release};
pub use remote::parse_github_remote;
