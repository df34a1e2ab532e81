//! Higher-level operations composed from the API boundary

pub mod link;

pub use link::attach_latest_match;
