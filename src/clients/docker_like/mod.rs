//! The Docker-compatible command shape shared by every runtime client.

pub mod arg_helpers;
pub mod normalize;
pub mod records;
