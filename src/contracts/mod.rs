//! Shared contracts: the command/parse descriptors, the normalized schema,
//! and the options accepted by client operations.

pub mod options;
pub mod response;
pub mod types;

pub use response::{CommandResponse, LineParseFn, ParseFn, StreamResponse};
