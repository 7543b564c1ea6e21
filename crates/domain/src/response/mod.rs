//! HTTP Response domain types

mod envelope;
mod field_path;
mod status;

pub use envelope::{ResponseEnvelope, decode_body};
pub use field_path::{FieldPath, PathSegment};
pub use status::StatusCode;
