//! `key: value` overlays embedded at the head of free-text descriptions.

pub mod attachment;
pub mod codec;
pub mod merge_request;
pub mod schema;

pub use attachment::AttachmentFields;
pub use codec::{format, merge, other_content, parse, FieldValues};
pub use merge_request::MergeRequestFields;
pub use schema::{FieldSchema, FieldSpec, ATTACHMENT, MERGE_REQUEST};
