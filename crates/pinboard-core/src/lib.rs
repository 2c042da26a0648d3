//! Structured `key: value` overlays inside free-text record descriptions,
//! molecule attachment to pinned records, and the append-only audit and
//! event logs that go with them.
//!
//! # Example
//! ```
//! use pinboard_core::fields::{MergeRequestFields, MERGE_REQUEST};
//!
//! let desc = "branch: foo\ntarget: main\n\nFixes bug";
//! let mr = MergeRequestFields::parse(desc).unwrap();
//! assert_eq!(mr.branch.as_deref(), Some("foo"));
//! assert_eq!(pinboard_core::fields::other_content(desc, &MERGE_REQUEST), "Fixes bug");
//! ```

pub mod attach;
pub mod audit;
pub mod config;
pub mod error;
pub mod events;
pub mod fields;
pub mod handoff;
mod jsonl;
pub mod model;
pub mod store;
pub mod time;
pub mod workspace;

pub use attach::{
    attach_molecule, attach_molecule_at, detach_molecule, detach_molecule_with_audit,
    get_attachment, DetachOptions, DetachOutcome,
};
pub use audit::AuditTrail;
pub use config::PinboardConfig;
pub use error::CoreError;
pub use events::EventLog;
pub use store::{BdStore, MemStore, RecordStore};
