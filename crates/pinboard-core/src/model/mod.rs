pub mod audit;
pub mod event;
pub mod record;

pub use audit::{AuditEntry, AuditOperation};
pub use event::{Event, EventType, Payload, Visibility};
pub use record::{Record, RecordStatus};
