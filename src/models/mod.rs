//! Data models shared by the portal core

pub mod item;
pub mod notification;
pub mod reading_request;

// Re-export commonly used types
pub use item::{ItemId, Membership};
pub use notification::{Notification, NotificationKind};
pub use reading_request::{ReadingRequest, SubmissionReceipt};
