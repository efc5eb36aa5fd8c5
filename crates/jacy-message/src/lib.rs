//! Diagnostics for the Jacy front-end.
//!
//! Every stage reports problems as [`Message`] values accumulated in a
//! [`MessageHolder`] and returns a best-effort artifact wrapped in a
//! [`MessageResult`]. Stages never unwind for user errors; only
//! internal invariant breaches panic.

pub mod builder;
pub mod dump;
pub mod message;
pub mod result;

pub use builder::MessageBuilder;
pub use dump::MessageDumper;
pub use message::{Label, LabelKind, Level, Message, EID};
pub use result::{MessageHolder, MessageResult};
