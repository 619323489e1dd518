//! A set of built-in tools that models can use.

mod record_contact;

pub use record_contact::{ContactRecord, RecordContactTool};
