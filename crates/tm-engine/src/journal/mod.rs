//! Play journal: a timestamped record of what happened in a session.

pub mod entry;
pub mod log;

pub use entry::JournalEntry;
pub use log::Journal;
