// Pure building blocks: wire layouts, the packed-date codec, and slot summaries.
pub mod error;
pub mod format;
pub mod oracle;
pub mod packed_date;
pub mod slots;
pub mod tally;
pub mod wire;
