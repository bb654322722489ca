//! Writing frequency tables.
//!
//! - [`storage`] - output compression
//! - [`table`] - filtering, ordering and serialization of one table
//! - [`pattern`] - output file names per variant and mutation
//! - [`writer`] - every table of a run

pub mod pattern;
pub mod storage;
pub mod table;
pub mod writer;

pub use pattern::OutputPattern;
pub use storage::{Storage, StorageWriter};
pub use table::{TOTAL_LABEL, TableSummary, TableWriter};
pub use writer::{RunWriter, WrittenTable};
