//! Async JSON Lines codec used as the on-disk format of flowdag graph stores.
//!
//! One JSON value per line. Readers track line numbers so parse failures can
//! be reported precisely, and the resilient loaders skip bad lines while
//! collecting [`Warning`]s instead of failing the whole load. Writes to a
//! path go through a temp file and a rename so readers never observe a
//! partially written file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod stream;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use stream::{read_jsonl_resilient, read_jsonl_resilient_numbered};
pub use warning::{Warning, WarningCollector};
pub use writer::JsonlWriter;
