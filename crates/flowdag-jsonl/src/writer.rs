//! JSONL writing operations.
//!
//! This module provides async functionality for writing data in JSONL format
//! with efficient buffering.

use crate::Result;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSONL (JSON Lines) data.
///
/// Each value is serialized to a single line followed by `\n`. Output is
/// buffered; call [`flush`](Self::flush) before dropping the writer.
///
/// # Examples
///
/// ```no_run
/// use flowdag_jsonl::JsonlWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("output.jsonl").await?;
/// let mut writer = JsonlWriter::new(file);
/// writer.write(&serde_json::json!({"id": "1"})).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer in a
    /// [`BufWriter`].
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Creates a new `JsonlWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
        }
    }

    /// Serializes `value` as one line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails and
    /// [`crate::Error::Io`] if the underlying writer fails.
    pub async fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        Ok(())
    }

    /// Serializes every value from `values`, one per line, stopping at the
    /// first failure.
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Returns a reference to the underlying buffered writer.
    #[must_use]
    pub fn get_ref(&self) -> &BufWriter<W> {
        &self.writer
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// Does not flush; call [`flush`](Self::flush) first.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn write_appends_newline_per_value() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer.write(&serde_json::json!({"a": 1})).await.unwrap();
        writer.write(&serde_json::json!([1, 2])).await.unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\"a\":1}\n[1,2]\n");
    }

    #[tokio::test]
    async fn write_all_accepts_borrowed_items() {
        let values = vec!["x".to_string(), "y".to_string()];
        let mut writer = JsonlWriter::with_capacity(Cursor::new(Vec::new()), 16);
        writer.write_all(values.iter()).await.unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "\"x\"\n\"y\"\n");
    }

    #[tokio::test]
    async fn unflushed_output_stays_buffered() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer.write(&1u8).await.unwrap();
        assert!(writer.get_ref().get_ref().get_ref().is_empty());
    }
}
