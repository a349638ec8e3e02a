//! Streaming and resilient loading of JSONL data.
//!
//! [`JsonlReader::stream`] yields one `Result` per non-blank line and keeps
//! going past undecodable lines. [`JsonlReader::stream_resilient`] and
//! [`read_jsonl_resilient`] drop undecodable lines and report them as
//! [`Warning`]s. Both stop at the first I/O failure.

use crate::warning::{Warning, WarningCollector};
use crate::{Error, JsonlReader, Result};
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncRead;

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Converts the reader into a stream of decoded values.
    ///
    /// Decode failures are yielded as [`Error::Parse`] and the stream moves
    /// on to the next line. An I/O failure is yielded once and ends the
    /// stream.
    pub fn stream<T: DeserializeOwned>(self) -> impl Stream<Item = Result<T>> {
        stream::unfold((self, false), |(mut reader, done)| async move {
            if done {
                return None;
            }
            match reader.read_line::<T>().await {
                Ok(Some(value)) => Some((Ok(value), (reader, false))),
                Ok(None) => None,
                Err(err @ Error::Parse { .. }) => Some((Err(err), (reader, false))),
                Err(err) => Some((Err(err), (reader, true))),
            }
        })
    }

    /// Converts the reader into a stream that yields only decodable values.
    ///
    /// Skipped lines are recorded in the returned [`WarningCollector`]. An
    /// I/O failure ends the stream and is recorded as
    /// [`Warning::SkippedLine`].
    pub fn stream_resilient<T: DeserializeOwned>(
        self,
    ) -> (impl Stream<Item = T>, WarningCollector) {
        let (values, collector) = self.stream_resilient_numbered::<T>();
        (values.map(|(_, value)| value), collector)
    }

    /// Like [`stream_resilient`](Self::stream_resilient), pairing each value
    /// with the 1-based line number it was read from.
    pub fn stream_resilient_numbered<T: DeserializeOwned>(
        self,
    ) -> (impl Stream<Item = (usize, T)>, WarningCollector) {
        let collector = WarningCollector::new();
        let sink = collector.clone();

        let values = stream::unfold((self, sink), |(mut reader, sink)| async move {
            loop {
                match reader.read_line::<T>().await {
                    Ok(Some(value)) => {
                        let line_number = reader.line_number();
                        return Some(((line_number, value), (reader, sink)));
                    }
                    Ok(None) => return None,
                    Err(Error::Parse {
                        line_number,
                        source,
                    }) => sink.add(Warning::MalformedJson {
                        line_number,
                        error: source.to_string(),
                    }),
                    Err(err) => {
                        sink.add(Warning::SkippedLine {
                            line_number: reader.line_number() + 1,
                            reason: err.to_string(),
                        });
                        return None;
                    }
                }
            }
        });

        (values, collector)
    }
}

/// Reads every decodable value from the JSONL file at `path`.
///
/// Returns the values in file order together with a warning for every line
/// that was skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened. Problems with
/// individual lines are reported as warnings, not errors.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let (numbered, warnings) = read_jsonl_resilient_numbered(path).await?;
    Ok((numbered.into_iter().map(|(_, value)| value).collect(), warnings))
}

/// Like [`read_jsonl_resilient`], keeping the line number of every value so
/// callers can report problems found after decoding.
///
/// # Errors
///
/// See [`read_jsonl_resilient`].
pub async fn read_jsonl_resilient_numbered<T, P>(
    path: P,
) -> Result<(Vec<(usize, T)>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let (values, collector) = JsonlReader::new(file).stream_resilient_numbered::<T>();
    let records: Vec<(usize, T)> = values.collect().await;
    let warnings = collector.into_warnings();

    if !warnings.is_empty() {
        tracing::warn!(
            path = %path.as_ref().display(),
            skipped = warnings.len(),
            "skipped unreadable JSONL lines"
        );
    }

    Ok((records, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;
    use std::pin::pin;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn stream_yields_errors_and_continues() {
        let data = b"{\"id\":1}\n{bad}\n{\"id\":3}\n".as_slice();
        let results: Vec<Result<Row>> = JsonlReader::new(Cursor::new(data))
            .stream::<Row>()
            .collect()
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().line_number(), Some(2));
        assert_eq!(results[2].as_ref().unwrap().id, 3);
    }

    #[tokio::test]
    async fn stream_resilient_records_skipped_lines() {
        let data = b"{\"id\":1}\n\n{\"nope\":true}\n{\"id\":4}\n".as_slice();
        let (values, warnings) = JsonlReader::new(Cursor::new(data)).stream_resilient::<Row>();
        let mut values = pin!(values);

        assert_eq!(values.next().await, Some(Row { id: 1 }));
        assert_eq!(values.next().await, Some(Row { id: 4 }));
        assert_eq!(values.next().await, None);

        let warnings = warnings.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line_number(), 3);
        assert_eq!(warnings[0].kind(), "malformed_json");
    }

    #[tokio::test]
    async fn numbered_stream_reports_source_lines() {
        let data = b"\n{\"id\":1}\n{bad}\n\n{\"id\":5}\n".as_slice();
        let (values, warnings) =
            JsonlReader::new(Cursor::new(data)).stream_resilient_numbered::<Row>();
        let values: Vec<(usize, Row)> = values.collect().await;

        assert_eq!(values, vec![(2, Row { id: 1 }), (5, Row { id: 5 })]);
        assert_eq!(warnings.into_warnings()[0].line_number(), 3);
    }

    #[tokio::test]
    async fn resilient_read_of_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_jsonl_resilient::<Row, _>(dir.path().join("absent.jsonl")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
