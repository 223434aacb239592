use reqwest::Response;

use crate::domain::GameRecord;
use crate::errors::AnalyticsError;

/// Reassembles newline-delimited records from arbitrarily sized byte chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the next complete line, without its newline terminator.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop(); // the newline itself
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    /// Whatever is left once the source is exhausted (body without a
    /// trailing newline).
    pub fn take_remainder(&mut self) -> Option<Vec<u8>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

/// Lazy, finite, non-restartable sequence of game records decoded from an
/// NDJSON response body.
///
/// Each line decodes independently; a malformed line yields
/// [`AnalyticsError::MalformedRecord`] and the default policy is to abort
/// consumption there, since statistics over a partial set could mislead.
/// Dropping the stream mid-way releases the underlying connection.
pub struct GameStream {
    response: Response,
    lines: LineBuffer,
    exhausted: bool,
}

impl GameStream {
    pub(crate) fn new(response: Response) -> Self {
        Self {
            response,
            lines: LineBuffer::new(),
            exhausted: false,
        }
    }

    /// Next decoded record, or `None` once the body is fully consumed.
    /// Blank lines are skipped.
    pub async fn next(&mut self) -> Option<Result<GameRecord, AnalyticsError>> {
        loop {
            if let Some(line) = self.lines.next_line() {
                if line.is_empty() {
                    continue;
                }
                return Some(decode_line(&line));
            }

            if self.exhausted {
                let remainder = self.lines.take_remainder()?;
                return Some(decode_line(&remainder));
            }

            match self.response.chunk().await {
                Ok(Some(chunk)) => self.lines.push(&chunk),
                Ok(None) => self.exhausted = true,
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(AnalyticsError::MalformedRecord {
                        reason: format!("stream read failed: {e}"),
                    }));
                }
            }
        }
    }
}

fn decode_line(line: &[u8]) -> Result<GameRecord, AnalyticsError> {
    serde_json::from_slice(line).map_err(|e| AnalyticsError::MalformedRecord {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_reassembles_across_chunks() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"{\"id\":\"a");
        assert!(buffer.next_line().is_none());

        buffer.push(b"bc\"}\n{\"id\":");
        assert_eq!(buffer.next_line().unwrap(), b"{\"id\":\"abc\"}");
        assert!(buffer.next_line().is_none());

        buffer.push(b"\"def\"}\n");
        assert_eq!(buffer.next_line().unwrap(), b"{\"id\":\"def\"}");
        assert!(buffer.take_remainder().is_none());
    }

    #[test]
    fn test_line_buffer_strips_carriage_return() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"{}\r\n");
        assert_eq!(buffer.next_line().unwrap(), b"{}");
    }

    #[test]
    fn test_line_buffer_keeps_unterminated_tail() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"{\"id\":\"x\"}\n{\"id\":\"tail\"}");
        assert!(buffer.next_line().is_some());
        assert!(buffer.next_line().is_none());
        assert_eq!(buffer.take_remainder().unwrap(), b"{\"id\":\"tail\"}");
    }

    #[test]
    fn test_decode_line_reads_record_fields() {
        let record = decode_line(br#"{"id":"abc123","pgn":"[Event \"Casual\"]"}"#).unwrap();
        assert_eq!(record.id.as_deref(), Some("abc123"));
        assert!(record.pgn.unwrap().contains("Event"));
    }

    #[test]
    fn test_decode_line_rejects_malformed_json() {
        let err = decode_line(b"{not json").unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_decode_line_tolerates_missing_fields() {
        let record = decode_line(b"{}").unwrap();
        assert!(record.id.is_none());
        assert!(record.pgn.is_none());
    }
}
