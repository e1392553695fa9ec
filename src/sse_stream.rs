//! Stream adapter turning an HTTP byte stream into Server-Sent Events.

use crate::Error;
use futures_util::{Stream, StreamExt};
use memchr::memmem;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound on bytes buffered while waiting for an event boundary.
const MAX_BUFFERED_BYTES: usize = 1 << 20;

/// Data payload OpenAI sends as the last event of a stream.
const DONE_SENTINEL: &str = "[DONE]";

/// A Server-Sent Events (SSE) event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// Value of the `event:` field, if present.
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`.
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    pub fn data(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE_SENTINEL
    }

    /// Parse the text of one event block. Returns `None` for blocks without
    /// data, such as comment-only keep-alives.
    fn parse(block: &str) -> Option<Self> {
        let mut event = None;
        let mut id = None;
        let mut data_lines: Vec<&str> = Vec::new();

        for line in block.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let (field, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.strip_prefix(' ').unwrap_or(value);
            match field {
                "event" => event = Some(value.to_string()),
                "data" => data_lines.push(value),
                "id" => id = Some(value.to_string()),
                _ => {}
            }
        }

        if data_lines.is_empty() {
            return None;
        }

        Some(Self {
            event,
            data: data_lines.join("\n"),
            id,
        })
    }
}

/// Locate the first blank line in `buf`. Returns the end of the event block
/// and the length of the separator.
fn find_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = memmem::find(buf, b"\n\n").map(|pos| (pos, 2));
    let crlf = memmem::find(buf, b"\r\n\r\n").map(|pos| (pos, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Parses SSE events out of a byte stream. Events split across chunks are
/// reassembled, and the stream ends at the `[DONE]` sentinel without polling
/// the source again.
///
/// A decoding failure is yielded only after every event parsed ahead of it.
pub struct SseStream<S> {
    inner: S,
    buffer: Vec<u8>,
    pending: VecDeque<SseEvent>,
    failure: Option<Error>,
    source_done: bool,
    finished: bool,
}

impl<S> SseStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            failure: None,
            source_done: false,
            finished: false,
        }
    }

    /// Move every complete event block out of the buffer. Stops at the first
    /// block that is not valid UTF-8, keeping the events queued before it.
    fn drain_events(&mut self) -> Result<(), Error> {
        let mut start = 0;
        while let Some((len, sep)) = find_boundary(&self.buffer[start..]) {
            let block = std::str::from_utf8(&self.buffer[start..start + len])
                .map_err(|e| Error::streaming(format!("Invalid UTF-8 in SSE event: {e}")))?;
            if let Some(event) = SseEvent::parse(block) {
                self.pending.push_back(event);
            }
            start += len + sep;
        }
        self.buffer.drain(..start);
        Ok(())
    }

    /// Parse whatever is left once the source has ended without a trailing
    /// blank line.
    fn flush_tail(&mut self) -> Option<SseEvent> {
        let tail = std::mem::take(&mut self.buffer);
        std::str::from_utf8(&tail)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(SseEvent::parse)
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    type Item = Result<SseEvent, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.finished {
                return Poll::Ready(None);
            }

            if let Some(event) = self.pending.pop_front() {
                if event.is_done() {
                    self.finished = true;
                    self.pending.clear();
                    return Poll::Ready(None);
                }
                return Poll::Ready(Some(Ok(event)));
            }

            if let Some(error) = self.failure.take() {
                self.finished = true;
                return Poll::Ready(Some(Err(error)));
            }

            if self.source_done {
                self.finished = true;
                return Poll::Ready(None);
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    self.buffer.extend_from_slice(&chunk);
                    if let Err(e) = self.drain_events() {
                        self.buffer.clear();
                        self.failure = Some(e);
                    } else if self.buffer.len() > MAX_BUFFERED_BYTES {
                        self.buffer.clear();
                        self.failure = Some(Error::streaming("SSE buffer exceeded maximum size"));
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Poll::Ready(Some(Err(Error::streaming(format!(
                        "Stream error: {e}"
                    )))));
                }
                None => {
                    self.source_done = true;
                    if let Some(event) = self.flush_tail() {
                        self.pending.push_back(event);
                    }
                }
            }
        }
    }
}

/// Extension trait to add SSE parsing to byte streams.
pub trait SseStreamExt: Stream {
    fn sse_events(self) -> SseStream<Self>
    where
        Self: Sized,
    {
        SseStream::new(self)
    }
}

impl<S: Stream> SseStreamExt for S {}
