//! Line-oriented decoding of streamed backend responses.
//!
//! Both wire formats arrive as arbitrary byte chunks that must be split
//! into lines before parsing: server-sent events (`data: {...}` lines) for
//! OpenAI-compatible servers and newline-delimited JSON for Ollama.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::{Stream, StreamExt, stream};
use sitebrief_core::error::AppError;
use sitebrief_core::stream::ChatStream;

/// What a single decoded line means for the stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineEvent {
    /// A text fragment to hand to the consumer.
    Chunk(String),
    /// Nothing to emit (keep-alive, comment, empty delta).
    Skip,
    /// The backend signalled completion.
    Done,
}

/// Accumulates bytes and yields complete `\n`-terminated lines.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    /// Append bytes and return every line completed by them, without the
    /// trailing `\n` / `\r\n`.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever is left once the body ends without a final newline.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Some(rest)
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, AppError>> + Send>>;

struct DecodeState<F> {
    body: ByteStream,
    lines: LineBuffer,
    decode: F,
    pending: VecDeque<Result<String, AppError>>,
    finished: bool,
}

impl<F> DecodeState<F>
where
    F: Fn(&str) -> Result<LineEvent, AppError>,
{
    /// Decode lines into `pending` until one signals completion or fails.
    fn feed(&mut self, lines: Vec<String>) {
        for line in lines {
            match (self.decode)(&line) {
                Ok(LineEvent::Chunk(text)) => self.pending.push_back(Ok(text)),
                Ok(LineEvent::Skip) => {}
                Ok(LineEvent::Done) => {
                    self.finished = true;
                    return;
                }
                Err(e) => {
                    self.pending.push_back(Err(e));
                    self.finished = true;
                    return;
                }
            }
        }
    }
}

/// Turn a streamed HTTP body into a [`ChatStream`] using a per-line decoder.
///
/// The stream ends at the first [`LineEvent::Done`], at the first error, or
/// when the body ends.
pub(crate) fn decode_lines<S, F>(body: S, decode: F) -> ChatStream
where
    S: Stream<Item = Result<Vec<u8>, AppError>> + Send + 'static,
    F: Fn(&str) -> Result<LineEvent, AppError> + Send + 'static,
{
    let state = DecodeState {
        body: Box::pin(body),
        lines: LineBuffer::default(),
        decode,
        pending: VecDeque::new(),
        finished: false,
    };

    let chunks = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let lines = state.lines.push(&bytes);
                    state.feed(lines);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(e));
                }
                None => {
                    let rest = state.lines.finish().into_iter().collect();
                    state.feed(rest);
                    state.finished = true;
                }
            }
        }
    });

    ChatStream::new(chunks)
}

/// Adapt a reqwest response body to the byte stream [`decode_lines`] expects.
pub(crate) fn response_bytes(
    response: reqwest::Response,
) -> impl Stream<Item = Result<Vec<u8>, AppError>> + Send + 'static {
    response.bytes_stream().map(|chunk| {
        chunk
            .map(|bytes| bytes.to_vec())
            .map_err(|e| AppError::backend(format!("Stream interrupted: {e}")))
    })
}
