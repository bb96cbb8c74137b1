//! Incremental model output.
//!
//! # Lifecycle
//!
//! ```text
//! PENDING --[first item]--> STREAMING --[end of input or error]--> COMPLETE
//! ```
//!
//! A [`ChatStream`] is single-pass: once `COMPLETE` it yields nothing more,
//! and there is no way to restart or cancel it short of dropping it.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::error::AppError;

/// Current position of a [`ChatStream`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing received yet.
    Pending,
    /// At least one item received, more may follow.
    Streaming,
    /// The backend signalled completion or the stream failed.
    Complete,
}

type BoxedChunks = Pin<Box<dyn Stream<Item = Result<String, AppError>> + Send>>;

/// A lazy sequence of text fragments whose concatenation is the full answer.
pub struct ChatStream {
    inner: BoxedChunks,
    state: StreamState,
}

impl ChatStream {
    pub fn new<S>(chunks: S) -> Self
    where
        S: Stream<Item = Result<String, AppError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(chunks),
            state: StreamState::Pending,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Drains the stream and concatenates every fragment.
    pub async fn collect_text(mut self) -> Result<String, AppError> {
        let mut text = String::new();
        while let Some(chunk) = self.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Stream for ChatStream {
    type Item = Result<String, AppError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.state == StreamState::Complete {
            return Poll::Ready(None);
        }

        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.state = StreamState::Streaming;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.state = StreamState::Complete;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.state = StreamState::Complete;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
