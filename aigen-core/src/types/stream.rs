//! Streaming types for incremental responses
//!
//! A [`GenerationStream`] is the consumer half of a bounded channel. A
//! producer task owns the [`EventSink`], talks to the vendor and forwards
//! chunks. Every stream ends with exactly one event whose `done` flag is set;
//! failures are reported on that event instead of interrupting iteration.

use crate::error::{Error, Result};
use futures_core::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channel capacity used by [`GenerationStream::spawn`]
pub const DEFAULT_STREAM_BUFFER: usize = 32;

/// One increment of a streamed generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamEvent {
    /// Generated text, possibly empty
    pub text: String,
    /// Terminal marker
    pub done: bool,
    /// Failure description carried by a terminal event
    pub error: Option<String>,
}

impl StreamEvent {
    /// A content chunk
    pub fn chunk(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            error: None,
        }
    }

    /// Successful end of stream
    pub fn done() -> Self {
        Self {
            text: String::new(),
            done: true,
            error: None,
        }
    }

    /// Terminal event carrying a failure description
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            done: true,
            error: Some(description.into()),
        }
    }

    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Producer half handed to the task that feeds a [`GenerationStream`]
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl EventSink {
    /// Send an event; returns `false` once the consumer has gone away
    pub async fn send(&self, event: StreamEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Send a content chunk
    pub async fn chunk(&self, text: impl Into<String>) -> bool {
        self.send(StreamEvent::chunk(text)).await
    }

    /// End the stream successfully
    pub async fn finish(self) {
        let _ = self.tx.send(StreamEvent::done()).await;
    }

    /// End the stream with a failure
    pub async fn fail(self, error: &Error) {
        let _ = self.tx.send(StreamEvent::failed(error.to_string())).await;
    }

    /// Whether the consumer dropped its end
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A lazy, finite sequence of [`StreamEvent`]s for one generation call
///
/// Dropping the stream closes the channel and aborts the producer task.
#[derive(Debug)]
pub struct GenerationStream {
    rx: mpsc::Receiver<StreamEvent>,
    task: Option<JoinHandle<()>>,
    finished: bool,
}

impl GenerationStream {
    /// Spawn `producer` on the current Tokio runtime and stream what it sends
    pub fn spawn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(EventSink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn_with_capacity(DEFAULT_STREAM_BUFFER, producer)
    }

    /// Like [`GenerationStream::spawn`] with an explicit channel capacity
    pub fn spawn_with_capacity<F, Fut>(capacity: usize, producer: F) -> Self
    where
        F: FnOnce(EventSink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(producer(EventSink { tx }));
        Self {
            rx,
            task: Some(task),
            finished: false,
        }
    }

    /// A stream that yields only a terminal failure
    pub fn failed(error: &Error) -> Self {
        Self::from_events([StreamEvent::failed(error.to_string())])
    }

    /// A stream over a fixed set of events, without a producer task
    pub fn from_events(events: impl IntoIterator<Item = StreamEvent>) -> Self {
        let events: Vec<StreamEvent> = events.into_iter().collect();
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // capacity equals the event count
            let _ = tx.try_send(event);
        }
        Self {
            rx,
            task: None,
            finished: false,
        }
    }

    /// Await the next event without pulling in a stream extension trait
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    /// Drain the stream into one string
    ///
    /// A terminal failure becomes [`Error::Stream`].
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(event) = self.next_event().await {
            if let Some(error) = event.error {
                return Err(Error::Stream(error));
            }
            text.push_str(&event.text);
        }
        Ok(text)
    }
}

impl Stream for GenerationStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                if event.done {
                    self.finished = true;
                    self.rx.close();
                }
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => {
                // producer went away without a terminal event
                self.finished = true;
                Poll::Ready(Some(StreamEvent::failed(
                    "stream ended before a terminal event",
                )))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for GenerationStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
