//! Common streaming utilities for all providers
//!
//! Both vendors stream Server-Sent Events. Response bodies are decoded with
//! [`eventsource_stream`], and [`spawn_sse_stream`] runs the request on a
//! producer task that feeds a [`GenerationStream`].

use crate::http::{HttpClient, HttpRequest, ResponseStream};
use crate::traits::StreamEventParser;
use aigen_core::{EventSink, GenerationStream, StreamEvent};
use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub use eventsource_stream::Event as SseEvent;

/// What the producer should do after handling an event
enum Flow {
    Continue,
    Stop,
}

async fn deliver<P: StreamEventParser>(parser: &P, event: &SseEvent, sink: &EventSink) -> Flow {
    match parser.parse_event(event) {
        Ok(Some(stream_event)) => {
            let done = stream_event.done;
            if !sink.send(stream_event).await || done {
                Flow::Stop
            } else {
                Flow::Continue
            }
        }
        Ok(None) => Flow::Continue,
        Err(e) => {
            sink.send(StreamEvent::failed(e.to_string())).await;
            Flow::Stop
        }
    }
}

/// Forward a response body to `sink` until a terminal event
///
/// A body that ends without a vendor end marker still ends the stream
/// successfully.
pub async fn forward_sse<P: StreamEventParser>(body: ResponseStream, parser: &P, sink: EventSink) {
    let mut events = std::pin::pin!(body.eventsource());

    while let Some(event) = events.next().await {
        let event = match event {
            Ok(event) => event,
            Err(EventStreamError::Transport(e)) => {
                sink.fail(&e).await;
                return;
            }
            Err(e) => {
                warn!(error = %e, "malformed event stream");
                sink.send(StreamEvent::failed(format!("Invalid event stream: {e}")))
                    .await;
                return;
            }
        };

        if let Flow::Stop = deliver(parser, &event, &sink).await {
            return;
        }
    }

    sink.finish().await;
}

/// Open a streaming request on a producer task
pub fn spawn_sse_stream<P>(
    client: Arc<dyn HttpClient>,
    request: HttpRequest,
    parser: P,
) -> GenerationStream
where
    P: StreamEventParser + 'static,
{
    GenerationStream::spawn(move |sink| async move {
        let provider = request.provider;
        let start = Instant::now();
        debug!(provider, url = %request.url, "opening stream");

        match client.post_stream(request).await {
            Ok(body) => {
                forward_sse(body, &parser, sink).await;
                debug!(
                    provider,
                    duration_ms = start.elapsed().as_millis(),
                    "stream finished"
                );
            }
            Err(e) => {
                warn!(provider, error = %e, "stream request failed");
                sink.fail(&e).await;
            }
        }
    })
}

/// Build an event carrying only `data`, as a decoder would for a bare
/// `data:` frame
#[cfg(test)]
pub(crate) fn data_event(data: &str) -> SseEvent {
    SseEvent {
        event: "message".to_string(),
        data: data.to_string(),
        id: String::new(),
        retry: None,
    }
}
